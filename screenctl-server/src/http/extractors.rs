//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use screenctl_core::AccessMode;
use serde::de::DeserializeOwned;
use tower_sessions::Session;

use super::error::ApiError;
use super::server::AppState;
use crate::auth::session;
use crate::models::{Owner, ValidationError};
use crate::services::{AccountService, GuestService};

/// Extract and validate a numeric id from the path
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = raw.parse::<i64>().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be an integer",
            })
        })?;

        Ok(Self(id))
    }
}

/// JSON body whose rejections use the API error shape
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                ApiError::Validation(ValidationError::Malformed {
                    field: "request body",
                    detail: rejection.body_text(),
                })
            })?;
        Ok(Self(value))
    }
}

/// The identity an API request acts as.
///
/// Signed-in users act as themselves. Without a session, guest mode falls
/// back to the shared guest and authenticated mode rejects with 401.
pub struct Caller(pub Owner);

impl FromRequestParts<Arc<AppState>> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| ApiError::Internal {
                message: msg.to_string(),
            })?;

        resolve_owner(state, &session)
            .await?
            .map(Self)
            .ok_or(ApiError::Unauthenticated)
    }
}

/// Resolve the caller's owner identity. `None` means "must sign in".
///
/// A session pointing at a user that no longer exists is cleared.
pub async fn resolve_owner(state: &AppState, session: &Session) -> Result<Option<Owner>, ApiError> {
    if let Some(user_id) = session::user_id(session).await? {
        if AccountService::new(&state.pool).find_user(user_id).await?.is_some() {
            return Ok(Some(Owner::User(user_id)));
        }
        tracing::warn!(user_id, "session refers to missing user, clearing");
        session::sign_out(session).await?;
    }

    match state.config.access_mode {
        AccessMode::Authenticated => Ok(None),
        AccessMode::Guest => {
            let guest = GuestService::new(&state.pool)
                .get_or_create(&state.config.guest_token)
                .await?;
            Ok(Some(Owner::Guest(guest.id)))
        }
    }
}
