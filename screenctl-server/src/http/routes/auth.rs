//! Login, registration and logout form flows
//!
//! Failures never produce an error page: the message is stashed in the
//! session as a flash and the browser is redirected back to the form.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use super::pages::{render_page, MessageKind};
use crate::auth::session;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::Registration;
use crate::services::{AccountService, ServiceError};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

const LOGIN_BODY: &str = r#"<main class="auth">
  <h1>Sign in</h1>
  <form method="post" action="/login">
    <label>Username <input type="text" name="username" autocomplete="username" required></label>
    <label>Password <input type="password" name="password" autocomplete="current-password" required></label>
    <button type="submit">Login</button>
  </form>
  <p>No account? <a href="/register">Register</a></p>
</main>"#;

const REGISTER_BODY: &str = r#"<main class="auth">
  <h1>Create account</h1>
  <form method="post" action="/register">
    <label>Username <input type="text" name="username" autocomplete="username" required></label>
    <label>Email <input type="email" name="email" autocomplete="email"></label>
    <label>Contact number <input type="tel" name="contact_number" autocomplete="tel"></label>
    <label>Password <input type="password" name="password" autocomplete="new-password" required></label>
    <label>Confirm password <input type="password" name="confirm_password" autocomplete="new-password" required></label>
    <button type="submit">Register</button>
  </form>
  <p>Already registered? <a href="/login">Login</a></p>
</main>"#;

/// Outcome markers appended to `/login` by redirects
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
    pub registered: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login
async fn login_page(
    session: Session,
    Query(query): Query<LoginQuery>,
) -> Result<Html<String>, ApiError> {
    let flash = session::take_flash(&session).await?;

    let message = if query.error.is_some() {
        Some((
            MessageKind::Error,
            flash.unwrap_or_else(|| INVALID_CREDENTIALS.to_string()),
        ))
    } else if query.logout.is_some() {
        Some((
            MessageKind::Info,
            "You have been logged out successfully".to_string(),
        ))
    } else if query.registered.is_some() {
        Some((
            MessageKind::Info,
            "Registration successful! Please login.".to_string(),
        ))
    } else {
        flash.map(|text| (MessageKind::Error, text))
    };

    Ok(render_page("Login", LOGIN_BODY, message, &[], None))
}

/// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, ApiError> {
    match AccountService::new(&state.pool)
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(user) => {
            session::sign_in(&session, user.id, &user.username).await?;
            Ok(Redirect::to("/"))
        }
        Err(ServiceError::Authentication) => {
            session::set_flash(&session, INVALID_CREDENTIALS).await?;
            Ok(Redirect::to("/login?error"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /register
async fn register_page(session: Session) -> Result<Html<String>, ApiError> {
    let message = session::take_flash(&session)
        .await?
        .map(|text| (MessageKind::Error, text));

    Ok(render_page("Register", REGISTER_BODY, message, &[], None))
}

/// POST /register
async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<Registration>,
) -> Result<Redirect, ApiError> {
    match AccountService::new(&state.pool).register(form).await {
        Ok(_) => Ok(Redirect::to("/login?registered")),
        Err(ServiceError::Validation(e)) => {
            tracing::debug!(reason = %e, "registration rejected");
            session::set_flash(&session, e.to_string()).await?;
            Ok(Redirect::to("/register"))
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /logout
async fn logout(session: Session) -> Result<Redirect, ApiError> {
    session::sign_out(&session).await?;
    Ok(Redirect::to("/login?logout"))
}

/// Auth form routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
}
