//! Browser pages
//!
//! Pages are static HTML shells. Dynamic data is handed to the client
//! scripts as JSON globals (`window.applicationData` etc.), never spliced
//! into markup.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use screenctl_core::Layout;
use serde_json::{json, Value};
use tower_sessions::Session;

use super::applications::ApplicationResponse;
use super::screens::ScreenResponse;
use crate::auth::session;
use crate::db::Application;
use crate::http::error::ApiError;
use crate::http::extractors::resolve_owner;
use crate::http::server::AppState;
use crate::models::Owner;
use crate::services::{ApplicationService, ScreenService, ServiceError};

/// Name given to the unsaved screen the designer opens with
const NEW_SCREEN_NAME: &str = "New Screen";

/// Shows the page's flash message, if any
const FLASH_SCRIPT: &str = r#"(function () {
  var m = window.pageMessage;
  if (!m) return;
  var el = document.getElementById("flash");
  el.textContent = m.text;
  el.className = "flash flash-" + m.kind;
  el.hidden = false;
})();"#;

/// Message shown at the top of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MessageKind {
    Info,
    Error,
}

/// Serialize `value` for inclusion inside a `<script>` element.
fn script_json(value: &Value) -> String {
    // '<', '>' and '&' only occur inside JSON strings, where \u escapes are valid
    value
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Render a page shell: static `body` markup, JSON globals, optional
/// client script under `/static/js/`.
pub(crate) fn render_page(
    title: &str,
    body: &str,
    message: Option<(MessageKind, String)>,
    globals: &[(&str, Value)],
    script: Option<&str>,
) -> Html<String> {
    let mut data = String::new();
    for (name, value) in globals {
        data.push_str(&format!("window.{} = {};\n", name, script_json(value)));
    }
    if let Some((kind, text)) = message {
        let kind = match kind {
            MessageKind::Info => "info",
            MessageKind::Error => "error",
        };
        let message = json!({ "kind": kind, "text": text });
        data.push_str(&format!("window.pageMessage = {};\n", script_json(&message)));
    }

    let client = script
        .map(|s| format!(r#"<script src="/static/js/{}"></script>"#, s))
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - Screen Designer</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<div id="flash" class="flash" hidden></div>
{body}
<script>
{data}{flash}
</script>
{client}
</body>
</html>
"#,
        title = title,
        body = body,
        data = data,
        flash = FLASH_SCRIPT,
        client = client,
    ))
}

/// Client scripts under `static/js/`
const HOME_SCRIPT: &str = "home.js";
const DESIGNER_SCRIPT: &str = "designer.js";

const HOME_BODY: &str = r#"<header class="topbar">
  <h1>My Applications</h1>
  <nav><span id="current-user"></span> <a href="/logout">Logout</a></nav>
</header>
<main>
  <form id="new-application" class="inline-form">
    <input type="text" name="name" placeholder="Application name" maxlength="100" required>
    <input type="file" name="icon" accept="image/*">
    <button type="submit">Create</button>
  </form>
  <p id="no-applications" class="empty" hidden>No applications yet.</p>
  <ul id="applications" class="card-list"></ul>
</main>
<dialog id="edit-application">
  <form id="edit-application-form" method="dialog">
    <h2>Edit application</h2>
    <input type="hidden" name="id">
    <label>Name <input type="text" name="name" maxlength="100" required></label>
    <div id="current-icon"></div>
    <label>New icon <input type="file" name="icon" accept="image/*"></label>
    <menu>
      <button type="button" id="edit-cancel">Cancel</button>
      <button type="submit">Save</button>
    </menu>
  </form>
</dialog>"#;

const DESIGNER_BODY: &str = r#"<header class="topbar">
  <a href="/">&larr; Applications</a>
  <h1 id="application-name"></h1>
  <span id="screen-name" class="screen-name"></span>
  <span id="save-status" class="save-status"></span>
  <button id="new-screen" type="button">New screen</button>
  <button id="save-screen" type="button">Save</button>
</header>
<div class="designer">
  <aside id="palette" class="palette"></aside>
  <section class="canvas-frame"><div id="canvas" class="canvas"></div></section>
  <aside class="sidebar">
    <h2>Screens</h2>
    <ul id="screens"></ul>
    <h2>Properties</h2>
    <div id="properties"><p class="empty">Select a component</p></div>
  </aside>
</div>"#;

fn redirect(to: &str) -> Response {
    Redirect::to(to).into_response()
}

/// Current display name for page headers.
async fn viewer(session: &Session, owner: Owner) -> Result<Value, ApiError> {
    let username = match owner {
        Owner::User(_) => session::username(session).await?,
        Owner::Guest(_) => None,
    };
    Ok(json!({
        "username": username,
        "guest": matches!(owner, Owner::Guest(_)),
    }))
}

/// Load an application the caller owns, or say where to send them instead.
async fn owned_application(
    state: &AppState,
    owner: Owner,
    raw_id: &str,
) -> Result<Result<Application, Response>, ApiError> {
    let Ok(id) = raw_id.parse::<i64>() else {
        return Ok(Err(redirect("/")));
    };

    match ApplicationService::new(&state.pool).get(id).await {
        Ok(app) if app.is_owned_by(owner) => Ok(Ok(app)),
        Ok(app) => {
            tracing::warn!(
                application_id = app.id,
                caller = %owner,
                "designer opened by non-owner"
            );
            Ok(Err(redirect("/")))
        }
        Err(ServiceError::NotFound { .. }) => Ok(Err(redirect("/"))),
        Err(e) => Err(e.into()),
    }
}

/// GET / - the caller's applications
async fn home(State(state): State<Arc<AppState>>, session: Session) -> Result<Response, ApiError> {
    let Some(owner) = resolve_owner(&state, &session).await? else {
        return Ok(redirect("/login"));
    };

    let apps: Vec<ApplicationResponse> = ApplicationService::new(&state.pool)
        .list(owner)
        .await?
        .into_iter()
        .map(ApplicationResponse::from)
        .collect();
    let flash = session::take_flash(&session).await?;

    Ok(render_page(
        "Applications",
        HOME_BODY,
        flash.map(|text| (MessageKind::Info, text)),
        &[
            ("applicationsData", json!(apps)),
            ("currentUser", viewer(&session, owner).await?),
        ],
        Some(HOME_SCRIPT),
    )
    .into_response())
}

/// GET /designer/{application_id} - designer with a fresh, unsaved screen
async fn designer(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(application_id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(owner) = resolve_owner(&state, &session).await? else {
        return Ok(redirect("/login"));
    };
    let app = match owned_application(&state, owner, &application_id).await? {
        Ok(app) => app,
        Err(to) => return Ok(to),
    };

    let screens = screen_list(&state, app.id).await?;
    let seed = json!({
        "id": null,
        "applicationId": app.id,
        "name": NEW_SCREEN_NAME,
        "layoutJson": Layout::empty().to_json(),
        "screenImagePath": null,
    });

    Ok(designer_page(app, screens, seed))
}

/// GET /designer/{application_id}/screen/{screen_id} - designer on a saved screen
async fn designer_screen(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((application_id, screen_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let Some(owner) = resolve_owner(&state, &session).await? else {
        return Ok(redirect("/login"));
    };
    let app = match owned_application(&state, owner, &application_id).await? {
        Ok(app) => app,
        Err(to) => return Ok(to),
    };

    let back = format!("/designer/{}", app.id);
    let Ok(screen_id) = screen_id.parse::<i64>() else {
        return Ok(redirect(&back));
    };
    let screen = match ScreenService::new(&state.pool).get(screen_id).await {
        Ok(screen) if screen.application_id == app.id => screen,
        Ok(_) | Err(ServiceError::NotFound { .. }) => return Ok(redirect(&back)),
        Err(e) => return Err(e.into()),
    };

    let screens = screen_list(&state, app.id).await?;
    let current = json!(ScreenResponse::from(screen));

    Ok(designer_page(app, screens, current))
}

async fn screen_list(
    state: &AppState,
    application_id: i64,
) -> Result<Vec<ScreenResponse>, ApiError> {
    Ok(ScreenService::new(&state.pool)
        .list(application_id)
        .await?
        .into_iter()
        .map(ScreenResponse::from)
        .collect())
}

fn designer_page(app: Application, screens: Vec<ScreenResponse>, current: Value) -> Response {
    render_page(
        "Designer",
        DESIGNER_BODY,
        None,
        &[
            ("applicationData", json!(ApplicationResponse::from(app))),
            ("screensData", json!(screens)),
            ("currentScreenData", current),
        ],
        Some(DESIGNER_SCRIPT),
    )
    .into_response()
}

/// Page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/designer/{application_id}", get(designer))
        .route(
            "/designer/{application_id}/screen/{screen_id}",
            get(designer_screen),
        )
}
