//! End-to-end tests driving the full router with `oneshot`.
//!
//! Each `Client` carries its own session cookie, so two clients act as two
//! browsers against the same in-memory database.

use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use screenctl_core::AccessMode;
use screenctl_server::db::connect_memory;
use screenctl_server::{build_app, ServerConfig};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestServer {
    router: Router,
    _uploads: TempDir,
}

impl TestServer {
    async fn start(mode: AccessMode) -> Self {
        Self::start_with(ServerConfig {
            access_mode: mode,
            ..ServerConfig::default()
        })
        .await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let uploads = TempDir::new().unwrap();
        let pool = connect_memory().await.unwrap();
        let config = ServerConfig {
            upload_dir: uploads.path().to_path_buf(),
            ..config
        };
        let router = build_app(pool, config).await.unwrap();
        Self {
            router,
            _uploads: uploads,
        }
    }
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

#[derive(Default)]
struct Client {
    cookie: Option<String>,
}

impl Client {
    async fn send(&mut self, server: &TestServer, mut request: Request<Body>) -> Reply {
        if let Some(cookie) = &self.cookie {
            request
                .headers_mut()
                .insert(header::COOKIE, cookie.parse().unwrap());
        }

        let response = server.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
            self.cookie = Some(pair);
        }

        let status = response.status();
        let header_str = |name| {
            response
                .headers()
                .get(name)
                .map(|v: &header::HeaderValue| v.to_str().unwrap().to_string())
        };
        let location = header_str(header::LOCATION);
        let content_type = header_str(header::CONTENT_TYPE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

        Reply {
            status,
            location,
            content_type,
            body,
        }
    }

    async fn get(&mut self, server: &TestServer, uri: &str) -> Reply {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(server, request).await
    }

    async fn json(&mut self, server: &TestServer, method: &str, uri: &str, body: Value) -> Reply {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(server, request).await
    }

    async fn delete(&mut self, server: &TestServer, uri: &str) -> Reply {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(server, request).await
    }

    async fn form(&mut self, server: &TestServer, uri: &str, body: &str) -> Reply {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(server, request).await
    }

    async fn register_and_login(&mut self, server: &TestServer, username: &str) {
        let body = format!(
            "username={u}&email={u}%40x.com&contact_number=1234567890&password=Secret1%21&confirm_password=Secret1%21",
            u = username
        );
        let reply = self.form(server, "/register", &body).await;
        assert_eq!(reply.location.as_deref(), Some("/login?registered"));

        let body = format!("username={}&password=Secret1%21", username);
        let reply = self.form(server, "/login", &body).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER);
        assert_eq!(reply.location.as_deref(), Some("/"));
    }
}

fn multipart(filename: &str, data: &[u8]) -> Request<Body> {
    let boundary = "screenctl-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/upload/icon")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn register_login_and_list_empty() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut alice = Client::default();

    alice.register_and_login(&server, "alice").await;

    let reply = alice.get(&server, "/api/applications").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!([]));
}

#[tokio::test]
async fn api_without_session_is_unauthorized() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut anonymous = Client::default();

    let reply = anonymous.get(&server, "/api/applications").await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.json()["error"], "unauthenticated");
}

#[tokio::test]
async fn guest_mode_application_and_screen_flow() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let app = guest
        .json(&server, "POST", "/api/applications", json!({"name": "App1"}))
        .await;
    assert_eq!(app.status, StatusCode::OK);
    let app = app.json();
    assert_eq!(app["name"], "App1");
    assert!(app["guestId"].is_i64());
    assert!(app["userId"].is_null());

    let screen = guest
        .json(
            &server,
            "POST",
            "/api/screens",
            json!({"applicationId": app["id"], "name": "Home", "layoutJson": "{}"}),
        )
        .await;
    assert_eq!(screen.status, StatusCode::OK);

    let uri = format!("/api/screens/application/{}", app["id"]);
    let screens = guest.get(&server, &uri).await.json();
    let screens = screens.as_array().unwrap();
    assert_eq!(screens.len(), 1);
    assert_eq!(screens[0]["name"], "Home");
    assert_eq!(screens[0]["layoutJson"], "{}");
}

#[tokio::test]
async fn duplicate_names_conflict() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let first = guest
        .json(&server, "POST", "/api/applications", json!({"name": "App1"}))
        .await;
    let second = guest
        .json(&server, "POST", "/api/applications", json!({"name": "App1"}))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::CONFLICT);

    let app_id = first.json()["id"].clone();
    let screen = json!({"applicationId": app_id, "name": "Home", "layoutJson": "[]"});
    guest.json(&server, "POST", "/api/screens", screen.clone()).await;
    let dup = guest.json(&server, "POST", "/api/screens", screen).await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.json()["error"], "conflict");
}

#[tokio::test]
async fn non_owner_cannot_modify() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut alice = Client::default();
    let mut bob = Client::default();
    alice.register_and_login(&server, "alice").await;
    bob.register_and_login(&server, "bob").await;

    let app = alice
        .json(&server, "POST", "/api/applications", json!({"name": "Mine"}))
        .await
        .json();
    let uri = format!("/api/applications/{}", app["id"]);

    let update = bob
        .json(&server, "PUT", &uri, json!({"name": "Stolen"}))
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);

    let delete = bob.delete(&server, &uri).await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    let screen = bob
        .json(
            &server,
            "POST",
            "/api/screens",
            json!({"applicationId": app["id"], "name": "Home", "layoutJson": "[]"}),
        )
        .await;
    assert_eq!(screen.status, StatusCode::FORBIDDEN);

    // bob's own list does not include alice's application
    assert_eq!(bob.get(&server, "/api/applications").await.json(), json!([]));
}

#[tokio::test]
async fn update_application_and_screen_layout() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let app = guest
        .json(
            &server,
            "POST",
            "/api/applications",
            json!({"name": "App", "iconPath": "/uploads/icon_a.png"}),
        )
        .await
        .json();
    let app_uri = format!("/api/applications/{}", app["id"]);

    let renamed = guest
        .json(&server, "PUT", &app_uri, json!({"name": "Renamed", "iconPath": ""}))
        .await
        .json();
    assert_eq!(renamed["name"], "Renamed");
    assert_eq!(renamed["iconPath"], "/uploads/icon_a.png");

    let screen = guest
        .json(
            &server,
            "POST",
            "/api/screens",
            json!({
                "applicationId": app["id"],
                "name": "Home",
                "layoutJson": "[]",
                "screenImagePath": "/uploads/home.png"
            }),
        )
        .await
        .json();
    let layout_uri = format!("/api/screens/{}/layout", screen["id"]);

    let updated = guest
        .json(&server, "PUT", &layout_uri, json!({"layoutJson": "[{\"id\":\"b1\"}]"}))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    let updated = updated.json();
    assert_eq!(updated["name"], "Home");
    assert_eq!(updated["screenImagePath"], "/uploads/home.png");
    assert_eq!(updated["layoutJson"], "[{\"id\":\"b1\"}]");

    let missing = guest.json(&server, "PUT", &layout_uri, json!({})).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_application_deletes_screens() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let app = guest
        .json(&server, "POST", "/api/applications", json!({"name": "App"}))
        .await
        .json();
    let screen = guest
        .json(
            &server,
            "POST",
            "/api/screens",
            json!({"applicationId": app["id"], "name": "Home", "layoutJson": "[]"}),
        )
        .await
        .json();

    let deleted = guest
        .delete(&server, &format!("/api/applications/{}", app["id"]))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = guest
        .get(&server, &format!("/api/screens/{}", screen["id"]))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_resources_are_404() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    assert_eq!(
        guest.get(&server, "/api/applications/999").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        guest.get(&server, "/api/screens/application/999").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        guest.delete(&server, "/api/screens/999").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn bad_requests_share_error_shape() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let request = Request::builder()
        .method("POST")
        .uri("/api/applications")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let malformed = guest.send(&server, request).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.json()["error"], "validation_error");

    let blank = guest
        .json(&server, "POST", "/api/applications", json!({"name": "  "}))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let bad_id = guest.get(&server, "/api/applications/abc").await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn icon_upload_round_trip() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let reply = guest.send(&server, multipart("logo.png", b"PNGDATA")).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("text/plain"));

    let path = reply.text();
    assert!(path.starts_with("/uploads/icon_"));
    assert!(path.ends_with(".png"));

    let served = guest.get(&server, &path).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.body, b"PNGDATA");
}

#[tokio::test]
async fn icon_upload_without_extension_fails() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let reply = guest.send(&server, multipart("logo", b"data")).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["error"], "upload_failed");
}

#[tokio::test]
async fn pages_redirect_to_login_without_session() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut anonymous = Client::default();

    for uri in ["/", "/designer/1", "/designer/1/screen/2"] {
        let reply = anonymous.get(&server, uri).await;
        assert_eq!(reply.status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(reply.location.as_deref(), Some("/login"), "{uri}");
    }
}

#[tokio::test]
async fn guest_pages_render_with_data() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let app = guest
        .json(&server, "POST", "/api/applications", json!({"name": "</script>"}))
        .await
        .json();

    let home = guest.get(&server, "/").await;
    assert_eq!(home.status, StatusCode::OK);
    let html = home.text();
    assert!(html.contains("window.applicationsData"));
    assert!(!html.contains("\"</script>\""));

    let designer = guest
        .get(&server, &format!("/designer/{}", app["id"]))
        .await;
    assert_eq!(designer.status, StatusCode::OK);
    let html = designer.text();
    assert!(html.contains("window.currentScreenData"));
    assert!(html.contains("New Screen"));
}

#[tokio::test]
async fn designer_redirects_on_unknown_targets() {
    let server = TestServer::start(AccessMode::Guest).await;
    let mut guest = Client::default();

    let unknown_app = guest.get(&server, "/designer/999").await;
    assert_eq!(unknown_app.location.as_deref(), Some("/"));

    let first = guest
        .json(&server, "POST", "/api/applications", json!({"name": "One"}))
        .await
        .json();
    let second = guest
        .json(&server, "POST", "/api/applications", json!({"name": "Two"}))
        .await
        .json();
    let screen = guest
        .json(
            &server,
            "POST",
            "/api/screens",
            json!({"applicationId": second["id"], "name": "Home", "layoutJson": "[]"}),
        )
        .await
        .json();

    // screen exists but belongs to another application
    let wrong_parent = guest
        .get(
            &server,
            &format!("/designer/{}/screen/{}", first["id"], screen["id"]),
        )
        .await;
    assert_eq!(
        wrong_parent.location,
        Some(format!("/designer/{}", first["id"]))
    );

    let ok = guest
        .get(
            &server,
            &format!("/designer/{}/screen/{}", second["id"], screen["id"]),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
}

#[tokio::test]
async fn failed_login_flashes_message() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut visitor = Client::default();

    let reply = visitor
        .form(&server, "/login", "username=ghost&password=nope1%21")
        .await;
    assert_eq!(reply.location.as_deref(), Some("/login?error"));

    let page = visitor.get(&server, "/login?error").await.text();
    assert!(page.contains("Invalid username or password"));
}

#[tokio::test]
async fn invalid_registration_returns_to_form_with_reason() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut visitor = Client::default();

    let reply = visitor
        .form(
            &server,
            "/register",
            "username=al&password=Secret1%21&confirm_password=Secret1%21",
        )
        .await;
    assert_eq!(reply.location.as_deref(), Some("/register"));

    let page = visitor.get(&server, "/register").await.text();
    assert!(page.contains("username must be at least 3 characters"));
}

#[tokio::test]
async fn logout_ends_session() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let mut alice = Client::default();
    alice.register_and_login(&server, "alice").await;

    let reply = alice.get(&server, "/logout").await;
    assert_eq!(reply.location.as_deref(), Some("/login?logout"));

    let after = alice.get(&server, "/api/applications").await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_version() {
    let server = TestServer::start(AccessMode::Authenticated).await;
    let reply = Client::default().get(&server, "/health").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
    assert_eq!(reply.json()["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn designer_assets_are_served() {
    let server = TestServer::start_with(ServerConfig {
        access_mode: AccessMode::Guest,
        static_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../static"),
        ..ServerConfig::default()
    })
    .await;
    let mut guest = Client::default();

    let script = guest.get(&server, "/static/js/designer.js").await;
    assert_eq!(script.status, StatusCode::OK);
    let source = script.text();
    assert!(source.contains("window.currentScreenData"));
    assert!(source.contains("/layout"));

    let home = guest.get(&server, "/static/js/home.js").await;
    assert_eq!(home.status, StatusCode::OK);
    assert!(home.text().contains("window.applicationsData"));

    let css = guest.get(&server, "/static/css/style.css").await;
    assert_eq!(css.status, StatusCode::OK);
    assert!(css.content_type.unwrap().starts_with("text/css"));
}
