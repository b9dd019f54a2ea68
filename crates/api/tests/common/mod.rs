#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use batdeck_api::config::ServerConfig;
use batdeck_api::router::build_app_router;
use batdeck_api::state::AppState;

/// Body of the fixture's `deploy.bat`.
pub const DEPLOY_SCRIPT: &str = "#!/bin/sh\necho deploying\n";

/// Build a test `ServerConfig` rooted at `dir`.
///
/// The catalogue lives at `<dir>/config.toml`; the static directory does
/// not exist, so no asset fallback is mounted.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        catalog_path: dir.join("config.toml"),
        static_dir: dir.join("static"),
        expose_self_config: true,
    }
}

/// Forward-slash form of `path`, safe inside a TOML basic string.
pub fn toml_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Write a script into `dir`, executable on Unix.
pub fn write_script(dir: &Path, name: &str, body: &str) {
    std::fs::create_dir_all(dir).expect("create script dir");
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod");
    }
}

/// Build the full application router for a catalogue document `catalog`
/// written to `<dir>/config.toml` (skipped when `None`).
pub fn build_test_app(dir: &Path, catalog: Option<&str>) -> Router {
    if let Some(text) = catalog {
        std::fs::write(dir.join("config.toml"), text).expect("write catalogue");
    }
    let state = AppState::from_config(test_config(dir));
    build_app_router(state)
}

/// The reference fixture: `./scripts/deploy.bat` annotated as `prod deploy`.
pub fn deploy_fixture() -> (TempDir, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_script(&dir.path().join("scripts"), "deploy.bat", DEPLOY_SCRIPT);
    let catalog = r#"
[discovery]
roots = ["./scripts"]

[annotations]
"deploy.bat" = "prod deploy"
"#;
    let app = build_test_app(dir.path(), Some(catalog));
    (dir, app)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(app: Router, uri: &str, form: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body, optionally without any content type.
pub async fn post_raw(
    app: Router,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(body.into()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
