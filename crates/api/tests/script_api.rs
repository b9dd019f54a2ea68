//! Integration tests for the keyed script endpoints and the listing call.
//!
//! Each test builds its own catalogue in a temp directory and drives the
//! full router (same middleware stack as production) with `oneshot`.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, body_text, get, post_form, post_raw};

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_pinned_returns_annotated_script() {
    let (_dir, app) = common::deploy_fixture();
    let response = get(app, "/list?filter=pinned").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().expect("data should be an array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "deploy.bat");
    assert_eq!(data[0]["name"], "scripts/deploy.bat");
    assert_eq!(data[0]["remark"], "prod deploy");
}

#[tokio::test]
async fn list_all_hides_self_config_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scripts = dir.path().join("scripts");
    common::write_script(&scripts, "deploy.bat", common::DEPLOY_SCRIPT);
    common::write_script(&scripts, "clean.bat", "#!/bin/sh\n");
    let app = common::build_test_app(dir.path(), Some("[discovery]\nroots = [\"scripts\"]\n"));

    let json = body_json(get(app.clone(), "/list").await).await;
    let ids: Vec<_> = json["data"]
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["clean.bat", "deploy.bat"]);

    let json = body_json(get(app, "/list?filter=key:@catalog").await).await;
    assert_eq!(json["data"][0]["id"], "@catalog");
    assert_eq!(json["data"][0]["name"], "config.toml");
}

#[tokio::test]
async fn list_rejects_unknown_filter() {
    let (_dir, app) = common::deploy_fixture();
    let response = get(app, "/list?filter=sideways").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Read / edit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn show_returns_file_bytes() {
    let (_dir, app) = common::deploy_fixture();
    let response = get(app, "/show?deploy.bat").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_text(response).await, common::DEPLOY_SCRIPT);
}

#[tokio::test]
async fn edit_replaces_whole_document() {
    let (dir, app) = common::deploy_fixture();

    let response = post_form(app.clone(), "/edit?deploy.bat", "value=echo+hi").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "编辑成功");

    let response = get(app, "/show?deploy.bat").await;
    assert_eq!(body_text(response).await, "echo hi");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("scripts/deploy.bat")).unwrap(),
        "echo hi"
    );
}

#[tokio::test]
async fn edit_without_content_type_still_saves() {
    let (dir, app) = common::deploy_fixture();

    let response = post_raw(app, "/edit?deploy.bat", None, "value=echo+plain").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "编辑成功");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("scripts/deploy.bat")).unwrap(),
        "echo plain"
    );
}

#[tokio::test]
async fn edit_without_value_field_reports_error_marker() {
    let (dir, app) = common::deploy_fixture();

    let response = post_raw(app, "/edit?deploy.bat", Some("text/plain"), "echo hi").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "error");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("scripts/deploy.bat")).unwrap(),
        common::DEPLOY_SCRIPT
    );
}

#[tokio::test]
async fn edit_accepts_documents_over_two_megabytes() {
    let (dir, app) = common::deploy_fixture();
    let document = "rem padding line\r\n".repeat(200_000);
    assert!(document.len() > 2 * 1024 * 1024);

    let form = format!("value={}", urlencoding::encode(&document));
    let response = post_form(app, "/edit?deploy.bat", &form).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "编辑成功");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("scripts/deploy.bat")).unwrap(),
        document
    );
}

#[tokio::test]
async fn edit_missing_file_reports_error_marker() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ghost_dir = dir.path().join("nowhere");
    let catalog = format!(
        "[scripts.\"ghost.bat\"]\nremark = \"declared only\"\npath = \"{}\"\n",
        common::toml_path(&ghost_dir)
    );
    let app = common::build_test_app(dir.path(), Some(&catalog));

    let response = post_form(app.clone(), "/edit?ghost.bat", "value=echo").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "error");
    assert!(!ghost_dir.join("ghost.bat").exists());

    // Reading it degrades to an empty body.
    let response = get(app, "/show?ghost.bat").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn self_config_serves_template_then_saves() {
    let dir = tempfile::tempdir().expect("tempdir");
    let app = common::build_test_app(dir.path(), None);

    let response = get(app.clone(), "/show?@catalog").await;
    assert_eq!(
        body_text(response).await,
        batdeck_core::catalog_config::DEFAULT_CATALOG_TEMPLATE
    );

    let response = post_form(app.clone(), "/edit?@catalog", "value=%5Bdiscovery%5D%0A").await;
    assert_eq!(body_text(response).await, "编辑成功");

    let response = get(app, "/show?@catalog").await;
    assert_eq!(body_text(response).await, "[discovery]\n");
}

#[tokio::test]
async fn percent_encoded_key_resolves() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_script(&dir.path().join("scripts"), "部署.bat", "echo 部署\n");
    let app = common::build_test_app(
        dir.path(),
        Some("[discovery]\nroots = [\"scripts\"]\n"),
    );

    let response = get(app, "/show?%E9%83%A8%E7%BD%B2.bat").await;
    assert_eq!(body_text(response).await, "echo 部署\n");
}

// ---------------------------------------------------------------------------
// Lookup misses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_key_is_a_silent_no_op() {
    let (dir, app) = common::deploy_fixture();

    for uri in ["/build?missing.bat", "/show?missing.bat", "/open?missing.bat", "/build"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_bytes(response).await.is_empty(), "{uri}");
    }

    let response = post_form(app.clone(), "/edit?missing.bat", "value=x").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
    assert!(!dir.path().join("scripts/missing.bat").exists());

    // The body is never looked at for an unknown key.
    let response = post_raw(app, "/edit?missing.bat", Some("application/json"), "{}").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[tokio::test]
async fn build_streams_script_stdout() {
    let (_dir, app) = common::deploy_fixture();
    let response = get(app, "/build?deploy.bat").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "deploying\n");
}

#[cfg(unix)]
#[tokio::test]
async fn build_keeps_running_after_client_disconnects() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_script(
        &dir.path().join("scripts"),
        "long.bat",
        "#!/bin/sh\necho first\nsleep 0.5\necho second\necho finished > done.txt\n",
    );
    let app = common::build_test_app(dir.path(), Some("[discovery]\nroots = [\"scripts\"]\n"));

    let response = get(app, "/build?long.bat").await;
    assert_eq!(response.status(), StatusCode::OK);
    drop(response);

    let marker = dir.path().join("scripts/done.txt");
    for _ in 0..100 {
        if marker.exists() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert!(marker.exists(), "script should finish after the response is dropped");
}

#[cfg(unix)]
#[tokio::test]
async fn build_runs_in_override_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scripts = dir.path().join("scripts");
    let staging = dir.path().join("staging");
    common::write_script(&scripts, "where.bat", "#!/bin/sh\necho primary\n");
    common::write_script(&staging, "where.bat", "#!/bin/sh\npwd\n");

    let catalog = format!(
        "[discovery]\nroots = [\"scripts\"]\n\n[scripts.\"where.bat\"]\nremark = \"staged\"\nenv = \"{}\"\n",
        common::toml_path(&staging)
    );
    let app = common::build_test_app(dir.path(), Some(&catalog));

    let body = body_text(get(app, "/build?where.bat").await).await;
    let reported = std::path::Path::new(body.trim()).canonicalize().unwrap();
    assert_eq!(reported, staging.canonicalize().unwrap());
}

#[cfg(unix)]
#[tokio::test]
async fn build_spawn_failure_still_answers_ok() {
    let dir = tempfile::tempdir().expect("tempdir");
    let scripts = dir.path().join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    // Not executable.
    std::fs::write(scripts.join("locked.bat"), "#!/bin/sh\necho hi\n").unwrap();
    let app = common::build_test_app(dir.path(), Some("[discovery]\nroots = [\"scripts\"]\n"));

    let response = get(app, "/build?locked.bat").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn detached_build_returns_immediately() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_script(
        &dir.path().join("scripts"),
        "bg.bat",
        "#!/bin/sh\necho started > started.txt\n",
    );
    let catalog = "[discovery]\nroots = [\"scripts\"]\n\n[execution]\nmode = \"detached\"\n";
    let app = common::build_test_app(dir.path(), Some(catalog));

    let response = get(app, "/build?bg.bat").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let marker = dir.path().join("scripts/started.txt");
    for _ in 0..100 {
        if marker.exists() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
    assert!(marker.exists(), "detached script should run in its directory");
}
