//! Handlers for the keyed script endpoints.
//!
//! Each request names its entry through the raw query string
//! (`/build?deploy.bat`). A key missing from the registry produces an empty
//! 200 and nothing else. Every other failure is logged and the response
//! still completes with 200; the UI shell relies on that contract.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::Uri;
use axum::response::Response;
use batdeck_core::entry::ScriptEntry;
use batdeck_core::reveal;
use batdeck_core::scripting::executor::ScriptExecutor;
use tokio_util::io::ReaderStream;

use crate::response;
use crate::state::AppState;

/// Body returned by `/edit` when the document was replaced.
pub const EDIT_SUCCESS_MARKER: &str = "编辑成功";

/// Body returned by `/edit` when the write failed.
pub const EDIT_FAILURE_MARKER: &str = "error";

/// Upper bound on an `/edit` body.
pub const MAX_EDIT_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Extract the `value` field from a url-encoded form body.
///
/// The content type is not checked. Returns `None` when the field is absent.
fn form_value(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(name, _)| name == "value")
        .map(|(_, value)| value.into_owned())
}

/// Resolve the raw query string of `uri` to a registry entry.
///
/// The raw query is tried first; a percent-decoded form is tried when the
/// raw one misses so non-ASCII file names sent by browsers still resolve.
fn lookup<'a>(state: &'a AppState, uri: &Uri) -> Option<&'a ScriptEntry> {
    let raw = uri.query().unwrap_or_default();
    if let Ok(entry) = state.registry.lookup(raw) {
        return Some(entry);
    }
    let decoded = urlencoding::decode(raw).ok()?;
    match state.registry.lookup(&decoded) {
        Ok(entry) => Some(entry),
        Err(e) => {
            tracing::debug!(path = %uri.path(), error = %e, "Registry lookup miss");
            None
        }
    }
}

/// GET /build?{key}
///
/// Launch the script. In attached mode the body streams the script's stdout
/// as it is produced; in detached mode, or when the spawn fails, the body is
/// empty.
pub async fn build(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(entry) = lookup(&state, &uri) else {
        return response::empty();
    };

    match state.executor.run(entry) {
        Ok(launch) => match launch.stdout {
            Some(stdout) => response::text(Body::from_stream(ReaderStream::new(stdout))),
            None => response::text(Body::empty()),
        },
        // Already logged by the executor; the request was still accepted.
        Err(_) => response::text(Body::empty()),
    }
}

/// GET /show?{key}
///
/// Return the entry's file contents (empty when unreadable).
pub async fn show(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(entry) = lookup(&state, &uri) else {
        return response::empty();
    };

    let bytes = state.content.read_all(entry).await;
    response::text(bytes)
}

/// GET /open?{key}
///
/// Show the entry's directory in the host file manager.
pub async fn open_dir(State(state): State<AppState>, uri: Uri) -> Response {
    let Some(entry) = lookup(&state, &uri) else {
        return response::empty();
    };

    reveal::reveal(entry);
    response::empty()
}

/// POST /edit?{key}
///
/// Replace the entry's file with the `value` form field. Answers with
/// [`EDIT_SUCCESS_MARKER`] or [`EDIT_FAILURE_MARKER`]. The body is parsed
/// only after the lookup, so a miss stays silent whatever was posted.
pub async fn edit(State(state): State<AppState>, uri: Uri, body: Bytes) -> Response {
    let Some(entry) = lookup(&state, &uri) else {
        return response::empty();
    };

    let Some(value) = form_value(&body) else {
        tracing::warn!(key = %entry.key, bytes = body.len(), "Edit request without a value field");
        return response::text(EDIT_FAILURE_MARKER);
    };

    match state.content.write_all(entry, value.as_bytes()).await {
        Ok(()) => response::text(EDIT_SUCCESS_MARKER),
        Err(_) => response::text(EDIT_FAILURE_MARKER),
    }
}
