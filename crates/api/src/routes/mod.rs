//! Route tables.
//!
//! ```text
//! GET  /health          service health
//! GET  /list?filter=..  catalogue projection (all | pinned | key:<key>)
//! GET  /build?{key}     run the script
//! GET  /show?{key}      read the script file
//! GET  /open?{key}      reveal the script directory
//! POST /edit?{key}      replace the script file (form field `value`)
//! ```

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{catalog, scripts};
use crate::state::AppState;

pub mod health;

/// Keyed script endpoints plus the listing call, mounted at the root.
pub fn script_routes() -> Router<AppState> {
    Router::new()
        .route("/list", get(catalog::list_entries))
        .route("/build", get(scripts::build))
        .route("/show", get(scripts::show))
        .route("/open", get(scripts::open_dir))
        .route(
            "/edit",
            post(scripts::edit).layer(DefaultBodyLimit::max(scripts::MAX_EDIT_BODY_BYTES)),
        )
}
