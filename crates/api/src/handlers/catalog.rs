//! Catalogue listing for the UI shell.

use axum::extract::{Query, State};
use axum::Json;
use batdeck_core::entry::{EntryView, ListFilter};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `all` (default), `pinned` or `key:<key>`.
    pub filter: Option<String>,
}

/// GET /list?filter=...
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<EntryView>>>> {
    let filter: ListFilter = query.filter.as_deref().unwrap_or_default().parse()?;
    let data = state.registry.list_for_display(&filter);
    Ok(Json(DataResponse { data }))
}
