use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::db::SearchHit;
use crate::db::entities::{Emulator, Game, NewToolBundle, ToolBundle};
use crate::error::CatalogError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAdminKey;
use crate::router::CatalogState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<u32>,
}

/// GET /api/v1/search?q=... -> matches across every entity kind.
pub async fn search(
    State(state): State<CatalogState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<SearchHit>>, CatalogError> {
    let per_kind = state.catalog.page_size(query.limit);
    Ok(Json(state.storage.search(&query.q, per_kind).await?))
}

/// GET /api/v1/consoles/{slug}/games
pub async fn console_games(
    State(state): State<CatalogState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Vec<Game>>, CatalogError> {
    Ok(Json(state.storage.games_for_console(&slug).await?))
}

/// GET /api/v1/consoles/{slug}/emulators
pub async fn console_emulators(
    State(state): State<CatalogState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Vec<Emulator>>, CatalogError> {
    Ok(Json(state.storage.emulators_for_console(&slug).await?))
}

/// POST /api/v1/tool-bundles -> tool plus its links in one transaction.
pub async fn create_tool_bundle(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiJson(bundle): ApiJson<NewToolBundle>,
) -> Result<(StatusCode, Json<ToolBundle>), CatalogError> {
    let created = state.storage.create_tool_bundle(bundle).await?;
    info!(tool_id = created.tool.id, "tool bundle created via admin api");
    Ok((StatusCode::CREATED, Json(created)))
}
