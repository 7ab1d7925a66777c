//! Generic CRUD handlers shared by every catalog entity route.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::db::{CatalogEntity, ListFilter};
use crate::error::CatalogError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAdminKey;
use crate::router::CatalogState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// GET /api/v1/{kind}
pub async fn list<E: CatalogEntity>(
    State(state): State<CatalogState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<E>>, CatalogError> {
    let filter = ListFilter {
        q: query.q,
        limit: state.catalog.page_size(query.limit),
        offset: query.offset.unwrap_or(0),
    };
    Ok(Json(state.storage.list::<E>(&filter).await?))
}

/// GET /api/v1/{kind}/{slug}
pub async fn get<E: CatalogEntity>(
    State(state): State<CatalogState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<E>, CatalogError> {
    Ok(Json(state.storage.get_by_slug::<E>(&slug).await?))
}

/// POST /api/v1/{kind}
pub async fn create<E: CatalogEntity>(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiJson(draft): ApiJson<E::Draft>,
) -> Result<(StatusCode, Json<E>), CatalogError> {
    let row = state.storage.insert::<E>(draft).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/{kind}/{id}
pub async fn update<E: CatalogEntity>(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<E::Patch>,
) -> Result<Json<E>, CatalogError> {
    Ok(Json(state.storage.update::<E>(id, patch).await?))
}

/// DELETE /api/v1/{kind}/{id}
pub async fn delete<E: CatalogEntity>(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, CatalogError> {
    state.storage.delete::<E>(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
