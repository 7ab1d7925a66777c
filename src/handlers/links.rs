use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::db::models::{EntityKind, Link, LinkPatch, NewLink};
use crate::error::CatalogError;
use crate::handlers::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::RequireAdminKey;
use crate::router::CatalogState;

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_kind: EntityKind,
    pub owner_id: i64,
}

pub async fn list_for_owner(
    State(state): State<CatalogState>,
    ApiQuery(owner): ApiQuery<OwnerQuery>,
) -> Result<Json<Vec<Link>>, CatalogError> {
    Ok(Json(
        state
            .storage
            .links_for(owner.owner_kind, owner.owner_id)
            .await?,
    ))
}

pub async fn get(
    State(state): State<CatalogState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Link>, CatalogError> {
    Ok(Json(state.storage.get_link(id).await?))
}

pub async fn create(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiJson(body): ApiJson<NewLink>,
) -> Result<(StatusCode, Json<Link>), CatalogError> {
    let link = state.storage.create_link(body).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn update(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(patch): ApiJson<LinkPatch>,
) -> Result<Json<Link>, CatalogError> {
    Ok(Json(state.storage.update_link(id, patch).await?))
}

pub async fn delete(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, CatalogError> {
    state.storage.delete_link(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
