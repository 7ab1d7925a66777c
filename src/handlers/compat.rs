use axum::{Json, extract::State, http::StatusCode};

use crate::db::models::{CompatEntry, CompatLink};
use crate::db::{CompatRelation, NewCompat};
use crate::error::CatalogError;
use crate::handlers::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdminKey;
use crate::router::CatalogState;

/// POST /api/v1/compat/{relation}
pub async fn add(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiPath(relation): ApiPath<CompatRelation>,
    ApiJson(body): ApiJson<NewCompat>,
) -> Result<(StatusCode, Json<CompatLink>), CatalogError> {
    let row = state.storage.add_compat(relation, body).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/compat/{relation}/{left_id}/{right_id}
pub async fn remove(
    _admin: RequireAdminKey,
    State(state): State<CatalogState>,
    ApiPath((relation, left_id, right_id)): ApiPath<(CompatRelation, i64, i64)>,
) -> Result<StatusCode, CatalogError> {
    state.storage.remove_compat(relation, left_id, right_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/compat/{relation}/left/{id}
pub async fn for_left(
    State(state): State<CatalogState>,
    ApiPath((relation, id)): ApiPath<(CompatRelation, i64)>,
) -> Result<Json<Vec<CompatEntry>>, CatalogError> {
    Ok(Json(state.storage.compat_for_left(relation, id).await?))
}

/// GET /api/v1/compat/{relation}/right/{id}
pub async fn for_right(
    State(state): State<CatalogState>,
    ApiPath((relation, id)): ApiPath<(CompatRelation, i64)>,
) -> Result<Json<Vec<CompatEntry>>, CatalogError> {
    Ok(Json(state.storage.compat_for_right(relation, id).await?))
}
