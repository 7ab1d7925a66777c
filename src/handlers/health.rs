use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::CatalogError;
use crate::router::CatalogState;

/// GET /health -> verifies the database answers a trivial query.
pub async fn health_check(State(state): State<CatalogState>) -> Result<Json<Value>, CatalogError> {
    sqlx::query("SELECT 1").execute(state.storage.pool()).await?;
    Ok(Json(json!({ "status": "ok" })))
}
