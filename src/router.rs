use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{BasicConfig, CatalogConfig, Config};
use crate::db::CatalogEntity;
use crate::db::CatalogStorage;
use crate::db::entities::{CfwApp, Console, CustomFirmware, Emulator, Game, Handheld, Tool};
use crate::error::CatalogError;
use crate::handlers::{catalog, compat, entities, health, links};

#[derive(Clone)]
pub struct CatalogState {
    pub storage: CatalogStorage,
    pub admin_key: Arc<str>,
    pub catalog: CatalogConfig,
}

impl CatalogState {
    pub fn new(storage: CatalogStorage, admin_key: Arc<str>, catalog: CatalogConfig) -> Self {
        Self {
            storage,
            admin_key,
            catalog,
        }
    }

    pub fn from_config(storage: CatalogStorage, cfg: &Config) -> Self {
        Self::new(
            storage,
            Arc::from(cfg.basic.admin_key.as_str()),
            cfg.catalog,
        )
    }
}

pub fn catalog_router(state: CatalogState, basic: &BasicConfig) -> Result<Router, CatalogError> {
    let cors = match basic.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>().map_err(|e| {
                CatalogError::Validation(format!("invalid cors_origin {origin:?}: {e}"))
            })?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(DefaultBodyLimit::max(basic.body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    Ok(app)
}

fn api_v1_routes() -> Router<CatalogState> {
    Router::new()
        .merge(entity_routes::<Console>("consoles"))
        .merge(entity_routes::<Game>("games"))
        .merge(entity_routes::<Emulator>("emulators"))
        .merge(entity_routes::<Handheld>("handhelds"))
        .merge(entity_routes::<CustomFirmware>("firmware"))
        .merge(entity_routes::<CfwApp>("cfw-apps"))
        .merge(entity_routes::<Tool>("tools"))
        .route("/consoles/{key}/games", get(catalog::console_games))
        .route("/consoles/{key}/emulators", get(catalog::console_emulators))
        .route("/search", get(catalog::search))
        .route("/tool-bundles", post(catalog::create_tool_bundle))
        // compatibility joins
        .route("/compat/{relation}", post(compat::add))
        .route("/compat/{relation}/left/{id}", get(compat::for_left))
        .route("/compat/{relation}/right/{id}", get(compat::for_right))
        .route(
            "/compat/{relation}/{left_id}/{right_id}",
            delete(compat::remove),
        )
        // links
        .route("/links", get(links::list_for_owner).post(links::create))
        .route(
            "/links/{id}",
            get(links::get).patch(links::update).delete(links::delete),
        )
}

/// Slug lookups and id-addressed writes share `/{path}/{key}`.
fn entity_routes<E: CatalogEntity>(path: &str) -> Router<CatalogState> {
    Router::new()
        .route(
            &format!("/{path}"),
            get(entities::list::<E>).post(entities::create::<E>),
        )
        .route(
            &format!("/{path}/{{key}}"),
            get(entities::get::<E>)
                .patch(entities::update::<E>)
                .delete(entities::delete::<E>),
        )
}
