pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod openapi;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{require_admin, InMemorySessionStore, SharedSessionStore};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::openapi::ApiDoc;
use crate::services::{
    AdminUserService, CatalogService, ReportService, SaleService, SurveyService,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub sessions: SharedSessionStore,
    pub catalog: CatalogService,
    pub sales: SaleService,
    pub reports: ReportService,
    pub surveys: SurveyService,
    pub users: AdminUserService,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let sessions: SharedSessionStore = Arc::new(InMemorySessionStore::new(
            Duration::from_secs(config.session_ttl_secs),
        ));

        Self {
            catalog: CatalogService::new(db.clone()),
            sales: SaleService::new(db.clone()),
            reports: ReportService::new(db.clone()),
            surveys: SurveyService::new(db.clone()),
            users: AdminUserService::new(db.clone()),
            db,
            config,
            sessions,
        }
    }
}

/// Builds the full application router: public storefront surface, the
/// session-gated admin surface, Swagger UI, and static file serving.
pub fn app_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/ventas", post(handlers::sales::create_sale))
        .route("/api/ventas", get(handlers::sales::list_sales))
        .route("/api/ventas/:id", get(handlers::sales::get_sale))
        .route("/api/productos", get(handlers::products::list_products))
        .route("/api/productos/:id", get(handlers::products::get_product))
        .route("/api/encuestas", post(handlers::surveys::submit_survey))
        .route("/api/usuarios", post(handlers::users::create_user))
        .route("/admin/login", post(handlers::auth::login));

    let admin_routes = Router::new()
        .route("/api/productos", post(handlers::products::create_product))
        .route("/api/productos/:id", put(handlers::products::update_product))
        .route(
            "/api/productos/:id",
            delete(handlers::products::deactivate_product),
        )
        .route(
            "/api/productos/:id/activar",
            put(handlers::products::activate_product),
        )
        .route(
            "/api/registros/productos-mas-vendidos",
            get(handlers::reports::top_products),
        )
        .route(
            "/api/registros/ventas-mas-caras",
            get(handlers::reports::top_sales),
        )
        .route(
            "/api/registros/estadisticas",
            get(handlers::reports::statistics),
        )
        .route(
            "/api/registros/logs-login",
            get(handlers::reports::login_logs),
        )
        .route("/api/admin/encuestas", get(handlers::surveys::list_surveys))
        .route("/admin/logout", post(handlers::auth::logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .route("/health", get(health_check))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/public", ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // No explicit origins configured. Credentials cannot travel with a
        // wildcard origin, so the cookie-based admin surface stays same-origin.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::COOKIE])
        .allow_credentials(config.cors_allow_credentials)
}

/// Liveness and database reachability probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "reachable" })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "database": e.to_string() })),
        ),
    }
}
