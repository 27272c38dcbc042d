#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use storefront_api::config::AppConfig;
use storefront_api::db::{establish_connection_with_config, run_migrations, DbConfig};
use storefront_api::services::users::CreateAdminInput;
use storefront_api::{app_router, AppState};

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "secret";

/// Full application wired to an in-memory SQLite database. Each instance is
/// isolated; the single-connection pool keeps the in-memory database alive.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(|_| {}).await
    }

    pub async fn spawn_with_config(customize: impl FnOnce(&mut AppConfig)) -> Self {
        let db_config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = establish_connection_with_config(&db_config)
            .await
            .expect("failed to open in-memory database");
        run_migrations(&pool).await.expect("migrations failed");

        let mut config = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        customize(&mut config);
        let state = AppState::new(Arc::new(pool), config);

        state
            .users
            .create_admin(CreateAdminInput {
                nombre: "Test Admin".to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            })
            .await
            .expect("failed to create test admin");

        Self {
            router: app_router(state.clone()),
            state,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("invalid request"),
        )
        .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.request(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("invalid request"),
        )
        .await
    }

    /// Logs in as the test admin and returns the session cookie value.
    pub async fn login(&self) -> String {
        let response = self
            .post_json(
                "/admin/login",
                json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        response
            .headers()
            .get(header::SET_COOKIE)
            .expect("login did not set a cookie")
            .to_str()
            .expect("cookie is not valid UTF-8")
            .split(';')
            .next()
            .expect("empty cookie")
            .to_string()
    }

    pub async fn authed_get(&self, uri: &str, cookie: &str) -> Response<Body> {
        self.request(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .expect("invalid request"),
        )
        .await
    }

    pub async fn authed_json(
        &self,
        method: &str,
        uri: &str,
        cookie: &str,
        body: Value,
    ) -> Response<Body> {
        self.request(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(body.to_string()))
                .expect("invalid request"),
        )
        .await
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

/// Creates an active product through the service layer and returns its id.
pub async fn seed_product(app: &TestApp, titulo: &str, tipo: &str, precio: &str) -> i32 {
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use storefront_api::services::catalog::CreateProductInput;

    let product = app
        .state
        .catalog
        .create_product(CreateProductInput {
            titulo: titulo.to_string(),
            tipo: tipo.to_string(),
            descripcion: None,
            precio: Decimal::from_str(precio).expect("bad price literal"),
            fecha_salida: None,
            image: None,
        })
        .await
        .expect("failed to seed product");

    product.id
}
