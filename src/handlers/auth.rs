use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::auth::{clear_session_cookie, session_cookie, session_token_from_headers};
use crate::errors::ServiceError;
use crate::services::users::LoginContext;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

fn login_context(headers: &HeaderMap) -> LoginContext {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    LoginContext { ip, user_agent }
}

/// Admin login
#[utoipa::path(
    post,
    path = "/admin/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Session created"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled")
    ),
    tag = "admin"
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ServiceError::ValidationError(
            "Email and password are required".to_string(),
        ));
    }

    let context = login_context(&headers);
    let user = state
        .users
        .authenticate(&payload.email, &payload.password, context)
        .await?;

    let token = state.sessions.create(user.id).await;
    let cookie = session_cookie(&token, Duration::from_secs(state.config.session_ttl_secs));

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "ok": true,
            "usuario": { "id": user.id, "nombre": user.nombre, "email": user.email }
        })),
    ))
}

/// Admin logout
#[utoipa::path(
    post,
    path = "/admin/logout",
    responses((status = 200, description = "Session destroyed")),
    tag = "admin"
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token_from_headers(&headers) {
        state.sessions.destroy(&token).await;
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "ok": true })),
    )
}
