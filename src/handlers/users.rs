use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::admin_user;
use crate::errors::ServiceError;
use crate::services::users::CreateAdminInput;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserPayload {
    pub nombre: String,
    pub email: String,
    pub password: String,
}

/// Admin account without the credential hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserDto {
    pub id: i32,
    pub nombre: String,
    pub email: String,
    pub estado: bool,
    pub created_at: DateTime<Utc>,
}

impl From<admin_user::Model> for AdminUserDto {
    fn from(model: admin_user::Model) -> Self {
        Self {
            id: model.id,
            nombre: model.nombre,
            email: model.email,
            estado: model.estado,
            created_at: model.created_at,
        }
    }
}

/// Create an admin account
#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Admin created", body = AdminUserDto),
        (status = 400, description = "Invalid payload or duplicate email")
    ),
    tag = "admin"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state
        .users
        .create_admin(CreateAdminInput {
            nombre: payload.nombre,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(AdminUserDto::from(user))))
}
