use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::survey;
use crate::errors::ServiceError;
use crate::handlers::DateRangeQuery;
use crate::services::surveys::SubmitSurveyInput;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDto {
    pub id: i32,
    pub email: Option<String>,
    pub comentario: Option<String>,
    pub recomendar: bool,
    pub puntuacion: i32,
    pub imagen: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<survey::Model> for SurveyDto {
    fn from(model: survey::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            comentario: model.comentario,
            recomendar: model.recomendar,
            puntuacion: model.puntuacion,
            imagen: model.imagen,
            created_at: model.created_at,
        }
    }
}

const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Saves an uploaded image under the configured directory with a random
/// filename, keeping the original extension. Only image files are accepted.
/// Returns the public URL path.
async fn store_image(
    upload_dir: &str,
    original_name: Option<&str>,
    bytes: &[u8],
) -> Result<String, ServiceError> {
    let extension = original_name
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .filter(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            ServiceError::ValidationError(
                "Only image uploads are allowed (png, jpg, jpeg, gif, webp)".to_string(),
            )
        })?;
    let filename = format!("{}.{}", Uuid::new_v4(), extension);
    let path = FsPath::new(upload_dir).join(&filename);

    tokio::fs::write(&path, bytes).await.map_err(|e| {
        warn!(error = %e, "Failed to store survey image");
        ServiceError::InternalError("Could not store uploaded image".to_string())
    })?;

    Ok(format!("/public/images/{}", filename))
}

/// Submit a customer survey (multipart form, optional image)
#[utoipa::path(
    post,
    path = "/api/encuestas",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Survey recorded"),
        (status = 400, description = "Missing or invalid score")
    ),
    tag = "encuestas"
)]
pub async fn submit_survey(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServiceError> {
    let mut input = SubmitSurveyInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationError(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "email" => {
                input.email = Some(read_text(field).await?);
            }
            "comentario" => {
                input.comentario = Some(read_text(field).await?);
            }
            "recomendar" => {
                let value = read_text(field).await?;
                input.recomendar = value == "on" || value == "true";
            }
            "puntuacion" => {
                let value = read_text(field).await?;
                input.puntuacion = Some(value.trim().parse::<i32>().map_err(|_| {
                    ServiceError::ValidationError("Score must be an integer".to_string())
                })?);
            }
            "imagen" => {
                let original_name = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    ServiceError::ValidationError(format!("Failed to read image: {}", e))
                })?;
                if !bytes.is_empty() {
                    input.imagen = Some(
                        store_image(&state.config.upload_dir, original_name.as_deref(), &bytes)
                            .await?,
                    );
                }
            }
            _ => {}
        }
    }

    let survey = state.surveys.submit(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "encuesta": SurveyDto::from(survey) })),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ServiceError> {
    field
        .text()
        .await
        .map_err(|e| ServiceError::ValidationError(format!("Malformed multipart field: {}", e)))
}

/// List survey responses (admin)
#[utoipa::path(
    get,
    path = "/api/admin/encuestas",
    params(DateRangeQuery),
    responses((status = 200, description = "Survey responses, newest first")),
    tag = "encuestas"
)]
pub async fn list_surveys(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let surveys = state.surveys.list(range.desde, range.hasta).await?;
    let encuestas: Vec<SurveyDto> = surveys.into_iter().map(SurveyDto::from).collect();
    Ok(Json(json!({ "encuestas": encuestas })))
}
