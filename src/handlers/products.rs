use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::product;
use crate::errors::ServiceError;
use crate::services::catalog::{CreateProductInput, ProductListFilter, UpdateProductInput};
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i32,
    pub titulo: String,
    pub tipo: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub fecha_salida: DateTime<Utc>,
    pub estado: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<product::Model> for ProductDto {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            titulo: model.titulo,
            tipo: model.tipo,
            descripcion: model.descripcion,
            precio: model.precio,
            fecha_salida: model.fecha_salida,
            estado: model.estado,
            image: model.image,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub titulo: String,
    pub tipo: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub fecha_salida: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub titulo: String,
    pub tipo: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub fecha_salida: Option<DateTime<Utc>>,
    pub estado: Option<bool>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    pub tipo: Option<String>,
    pub activo: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPageDto {
    pub data: Vec<ProductDto>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// List products with optional filters and pagination
#[utoipa::path(
    get,
    path = "/api/productos",
    params(ProductListQuery),
    responses((status = 200, description = "Product page", body = ProductPageDto)),
    tag = "productos"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductPageDto>, ServiceError> {
    let page = state
        .catalog
        .list_products(ProductListFilter {
            tipo: query.tipo,
            activo: query.activo,
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(10),
        })
        .await?;

    Ok(Json(ProductPageDto {
        data: page.data.into_iter().map(ProductDto::from).collect(),
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
    }))
}

/// Get one product by id
#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductDto),
        (status = 404, description = "Product not found")
    ),
    tag = "productos"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDto>, ServiceError> {
    let product = state.catalog.get_product(id).await?;
    Ok(Json(ProductDto::from(product)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/api/productos",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Product created", body = ProductDto),
        (status = 400, description = "Invalid payload")
    ),
    tag = "productos"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = state
        .catalog
        .create_product(CreateProductInput {
            titulo: payload.titulo,
            tipo: payload.tipo,
            descripcion: payload.descripcion,
            precio: payload.precio,
            fecha_salida: payload.fecha_salida,
            image: payload.image,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductDto::from(product))))
}

/// Update a product
#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Product updated", body = ProductDto),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product not found")
    ),
    tag = "productos"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<ProductDto>, ServiceError> {
    let product = state
        .catalog
        .update_product(
            id,
            UpdateProductInput {
                titulo: payload.titulo,
                tipo: payload.tipo,
                descripcion: payload.descripcion,
                precio: payload.precio,
                fecha_salida: payload.fecha_salida,
                estado: payload.estado,
                image: payload.image,
            },
        )
        .await?;

    Ok(Json(ProductDto::from(product)))
}

/// Deactivate a product (soft delete)
#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deactivated", body = ProductDto),
        (status = 404, description = "Product not found")
    ),
    tag = "productos"
)]
pub async fn deactivate_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDto>, ServiceError> {
    let product = state.catalog.deactivate_product(id).await?;
    Ok(Json(ProductDto::from(product)))
}

/// Reactivate a product
#[utoipa::path(
    put,
    path = "/api/productos/{id}/activar",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product reactivated", body = ProductDto),
        (status = 404, description = "Product not found")
    ),
    tag = "productos"
)]
pub async fn activate_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDto>, ServiceError> {
    let product = state.catalog.activate_product(id).await?;
    Ok(Json(ProductDto::from(product)))
}
