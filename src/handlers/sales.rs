use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::services::sales::{RecordSaleRequest, SaleItemRequest, SaleLine, SaleRecord};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemPayload {
    pub producto_id: i32,
    pub cantidad: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub cliente_nombre: String,
    pub items: Vec<SaleItemPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDto {
    pub producto_id: i32,
    pub titulo: String,
    pub cantidad: i32,
    pub precio_unitario: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: i32,
    pub cliente_nombre: String,
    pub fecha: DateTime<Utc>,
    pub total: Decimal,
    pub items: Vec<SaleLineDto>,
}

impl From<SaleLine> for SaleLineDto {
    fn from(line: SaleLine) -> Self {
        Self {
            producto_id: line.product_id,
            titulo: line.title,
            cantidad: line.quantity,
            precio_unitario: line.unit_price,
        }
    }
}

impl From<SaleRecord> for SaleDto {
    fn from(record: SaleRecord) -> Self {
        Self {
            id: record.id,
            cliente_nombre: record.customer_name,
            fecha: record.date,
            total: record.total,
            items: record.items.into_iter().map(SaleLineDto::from).collect(),
        }
    }
}

/// Record a new sale
#[utoipa::path(
    post,
    path = "/api/ventas",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Sale recorded", body = SaleDto),
        (status = 400, description = "Invalid payload or inactive product"),
        (status = 404, description = "Unknown product")
    ),
    tag = "ventas"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, ServiceError> {
    let record = state
        .sales
        .record_sale(RecordSaleRequest {
            customer_name: payload.cliente_nombre,
            items: payload
                .items
                .into_iter()
                .map(|item| SaleItemRequest {
                    product_id: item.producto_id,
                    quantity: item.cantidad,
                })
                .collect(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(SaleDto::from(record))))
}

/// List all sales, newest first
#[utoipa::path(
    get,
    path = "/api/ventas",
    responses((status = 200, description = "All sales", body = [SaleDto])),
    tag = "ventas"
)]
pub async fn list_sales(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleDto>>, ServiceError> {
    let records = state.sales.list_sales().await?;
    Ok(Json(records.into_iter().map(SaleDto::from).collect()))
}

/// Get one sale by id
#[utoipa::path(
    get,
    path = "/api/ventas/{id}",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale found", body = SaleDto),
        (status = 404, description = "Sale not found")
    ),
    tag = "ventas"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<SaleDto>, ServiceError> {
    let record = state.sales.get_sale(id).await?;
    Ok(Json(SaleDto::from(record)))
}
