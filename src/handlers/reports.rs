use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::ServiceError;
use crate::handlers::sales::SaleDto;
use crate::handlers::DateRangeQuery;
use crate::services::reports::{LoginAuditEntry, SummaryStatistics, TopProductRow};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopQuery {
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductDto {
    pub id: i32,
    pub titulo: String,
    pub tipo: String,
    pub total_vendido: i64,
}

impl From<TopProductRow> for TopProductDto {
    fn from(row: TopProductRow) -> Self {
        Self {
            id: row.id,
            titulo: row.titulo,
            tipo: row.tipo,
            total_vendido: row.total_vendido,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleStatsDto {
    pub total: u64,
    pub monto_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductStatsDto {
    pub activos: u64,
    pub inactivos: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStatsDto {
    pub total: u64,
    pub promedio: f64,
    pub recomiendan: u64,
    pub no_recomiendan: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsDto {
    pub ventas: SaleStatsDto,
    pub productos: ProductStatsDto,
    pub encuestas: SurveyStatsDto,
}

impl From<SummaryStatistics> for StatisticsDto {
    fn from(stats: SummaryStatistics) -> Self {
        Self {
            ventas: SaleStatsDto {
                total: stats.sales.total,
                monto_total: stats.sales.monto_total,
            },
            productos: ProductStatsDto {
                activos: stats.products.activos,
                inactivos: stats.products.inactivos,
                total: stats.products.total,
            },
            encuestas: SurveyStatsDto {
                total: stats.surveys.total,
                promedio: stats.surveys.promedio,
                recomiendan: stats.surveys.recomiendan,
                no_recomiendan: stats.surveys.no_recomiendan,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginLogUserDto {
    pub nombre: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogDto {
    pub id: i32,
    pub fecha: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub usuario: LoginLogUserDto,
}

impl From<LoginAuditEntry> for LoginLogDto {
    fn from(entry: LoginAuditEntry) -> Self {
        Self {
            id: entry.id,
            fecha: entry.fecha,
            ip: entry.ip,
            user_agent: entry.user_agent,
            usuario: LoginLogUserDto {
                nombre: entry.admin_name,
                email: entry.admin_email,
            },
        }
    }
}

/// Top products by units sold
#[utoipa::path(
    get,
    path = "/api/registros/productos-mas-vendidos",
    params(TopQuery),
    responses((status = 200, description = "Volume ranking", body = [TopProductDto])),
    tag = "registros"
)]
pub async fn top_products(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopProductDto>>, ServiceError> {
    let rows = state.reports.top_products_by_volume(query.limit).await?;
    Ok(Json(rows.into_iter().map(TopProductDto::from).collect()))
}

/// Most valuable sales
#[utoipa::path(
    get,
    path = "/api/registros/ventas-mas-caras",
    params(TopQuery),
    responses((status = 200, description = "Value ranking", body = [SaleDto])),
    tag = "registros"
)]
pub async fn top_sales(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<SaleDto>>, ServiceError> {
    let records = state.reports.top_sales_by_value(query.limit).await?;
    Ok(Json(records.into_iter().map(SaleDto::from).collect()))
}

/// Store-wide summary statistics
#[utoipa::path(
    get,
    path = "/api/registros/estadisticas",
    responses((status = 200, description = "Summary statistics", body = StatisticsDto)),
    tag = "registros"
)]
pub async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsDto>, ServiceError> {
    let stats = state.reports.summary_statistics().await?;
    Ok(Json(StatisticsDto::from(stats)))
}

/// Login audit trail
#[utoipa::path(
    get,
    path = "/api/registros/logs-login",
    params(DateRangeQuery),
    responses((status = 200, description = "Login events, newest first", body = [LoginLogDto])),
    tag = "registros"
)]
pub async fn login_logs(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<LoginLogDto>>, ServiceError> {
    let entries = state.reports.login_audit(range.desde, range.hasta).await?;
    Ok(Json(entries.into_iter().map(LoginLogDto::from).collect()))
}
