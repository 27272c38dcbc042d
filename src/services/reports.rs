use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::{Alias, Expr, Func, SimpleExpr},
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::DbPool;
use crate::entities::{
    admin_user, login_event, product, sale, sale_item, survey, AdminUser as AdminUserEntity,
    LoginEvent as LoginEventEntity, Product as ProductEntity, Sale as SaleEntity,
    SaleItem as SaleItemEntity, Survey as SurveyEntity,
};
use crate::errors::ServiceError;
use crate::services::sales::{attach_lines, SaleRecord};

const DEFAULT_TOP_LIMIT: u64 = 10;
const LOGIN_AUDIT_LIMIT: u64 = 100;

/// One row of the sales-volume ranking.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct TopProductRow {
    pub id: i32,
    pub titulo: String,
    pub tipo: String,
    pub total_vendido: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaleStats {
    pub total: u64,
    pub monto_total: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductStats {
    pub activos: u64,
    pub inactivos: u64,
    pub total: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SurveyStats {
    pub total: u64,
    pub promedio: f64,
    pub recomiendan: u64,
    pub no_recomiendan: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub sales: SaleStats,
    pub products: ProductStats,
    pub surveys: SurveyStats,
}

/// Login audit row joined with the admin's display data.
#[derive(Debug, Serialize)]
pub struct LoginAuditEntry {
    pub id: i32,
    pub fecha: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub admin_name: String,
    pub admin_email: String,
}

#[derive(FromQueryResult)]
struct TotalSumRow {
    monto_total: Option<Decimal>,
}

// AVG over an integer column comes back as NUMERIC on Postgres, so this
// decodes as Decimal rather than f64.
#[derive(FromQueryResult)]
struct ScoreAvgRow {
    promedio: Option<Decimal>,
}

/// Converts an inclusive calendar-date range to timestamp bounds. The upper
/// bound extends to the end of that calendar day.
pub(crate) fn date_range_bounds(
    desde: Option<NaiveDate>,
    hasta: Option<NaiveDate>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let lower = desde.map(|d| d.and_time(NaiveTime::MIN).and_utc());
    let end_of_day = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap();
    let upper = hasta.map(|d| d.and_time(end_of_day).and_utc());
    (lower, upper)
}

/// Read-only aggregation over sales, products, surveys and login events.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Top products by total units sold. Products with zero recorded sales
    /// never appear. Ties resolve by product id, which keeps the order
    /// stable across runs.
    #[instrument(skip(self))]
    pub async fn top_products_by_volume(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<TopProductRow>, ServiceError> {
        let rows = SaleItemEntity::find()
            .inner_join(ProductEntity)
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Titulo)
            .column(product::Column::Tipo)
            .column_as(
                Expr::col((sale_item::Entity, sale_item::Column::Cantidad)).sum(),
                "total_vendido",
            )
            .group_by(product::Column::Id)
            .group_by(product::Column::Titulo)
            .group_by(product::Column::Tipo)
            .order_by_desc(Expr::col(Alias::new("total_vendido")))
            .order_by_asc(product::Column::Id)
            .limit(limit.unwrap_or(DEFAULT_TOP_LIMIT))
            .into_model::<TopProductRow>()
            .all(&*self.db)
            .await?;

        Ok(rows)
    }

    /// Most valuable sales, complete with resolved line items.
    #[instrument(skip(self))]
    pub async fn top_sales_by_value(
        &self,
        limit: Option<u64>,
    ) -> Result<Vec<SaleRecord>, ServiceError> {
        let sales = SaleEntity::find()
            .order_by_desc(sale::Column::Total)
            .limit(limit.unwrap_or(DEFAULT_TOP_LIMIT))
            .all(&*self.db)
            .await?;

        attach_lines(&*self.db, sales).await
    }

    /// Aggregate counts across the whole store. All aggregates degrade to
    /// zero on empty tables rather than erroring.
    #[instrument(skip(self))]
    pub async fn summary_statistics(&self) -> Result<SummaryStatistics, ServiceError> {
        let db = &*self.db;

        let total_sales = SaleEntity::find().count(db).await?;
        let monto_total = SaleEntity::find()
            .select_only()
            .column_as(
                Expr::col((sale::Entity, sale::Column::Total)).sum(),
                "monto_total",
            )
            .into_model::<TotalSumRow>()
            .one(db)
            .await?
            .and_then(|row| row.monto_total)
            .unwrap_or(Decimal::ZERO);

        let activos = ProductEntity::find()
            .filter(product::Column::Estado.eq(true))
            .count(db)
            .await?;
        let inactivos = ProductEntity::find()
            .filter(product::Column::Estado.eq(false))
            .count(db)
            .await?;

        let total_surveys = SurveyEntity::find().count(db).await?;
        let promedio = SurveyEntity::find()
            .select_only()
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col((
                    survey::Entity,
                    survey::Column::Puntuacion,
                )))),
                "promedio",
            )
            .into_model::<ScoreAvgRow>()
            .one(db)
            .await?
            .and_then(|row| row.promedio)
            .and_then(|avg| avg.to_f64())
            .unwrap_or(0.0);
        let recomiendan = SurveyEntity::find()
            .filter(survey::Column::Recomendar.eq(true))
            .count(db)
            .await?;

        Ok(SummaryStatistics {
            sales: SaleStats {
                total: total_sales,
                monto_total,
            },
            products: ProductStats {
                activos,
                inactivos,
                total: activos + inactivos,
            },
            surveys: SurveyStats {
                total: total_surveys,
                promedio,
                recomiendan,
                no_recomiendan: total_surveys - recomiendan,
            },
        })
    }

    /// Login events within an inclusive date range, newest first, joined
    /// with the admin's name and email. Capped at 100 rows.
    #[instrument(skip(self))]
    pub async fn login_audit(
        &self,
        desde: Option<NaiveDate>,
        hasta: Option<NaiveDate>,
    ) -> Result<Vec<LoginAuditEntry>, ServiceError> {
        let (lower, upper) = date_range_bounds(desde, hasta);

        let mut query = LoginEventEntity::find().find_also_related(AdminUserEntity);
        if let Some(lower) = lower {
            query = query.filter(login_event::Column::Fecha.gte(lower));
        }
        if let Some(upper) = upper {
            query = query.filter(login_event::Column::Fecha.lte(upper));
        }

        let rows = query
            .order_by_desc(login_event::Column::Fecha)
            .limit(LOGIN_AUDIT_LIMIT)
            .all(&*self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(event, user)| {
                let (admin_name, admin_email) = user
                    .map(|u: admin_user::Model| (u.nombre, u.email))
                    .unwrap_or_else(|| ("Unknown".to_string(), String::new()));
                LoginAuditEntry {
                    id: event.id,
                    fecha: event.fecha,
                    ip: event.ip,
                    user_agent: event.user_agent,
                    admin_name,
                    admin_email,
                }
            })
            .collect())
    }
}
