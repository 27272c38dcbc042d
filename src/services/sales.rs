use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::db::DbPool;
use crate::entities::{
    product, sale, sale_item, Product as ProductEntity, Sale as SaleEntity,
    SaleItem as SaleItemEntity,
};
use crate::errors::ServiceError;

/// One requested line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordSaleRequest {
    pub customer_name: String,
    pub items: Vec<SaleItemRequest>,
}

/// A resolved line item, carrying the price snapshot and the denormalized
/// product title for receipt display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: i32,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Complete sale record: header plus resolved line items.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: i32,
    pub customer_name: String,
    pub date: DateTime<Utc>,
    pub total: Decimal,
    pub items: Vec<SaleLine>,
}

/// Service recording and reading sales. Recording is a single transactional
/// unit: header and all line items commit together or not at all.
#[derive(Clone)]
pub struct SaleService {
    db: Arc<DbPool>,
}

impl SaleService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Records a sale after re-validating every requested item against the
    /// current catalog state. Client-supplied prices are never trusted; the
    /// unit price is snapshotted from the catalog inside the transaction.
    #[instrument(skip(self, request), fields(customer = %request.customer_name, item_count = request.items.len()))]
    pub async fn record_sale(&self, request: RecordSaleRequest) -> Result<SaleRecord, ServiceError> {
        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(ServiceError::ValidationError(
                "Customer name is required".to_string(),
            ));
        }
        if request.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "A sale requires at least one item".to_string(),
            ));
        }
        for item in &request.items {
            if item.quantity <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Quantity for product {} must be a positive integer",
                    item.product_id
                )));
            }
        }

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for sale recording");
            ServiceError::DatabaseError(e)
        })?;

        // Validate items in submitted order, snapshotting prices as we go.
        let mut total = Decimal::ZERO;
        let mut drafts: Vec<SaleLine> = Vec::with_capacity(request.items.len());

        for item in &request.items {
            let product = ProductEntity::find_by_id(item.product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    warn!(product_id = item.product_id, "Sale references unknown product");
                    ServiceError::NotFound(format!(
                        "Product with ID {} not found",
                        item.product_id
                    ))
                })?;

            if !product.estado {
                warn!(product_id = product.id, "Sale references inactive product");
                return Err(ServiceError::InvalidState(format!(
                    "Product \"{}\" is inactive",
                    product.titulo
                )));
            }

            let subtotal = product.precio * Decimal::from(item.quantity);
            total += subtotal;

            drafts.push(SaleLine {
                product_id: product.id,
                title: product.titulo,
                quantity: item.quantity,
                unit_price: product.precio,
            });
        }

        let now = Utc::now();
        let sale_model = sale::ActiveModel {
            cliente_nombre: Set(customer_name.to_string()),
            fecha: Set(now),
            total: Set(total.round_dp(2)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for draft in &drafts {
            sale_item::ActiveModel {
                sale_id: Set(sale_model.id),
                product_id: Set(draft.product_id),
                cantidad: Set(draft.quantity),
                precio_unitario: Set(draft.unit_price),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit sale transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(sale_id = sale_model.id, total = %sale_model.total, "Sale recorded");

        Ok(SaleRecord {
            id: sale_model.id,
            customer_name: sale_model.cliente_nombre,
            date: sale_model.fecha,
            total: sale_model.total,
            items: drafts,
        })
    }

    /// Retrieves one sale with its line items. Titles are re-joined from the
    /// catalog at read time; prices come from the line-item snapshots.
    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: i32) -> Result<SaleRecord, ServiceError> {
        let sale = SaleEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Sale with ID {} not found", id)))?;

        let mut records = attach_lines(&*self.db, vec![sale]).await?;
        Ok(records.remove(0))
    }

    /// Lists all sales, newest first, resolving line items with batched
    /// queries rather than per-sale lookups.
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<SaleRecord>, ServiceError> {
        let sales = SaleEntity::find()
            .order_by_desc(sale::Column::Fecha)
            .all(&*self.db)
            .await?;

        attach_lines(&*self.db, sales).await
    }
}

/// Resolves line items and current product titles for a batch of sales using
/// one query for items and one for products.
pub(crate) async fn attach_lines<C: ConnectionTrait>(
    db: &C,
    sales: Vec<sale::Model>,
) -> Result<Vec<SaleRecord>, ServiceError> {
    if sales.is_empty() {
        return Ok(Vec::new());
    }

    let sale_ids: Vec<i32> = sales.iter().map(|s| s.id).collect();
    let items = SaleItemEntity::find()
        .filter(sale_item::Column::SaleId.is_in(sale_ids))
        .order_by_asc(sale_item::Column::Id)
        .all(db)
        .await?;

    let product_ids: Vec<i32> = items.iter().map(|i| i.product_id).collect();
    let titles: HashMap<i32, String> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        ProductEntity::find()
            .filter(product::Column::Id.is_in(product_ids))
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Titulo)
            .into_tuple::<(i32, String)>()
            .all(db)
            .await?
            .into_iter()
            .collect()
    };

    let mut lines_by_sale: HashMap<i32, Vec<SaleLine>> = HashMap::new();
    for item in items {
        let title = titles
            .get(&item.product_id)
            .cloned()
            .unwrap_or_else(|| item.product_id.to_string());
        lines_by_sale.entry(item.sale_id).or_default().push(SaleLine {
            product_id: item.product_id,
            title,
            quantity: item.cantidad,
            unit_price: item.precio_unitario,
        });
    }

    Ok(sales
        .into_iter()
        .map(|sale| SaleRecord {
            items: lines_by_sale.remove(&sale.id).unwrap_or_default(),
            id: sale.id,
            customer_name: sale.cliente_nombre,
            date: sale.fecha,
            total: sale.total,
        })
        .collect())
}
