use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{product, product::ProductKind, Product as ProductEntity};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub titulo: String,
    pub tipo: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub fecha_salida: Option<DateTime<Utc>>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub titulo: String,
    pub tipo: String,
    pub descripcion: Option<String>,
    pub precio: Decimal,
    pub fecha_salida: Option<DateTime<Utc>>,
    pub estado: Option<bool>,
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListFilter {
    pub tipo: Option<String>,
    pub activo: Option<bool>,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub data: Vec<product::Model>,
    pub page: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

/// Catalog service. Products are never hard-deleted; deactivation is the only
/// removal path.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    fn validate_kind(raw: &str) -> Result<ProductKind, ServiceError> {
        ProductKind::from_str(&raw.to_lowercase()).map_err(|_| {
            ServiceError::ValidationError("Product type must be 'libro' or 'pelicula'".to_string())
        })
    }

    fn validate_common(titulo: &str, precio: Decimal) -> Result<(), ServiceError> {
        if titulo.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Title is required".to_string(),
            ));
        }
        if precio <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Price must be a number greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(titulo = %input.titulo))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        Self::validate_common(&input.titulo, input.precio)?;
        let kind = Self::validate_kind(&input.tipo)?;

        let product = product::ActiveModel {
            titulo: Set(input.titulo.trim().to_string()),
            tipo: Set(kind.to_string()),
            descripcion: Set(input.descripcion.map(|d| d.trim().to_string())),
            precio: Set(input.precio),
            fecha_salida: Set(input.fecha_salida.unwrap_or_else(Utc::now)),
            estado: Set(true),
            image: Set(input.image),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(product_id = product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: i32,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        Self::validate_common(&input.titulo, input.precio)?;
        let kind = Self::validate_kind(&input.tipo)?;

        let existing = self.get_product(id).await?;
        let mut active: product::ActiveModel = existing.into();

        active.titulo = Set(input.titulo.trim().to_string());
        active.tipo = Set(kind.to_string());
        active.descripcion = Set(input.descripcion.map(|d| d.trim().to_string()));
        active.precio = Set(input.precio);
        if let Some(fecha_salida) = input.fecha_salida {
            active.fecha_salida = Set(fecha_salida);
        }
        if let Some(estado) = input.estado {
            active.estado = Set(estado);
        }
        if let Some(image) = input.image {
            active.image = Set(Some(image));
        }

        let updated = active.update(&*self.db).await?;
        info!(product_id = id, "Product updated");
        Ok(updated)
    }

    pub async fn get_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Product with ID {} not found", id)))
    }

    /// Soft delete: flips the active flag off. Historical sales keep
    /// referencing the row.
    #[instrument(skip(self))]
    pub async fn deactivate_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        self.set_estado(id, false).await
    }

    #[instrument(skip(self))]
    pub async fn activate_product(&self, id: i32) -> Result<product::Model, ServiceError> {
        self.set_estado(id, true).await
    }

    async fn set_estado(&self, id: i32, estado: bool) -> Result<product::Model, ServiceError> {
        let existing = self.get_product(id).await?;
        let mut active: product::ActiveModel = existing.into();
        active.estado = Set(estado);

        let updated = active.update(&*self.db).await?;
        info!(product_id = id, estado, "Product state changed");
        Ok(updated)
    }

    /// Lists products with optional tipo/activo filters and pagination.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        filter: ProductListFilter,
    ) -> Result<ProductPage, ServiceError> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);

        let mut query = ProductEntity::find().order_by_asc(product::Column::Id);
        if let Some(ref tipo) = filter.tipo {
            let kind = Self::validate_kind(tipo)?;
            query = query.filter(product::Column::Tipo.eq(kind.to_string()));
        }
        if let Some(activo) = filter.activo {
            query = query.filter(product::Column::Estado.eq(activo));
        }

        let paginator = query.paginate(&*self.db, limit);
        let total_items = paginator.num_items().await?;
        let data = paginator.fetch_page(page - 1).await?;

        let total_pages = if total_items == 0 {
            1
        } else {
            (total_items + limit - 1) / limit
        };

        Ok(ProductPage {
            data,
            page,
            total_pages,
            total_items,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_validation_accepts_known_categories() {
        assert!(CatalogService::validate_kind("libro").is_ok());
        assert!(CatalogService::validate_kind("PELICULA").is_ok());
        assert!(CatalogService::validate_kind("revista").is_err());
    }

    #[test]
    fn common_validation_rejects_bad_input() {
        assert!(CatalogService::validate_common("  ", dec!(10)).is_err());
        assert!(CatalogService::validate_common("El Aleph", dec!(0)).is_err());
        assert!(CatalogService::validate_common("El Aleph", dec!(-1)).is_err());
        assert!(CatalogService::validate_common("El Aleph", dec!(15.50)).is_ok());
    }
}
