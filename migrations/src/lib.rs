pub use sea_orm_migration::prelude::*;

mod m20250201_000001_create_products_table;
mod m20250201_000002_create_sales_table;
mod m20250201_000003_create_sale_items_table;
mod m20250201_000004_create_admin_users_table;
mod m20250201_000005_create_login_events_table;
mod m20250201_000006_create_surveys_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250201_000001_create_products_table::Migration),
            Box::new(m20250201_000002_create_sales_table::Migration),
            Box::new(m20250201_000003_create_sale_items_table::Migration),
            Box::new(m20250201_000004_create_admin_users_table::Migration),
            Box::new(m20250201_000005_create_login_events_table::Migration),
            Box::new(m20250201_000006_create_surveys_table::Migration),
        ]
    }
}
