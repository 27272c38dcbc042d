use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Products::Titulo).text().not_null())
                    .col(ColumnDef::new(Products::Tipo).string().not_null())
                    .col(ColumnDef::new(Products::Descripcion).text().null())
                    .col(ColumnDef::new(Products::Precio).decimal().not_null())
                    .col(ColumnDef::new(Products::FechaSalida).timestamp_with_time_zone().not_null())
                    .col(
                        ColumnDef::new(Products::Estado)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Products::Image).text().null())
                    .col(ColumnDef::new(Products::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Products {
    Table,
    Id,
    Titulo,
    Tipo,
    Descripcion,
    Precio,
    FechaSalida,
    Estado,
    Image,
    CreatedAt,
}
