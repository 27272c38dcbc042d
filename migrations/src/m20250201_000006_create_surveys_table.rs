use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Surveys::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Surveys::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Surveys::Email).string().null())
                    .col(ColumnDef::new(Surveys::Comentario).text().null())
                    .col(
                        ColumnDef::new(Surveys::Recomendar)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Surveys::Puntuacion).integer().not_null())
                    .col(ColumnDef::new(Surveys::Imagen).text().null())
                    .col(ColumnDef::new(Surveys::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_surveys_created_at")
                    .table(Surveys::Table)
                    .col(Surveys::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Surveys::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Surveys {
    Table,
    Id,
    Email,
    Comentario,
    Recomendar,
    Puntuacion,
    Imagen,
    CreatedAt,
}
