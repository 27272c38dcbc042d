use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LoginEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoginEvents::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoginEvents::AdminUserId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LoginEvents::Fecha).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(LoginEvents::Ip).string().null())
                    .col(ColumnDef::new(LoginEvents::UserAgent).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_login_events_admin_user_id")
                            .from(LoginEvents::Table, LoginEvents::AdminUserId)
                            .to(
                                super::m20250201_000004_create_admin_users_table::AdminUsers::Table,
                                super::m20250201_000004_create_admin_users_table::AdminUsers::Id,
                            )
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_login_events_fecha")
                    .table(LoginEvents::Table)
                    .col(LoginEvents::Fecha)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LoginEvents::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum LoginEvents {
    Table,
    Id,
    AdminUserId,
    Fecha,
    Ip,
    UserAgent,
}
