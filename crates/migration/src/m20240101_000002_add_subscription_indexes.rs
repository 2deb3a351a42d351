use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Columns filtered by the price sum query
        for (name, col) in [
            ("idx_subscription_user", Subscription::UserId),
            ("idx_subscription_service_name", Subscription::ServiceName),
            ("idx_subscription_start_date", Subscription::StartDate),
            ("idx_subscription_deleted_at", Subscription::DeletedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Subscription::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_subscription_user",
            "idx_subscription_service_name",
            "idx_subscription_start_date",
            "idx_subscription_deleted_at",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Subscription::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subscription { Table, UserId, ServiceName, StartDate, DeletedAt }
