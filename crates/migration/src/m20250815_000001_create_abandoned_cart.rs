use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// One abandonment episode per row; never deleted, only status-transitioned.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AbandonedCart::Table)
                    .if_not_exists()
                    .col(pk_auto(AbandonedCart::Id))
                    .col(big_integer(AbandonedCart::UserId))
                    .col(json(AbandonedCart::CartSnapshot))
                    .col(decimal_len(AbandonedCart::TotalValue, 12, 2))
                    .col(integer(AbandonedCart::ItemCount))
                    .col(
                        string_len(AbandonedCart::Status, 16)
                            .default("abandoned")
                            .to_owned(),
                    )
                    .col(timestamp_with_time_zone(AbandonedCart::AbandonedAt))
                    .col(timestamp_with_time_zone_null(AbandonedCart::RecoveredAt))
                    .col(timestamp_with_time_zone_null(
                        AbandonedCart::FirstReminderSentAt,
                    ))
                    .col(timestamp_with_time_zone_null(
                        AbandonedCart::SecondReminderSentAt,
                    ))
                    .col(timestamp_with_time_zone_null(
                        AbandonedCart::FinalReminderSentAt,
                    ))
                    .to_owned(),
            )
            .await?;
        // Covers the tracker's find-or-refresh lookup and recovery marking.
        manager
            .create_index(
                Index::create()
                    .name("idx_abandoned_cart_user_status")
                    .table(AbandonedCart::Table)
                    .col(AbandonedCart::UserId)
                    .col(AbandonedCart::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_abandoned_cart_user_status")
                    .table(AbandonedCart::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(AbandonedCart::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AbandonedCart {
    Table,
    Id,
    UserId,
    CartSnapshot,
    TotalValue,
    ItemCount,
    Status,
    AbandonedAt,
    RecoveredAt,
    FirstReminderSentAt,
    SecondReminderSentAt,
    FinalReminderSentAt,
}
