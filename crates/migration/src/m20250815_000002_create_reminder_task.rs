use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// The scheduled reminder queue: three rows per abandonment episode.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReminderTask::Table)
                    .if_not_exists()
                    .col(pk_auto(ReminderTask::Id))
                    .col(big_integer(ReminderTask::UserId))
                    .col(integer(ReminderTask::AbandonedCartId))
                    .col(string_len(ReminderTask::ReminderType, 16))
                    .col(timestamp_with_time_zone(ReminderTask::ScheduledFor))
                    .col(
                        string_len(ReminderTask::Status, 16)
                            .default("pending")
                            .to_owned(),
                    )
                    .col(timestamp_with_time_zone_null(ReminderTask::SentAt))
                    .col(string_null(ReminderTask::ErrorMessage))
                    .col(
                        timestamp_with_time_zone(ReminderTask::CreatedAt)
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reminder_task_abandoned_cart")
                            .from(ReminderTask::Table, ReminderTask::AbandonedCartId)
                            .to(AbandonedCart::Table, AbandonedCart::Id),
                    )
                    .to_owned(),
            )
            .await?;
        // The dispatcher's due scan.
        manager
            .create_index(
                Index::create()
                    .name("idx_reminder_task_due")
                    .table(ReminderTask::Table)
                    .col(ReminderTask::Status)
                    .col(ReminderTask::ScheduledFor)
                    .to_owned(),
            )
            .await?;
        // Recovery's bulk cancellation of a user's pending tasks.
        manager
            .create_index(
                Index::create()
                    .name("idx_reminder_task_user_status")
                    .table(ReminderTask::Table)
                    .col(ReminderTask::UserId)
                    .col(ReminderTask::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reminder_task_user_status")
                    .table(ReminderTask::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reminder_task_due")
                    .table(ReminderTask::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ReminderTask::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReminderTask {
    Table,
    Id,
    UserId,
    AbandonedCartId,
    ReminderType,
    ScheduledFor,
    Status,
    SentAt,
    ErrorMessage,
    CreatedAt,
}

#[derive(Iden)]
enum AbandonedCart {
    Table,
    Id,
}
