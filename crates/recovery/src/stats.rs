//! Read-only aggregates for the operational dashboard.

use crate::entity::abandoned_cart::{self, CartStatus};
use crate::entity::reminder_task::{self, TaskStatus};
use crate::error::RecoveryError;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReminderBreakdown {
    pub pending: u64,
    pub sent: u64,
    pub failed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryStats {
    pub abandoned_carts: u64,
    pub recovered_carts: u64,
    pub expired_carts: u64,
    /// Recovered episodes over all episodes; 0.0 when there are none yet.
    pub recovery_rate: f64,
    /// Summed value of currently-abandoned carts.
    pub total_abandoned_value: Decimal,
    pub average_abandoned_value: Decimal,
    pub reminders: ReminderBreakdown,
}

#[derive(FromQueryResult)]
struct ValueTotal {
    total: Option<Decimal>,
}

pub async fn recovery_stats(db: &DatabaseConnection) -> Result<RecoveryStats, RecoveryError> {
    let abandoned_carts = cart_count(db, CartStatus::Abandoned).await?;
    let recovered_carts = cart_count(db, CartStatus::Recovered).await?;
    let expired_carts = cart_count(db, CartStatus::Expired).await?;

    let episodes = abandoned_carts + recovered_carts + expired_carts;
    let recovery_rate = if episodes > 0 {
        recovered_carts as f64 / episodes as f64
    } else {
        0.0
    };

    let total_abandoned_value = abandoned_cart::Entity::find()
        .select_only()
        .column_as(abandoned_cart::Column::TotalValue.sum(), "total")
        .filter(abandoned_cart::Column::Status.eq(CartStatus::Abandoned))
        .into_model::<ValueTotal>()
        .one(db)
        .await?
        .and_then(|row| row.total)
        .unwrap_or_default();

    let average_abandoned_value = if abandoned_carts > 0 {
        (total_abandoned_value / Decimal::from(abandoned_carts)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    Ok(RecoveryStats {
        abandoned_carts,
        recovered_carts,
        expired_carts,
        recovery_rate,
        total_abandoned_value,
        average_abandoned_value,
        reminders: ReminderBreakdown {
            pending: task_count(db, TaskStatus::Pending).await?,
            sent: task_count(db, TaskStatus::Sent).await?,
            failed: task_count(db, TaskStatus::Failed).await?,
            cancelled: task_count(db, TaskStatus::Cancelled).await?,
        },
    })
}

async fn cart_count(db: &DatabaseConnection, status: CartStatus) -> Result<u64, RecoveryError> {
    Ok(abandoned_cart::Entity::find()
        .filter(abandoned_cart::Column::Status.eq(status))
        .count(db)
        .await?)
}

async fn task_count(db: &DatabaseConnection, status: TaskStatus) -> Result<u64, RecoveryError> {
    Ok(reminder_task::Entity::find()
        .filter(reminder_task::Column::Status.eq(status))
        .count(db)
        .await?)
}
