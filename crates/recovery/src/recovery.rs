//! Checkout-completion handling: close open episodes and cancel pending
//! reminders.

use crate::AppResources;
use crate::entity::abandoned_cart::{self, CartStatus};
use crate::entity::reminder_task::{self, TaskStatus};
use crate::error::RecoveryError;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter};
use time::OffsetDateTime;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryOutcome {
    pub carts_recovered: u64,
    pub tasks_cancelled: u64,
}

/// Mark the user's abandonment episode recovered after a completed checkout.
///
/// Idempotent: with nothing abandoned this is a no-op. Failures are logged
/// and swallowed; recovery marking must never block the checkout success
/// path.
pub async fn mark_recovered(resources: &AppResources, user_id: i64) {
    match mark_recovered_at(resources, user_id, OffsetDateTime::now_utc()).await {
        Ok(outcome) if outcome.carts_recovered > 0 => {
            tracing::info!(
                user_id,
                carts = outcome.carts_recovered,
                cancelled = outcome.tasks_cancelled,
                "cart recovered; reminder sequence cancelled"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(
                name = "recovery.mark_recovered.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                user_id,
                error = %e,
                message = "recovery marking failed; checkout continues regardless"
            );
        }
    }
}

/// Same as [`mark_recovered`], with an explicit clock and a surfaced outcome.
pub async fn mark_recovered_at(
    resources: &AppResources,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<RecoveryOutcome, RecoveryError> {
    let db = resources.db.as_ref();
    let mut outcome = RecoveryOutcome::default();

    let open = abandoned_cart::Entity::find()
        .filter(abandoned_cart::Column::UserId.eq(user_id))
        .filter(abandoned_cart::Column::Status.eq(CartStatus::Abandoned))
        .all(db)
        .await?;

    for cart in open {
        let mut active: abandoned_cart::ActiveModel = cart.into();
        active.status = ActiveValue::Set(CartStatus::Recovered);
        active.recovered_at = ActiveValue::Set(Some(now));
        active.update(db).await?;
        outcome.carts_recovered += 1;
    }

    // Cancel every pending task the user still has, regardless of which cart
    // it belongs to: a purchase ends all abandonment nagging for the user.
    let cancelled = reminder_task::Entity::update_many()
        .col_expr(
            reminder_task::Column::Status,
            Expr::value(TaskStatus::Cancelled),
        )
        .filter(reminder_task::Column::UserId.eq(user_id))
        .filter(reminder_task::Column::Status.eq(TaskStatus::Pending))
        .exec(db)
        .await?;
    outcome.tasks_cancelled = cancelled.rows_affected;

    Ok(outcome)
}
