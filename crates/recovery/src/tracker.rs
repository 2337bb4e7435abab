//! Abandonment tracking: snapshot the live cart and open or refresh the
//! user's abandonment episode.

use crate::AppResources;
use crate::entity::abandoned_cart::{self, CartStatus};
use crate::error::RecoveryError;
use crate::scheduler::schedule_reminders;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use time::OffsetDateTime;

/// What [`track_abandonment_at`] did, for callers that care (mostly tests and
/// log lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// The live cart was empty; an empty cart cannot be abandoned.
    SkippedEmptyCart,
    /// A new abandonment episode was opened and its reminders scheduled.
    Created { cart_id: i32 },
    /// An existing open episode had its snapshot refreshed; no new reminders.
    Refreshed { cart_id: i32 },
}

/// Record that `user_id`'s cart should be considered abandoned.
///
/// Best-effort telemetry: any failure is logged and swallowed so the caller's
/// request flow is never disturbed.
pub async fn track_abandonment(resources: &AppResources, user_id: i64) {
    match track_abandonment_at(resources, user_id, OffsetDateTime::now_utc()).await {
        Ok(outcome) => {
            tracing::debug!(user_id, ?outcome, "abandonment tracked");
        }
        Err(e) => {
            tracing::error!(
                name = "recovery.track_abandonment.failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                user_id,
                error = %e,
                message = "abandonment tracking failed; dropping event"
            );
        }
    }
}

/// Same as [`track_abandonment`], with an explicit clock and a surfaced result.
pub async fn track_abandonment_at(
    resources: &AppResources,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<TrackOutcome, RecoveryError> {
    let items = resources.carts.line_items(user_id).await?;
    if items.is_empty() {
        tracing::info!(user_id, "live cart is empty; not recording an abandonment");
        return Ok(TrackOutcome::SkippedEmptyCart);
    }

    let total_value: Decimal = items.iter().map(|item| item.line_total()).sum();
    let item_count = items.len() as i32;
    let snapshot = serde_json::to_value(&items)?;

    let open = abandoned_cart::Entity::find()
        .filter(abandoned_cart::Column::UserId.eq(user_id))
        .filter(abandoned_cart::Column::Status.eq(CartStatus::Abandoned))
        .order_by_desc(abandoned_cart::Column::AbandonedAt)
        .one(resources.db.as_ref())
        .await?;

    match open {
        // Same episode, newer cart contents: overwrite the snapshot and reset
        // the clock. Scheduling again here would duplicate the task set.
        Some(existing) => {
            let cart_id = existing.id;
            let mut active: abandoned_cart::ActiveModel = existing.into();
            active.cart_snapshot = ActiveValue::Set(snapshot);
            active.total_value = ActiveValue::Set(total_value);
            active.item_count = ActiveValue::Set(item_count);
            active.abandoned_at = ActiveValue::Set(now);
            active.update(resources.db.as_ref()).await?;
            tracing::info!(user_id, cart_id, "refreshed open abandonment episode");
            Ok(TrackOutcome::Refreshed { cart_id })
        }
        None => {
            let cart = abandoned_cart::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user_id),
                cart_snapshot: ActiveValue::Set(snapshot),
                total_value: ActiveValue::Set(total_value),
                item_count: ActiveValue::Set(item_count),
                status: ActiveValue::Set(CartStatus::Abandoned),
                abandoned_at: ActiveValue::Set(now),
                recovered_at: ActiveValue::NotSet,
                first_reminder_sent_at: ActiveValue::NotSet,
                second_reminder_sent_at: ActiveValue::NotSet,
                final_reminder_sent_at: ActiveValue::NotSet,
            };
            let inserted = cart.insert(resources.db.as_ref()).await?;
            schedule_reminders(resources.db.as_ref(), inserted.id, user_id, now).await?;
            tracing::info!(user_id, cart_id = inserted.id, "opened abandonment episode");
            Ok(TrackOutcome::Created {
                cart_id: inserted.id,
            })
        }
    }
}
