//! Reminder scheduling: one fixed three-step sequence per abandonment episode.

use crate::entity::reminder_task::{self, ReminderType, TaskStatus};
use crate::error::RecoveryError;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection};
use time::OffsetDateTime;

/// The reminder sequence: one `(type, delay in hours)` entry per reminder,
/// relative to the moment of abandonment. The dispatcher later sends whichever
/// entries come due while the cart is still abandoned.
pub const REMINDER_SCHEDULE: [(ReminderType, i64); 3] = [
    (ReminderType::First, 1),
    (ReminderType::Second, 24),
    (ReminderType::Final, 72),
];

/// Insert one pending [`reminder_task`] row per schedule entry.
///
/// Invariant of the calling sequence: this runs exactly once per abandonment
/// episode, on the tracker's insert path. Calling it again for the same cart
/// would stack a duplicate task set; the refresh path must never reach here.
pub async fn schedule_reminders(
    db: &DatabaseConnection,
    abandoned_cart_id: i32,
    user_id: i64,
    now: OffsetDateTime,
) -> Result<(), RecoveryError> {
    for (reminder_type, delay_hours) in REMINDER_SCHEDULE {
        let task = reminder_task::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            abandoned_cart_id: ActiveValue::Set(abandoned_cart_id),
            reminder_type: ActiveValue::Set(reminder_type),
            scheduled_for: ActiveValue::Set(now + time::Duration::hours(delay_hours)),
            status: ActiveValue::Set(TaskStatus::Pending),
            sent_at: ActiveValue::NotSet,
            error_message: ActiveValue::NotSet,
            created_at: ActiveValue::Set(now),
        };
        task.insert(db).await?;
    }
    tracing::debug!(abandoned_cart_id, user_id, "scheduled reminder sequence");
    Ok(())
}
