//! Due-reminder dispatch: the periodic pass that sends whatever has come due.
//!
//! Driven by an external recurring trigger (a host cron calling
//! [`process_pending_reminders`]) or by the in-process [`run_dispatch_loop`].
//!
//! A task only ever leaves `pending` here, to `sent` or `failed`; the status
//! transition happens after the send attempt completes. Two dispatcher passes
//! overlapping on the same due task can therefore both send it. That matches
//! the documented behavior of this subsystem; see DESIGN.md for the decision
//! record.

use crate::AppResources;
use crate::email_templates::ReminderEmail;
use crate::entity::abandoned_cart::{self, CartStatus};
use crate::entity::reminder_task::{self, ReminderType, TaskStatus};
use crate::error::RecoveryError;
use crate::notify::Notification;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use time::OffsetDateTime;

/// Fixed error message recorded when a user has no resolvable contact address.
pub const NO_CONTACT_ADDRESS: &str = "no contact address";

/// What one dispatch pass did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Due tasks picked up this pass.
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Send every due reminder whose cart is still abandoned.
///
/// Failures are contained per task and the pass itself never raises; a broken
/// dispatch pass costs at worst a delayed reminder.
pub async fn process_pending_reminders(resources: &AppResources) {
    match process_pending_reminders_at(resources, OffsetDateTime::now_utc()).await {
        Ok(summary) if summary.due > 0 => {
            tracing::info!(
                due = summary.due,
                sent = summary.sent,
                failed = summary.failed,
                "dispatched due reminders"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(
                name = "recovery.dispatch.pass_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                error = %e,
                message = "reminder dispatch pass failed; will retry on next trigger"
            );
        }
    }
}

/// Same as [`process_pending_reminders`], with an explicit clock and a
/// surfaced summary. Only the due-task query can fail here; per-task errors
/// are absorbed into the summary.
pub async fn process_pending_reminders_at(
    resources: &AppResources,
    now: OffsetDateTime,
) -> Result<DispatchSummary, RecoveryError> {
    // Due = pending, at-or-past its send time, and the parent cart still open.
    // A task whose cart was recovered or expired must not be sent even if its
    // time has arrived; recovery cancellation cleans such tasks up separately.
    let due = reminder_task::Entity::find()
        .filter(reminder_task::Column::Status.eq(TaskStatus::Pending))
        .filter(reminder_task::Column::ScheduledFor.lte(now))
        .find_also_related(abandoned_cart::Entity)
        .all(resources.db.as_ref())
        .await?;

    let mut summary = DispatchSummary::default();
    for (task, cart) in due {
        let Some(cart) = cart else {
            // Orphan task row; nothing to send against.
            continue;
        };
        if cart.status != CartStatus::Abandoned {
            continue;
        }
        summary.due += 1;
        let task_id = task.id;
        let user_id = task.user_id;
        // Each task is an independent unit of work; one failure must not
        // abort the rest of the pass.
        match dispatch_task(resources, task, cart, now).await {
            Ok(true) => summary.sent += 1,
            Ok(false) => summary.failed += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::error!(
                    name = "recovery.dispatch.task_failed",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    task_id,
                    user_id,
                    error = %e,
                    message = "reminder task processing failed"
                );
            }
        }
    }
    Ok(summary)
}

/// Recurring in-process trigger for hosts without an external cron.
///
/// Runs one dispatch pass every `every`, forever; spawn it on the runtime.
pub async fn run_dispatch_loop(resources: AppResources, every: std::time::Duration) {
    let mut interval = tokio::time::interval(every);
    loop {
        interval.tick().await;
        process_pending_reminders(&resources).await;
    }
}

/// Process one due task: resolve contact, render, send, persist the outcome.
///
/// `Ok(true)` means sent, `Ok(false)` means recorded as failed; `Err` means
/// the outcome could not be persisted.
async fn dispatch_task(
    resources: &AppResources,
    task: reminder_task::Model,
    cart: abandoned_cart::Model,
    now: OffsetDateTime,
) -> Result<bool, RecoveryError> {
    let db = resources.db.as_ref();

    let Some(contact) = resources.contacts.contact(task.user_id).await? else {
        mark_failed(db, task, NO_CONTACT_ADDRESS.to_string()).await?;
        return Ok(false);
    };

    let email = ReminderEmail {
        reminder_type: task.reminder_type,
        display_name: contact.display_name.clone(),
        items: cart.snapshot_items(),
        total_value: cart.total_value,
        item_count: cart.item_count,
        cart_url: format!(
            "{}/cart",
            resources.config.storefront_url.trim_end_matches('/')
        ),
    };
    let notification = Notification {
        to: contact.email.clone(),
        subject: email.subject(),
        body: email.render_text(),
    };

    match resources.sender.send(&notification).await {
        Ok(true) => {
            let user_id = task.user_id;
            let reminder_type = task.reminder_type;

            let mut task_active: reminder_task::ActiveModel = task.into();
            task_active.status = ActiveValue::Set(TaskStatus::Sent);
            task_active.sent_at = ActiveValue::Set(Some(now));
            task_active.update(db).await?;

            // Stamp the matching timestamp on the parent cart. An explicit
            // match keeps the type-to-column mapping statically checked.
            let mut cart_active: abandoned_cart::ActiveModel = cart.into();
            match reminder_type {
                ReminderType::First => {
                    cart_active.first_reminder_sent_at = ActiveValue::Set(Some(now));
                }
                ReminderType::Second => {
                    cart_active.second_reminder_sent_at = ActiveValue::Set(Some(now));
                }
                ReminderType::Final => {
                    cart_active.final_reminder_sent_at = ActiveValue::Set(Some(now));
                }
            }
            cart_active.update(db).await?;

            tracing::info!(user_id, to = %contact.email, ?reminder_type, "sent cart reminder");
            Ok(true)
        }
        Ok(false) => {
            mark_failed(db, task, "notification declined by transport".to_string()).await?;
            Ok(false)
        }
        Err(e) => {
            mark_failed(db, task, e.to_string()).await?;
            Ok(false)
        }
    }
}

async fn mark_failed(
    db: &DatabaseConnection,
    task: reminder_task::Model,
    message: String,
) -> Result<(), RecoveryError> {
    let task_id = task.id;
    let mut active: reminder_task::ActiveModel = task.into();
    active.status = ActiveValue::Set(TaskStatus::Failed);
    active.error_message = ActiveValue::Set(Some(message.clone()));
    active.update(db).await?;
    tracing::warn!(task_id, %message, "reminder task failed");
    Ok(())
}
