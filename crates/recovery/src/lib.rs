//! Abandoned-cart recovery for the marketplace backend.
//!
//! Tracks when a user's cart goes abandoned, schedules a fixed sequence of
//! reminder emails (1h / 24h / 72h after abandonment), dispatches the ones
//! that come due while the cart is still abandoned, and cancels the rest when
//! the user completes checkout.
//!
//! This is a library, not a service: the surrounding HTTP application calls
//! [`tracker::track_abandonment`] on abandonment signals and
//! [`recovery::mark_recovered`] on checkout completion, and some recurring
//! trigger (an external cron or [`dispatcher::run_dispatch_loop`]) calls
//! [`dispatcher::process_pending_reminders`]. All three entry points absorb
//! their own failures; nothing here is allowed to break a commerce flow.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::cart::{CartProvider, ContactDirectory};
use crate::config::AppConfig;
use crate::notify::NotificationSender;

pub mod cart;
pub mod config;
pub mod dispatcher;
pub mod email_templates;
pub mod entity;
pub mod error;
pub mod notify;
pub mod recovery;
pub mod scheduler;
pub mod stats;
pub mod tracker;

pub use dispatcher::{process_pending_reminders, run_dispatch_loop};
pub use recovery::mark_recovered;
pub use tracker::track_abandonment;

/// Shared handles threaded through every subsystem operation.
///
/// The database and the three collaborators are injected so hosts (and tests)
/// can substitute their own implementations; nothing in this crate reaches
/// for a global.
#[derive(Clone)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub sender: Arc<dyn NotificationSender>,
    pub carts: Arc<dyn CartProvider>,
    pub contacts: Arc<dyn ContactDirectory>,
    pub config: Arc<AppConfig>,
}
