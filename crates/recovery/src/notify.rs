//! Notification sending: the trait seam plus the production SMTP implementation.

use crate::config::SmtpConfig;
use crate::error::NotificationError;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

/// A rendered, ready-to-send message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Transport seam for reminder delivery.
///
/// `Ok(true)` means accepted for delivery; `Ok(false)` means the transport
/// declined the message without raising an error. The dispatcher records both
/// non-`true` outcomes as task failures and never retries.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<bool, NotificationError>;
}

/// Production sender backed by lettre's async SMTP transport.
pub struct SmtpNotificationSender {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpNotificationSender {
    pub fn new(
        mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
        from: &str,
    ) -> Result<Self, NotificationError> {
        Ok(Self {
            mailer,
            from: from.parse()?,
        })
    }

    /// Build the relay transport straight from [`SmtpConfig`].
    pub fn from_config(smtp: &SmtpConfig) -> Result<Self, NotificationError> {
        let creds = Credentials::new(smtp.username.clone(), smtp.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.server)
            .map_err(|e| NotificationError::Transport(e.to_string()))?
            .port(smtp.port)
            .credentials(creds)
            .build();
        Self::new(Arc::new(mailer), &smtp.from)
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(&self, notification: &Notification) -> Result<bool, NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(notification.to.parse()?)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .header(lettre::message::header::MIME_VERSION_1_0)
            .message_id(None)
            .body(notification.body.clone())?;

        if let Err(e) = self.mailer.send(message).await {
            tracing::error!(
                name = "recovery.notify.send_failed",
                target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                to = %notification.to,
                error = %e,
                message = "SMTP transport rejected reminder email"
            );
            return Err(NotificationError::Transport(e.to_string()));
        }
        Ok(true)
    }
}
