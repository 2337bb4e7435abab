use thiserror::Error;

/// Failures from the host-application collaborators (cart contents, user
/// profiles). The subsystem never retries these; it logs and moves on.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    #[error("collaborator returned malformed data: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("invalid address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("message build error: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Internal error type for the subsystem's operations.
///
/// Nothing here ever reaches a caller of the public entry points: each of
/// `track_abandonment`, `mark_recovered` and `process_pending_reminders`
/// wraps its `*_at` operation in a catch-and-log. The `Result`s exist so the
/// contract is visible in the signatures and pinned by tests.
#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("snapshot serialization error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}
