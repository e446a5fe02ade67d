use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lightweight message for a provider, created when a client books a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification not found")]
    NotFound,

    #[error("only providers can read notifications")]
    NotProvider,

    #[error("notification belongs to another user")]
    Forbidden,

    #[error("database error: {0}")]
    Database(String),
}
