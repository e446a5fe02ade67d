use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public projection of a provider-flagged user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// One half-hour candidate slot in a provider's day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySlot {
    pub time: String,
    pub value: DateTime<Utc>,
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    pub date: NaiveDate,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),
}
