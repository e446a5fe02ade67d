use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const APPOINTMENTS_PER_PAGE: u32 = 20;
pub const CANCELLATION_WINDOW_HOURS: i64 = 2;

/// A booked slot. `canceled_at = None` means the appointment is active;
/// cancellation is a one-way transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.date < now
    }

    pub fn cancel_deadline(&self) -> DateTime<Utc> {
        self.date - Duration::hours(CANCELLATION_WINDOW_HOURS)
    }

    pub fn is_cancelable(&self, now: DateTime<Utc>) -> bool {
        self.canceled_at.is_none() && within_cancellation_window(self.date, now)
    }
}

/// Cancellation is allowed up to and including the moment exactly two hours
/// before the appointment starts.
pub fn within_cancellation_window(date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now <= date - Duration::hours(CANCELLATION_WINDOW_HOURS)
}

/// Bookable timestamps sit exactly on the hour or half hour.
pub fn is_half_hour_aligned(date: &DateTime<Utc>) -> bool {
    (date.minute() == 0 || date.minute() == 30) && date.second() == 0 && date.nanosecond() == 0
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub provider_id: Uuid,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub date: NaiveDate,
}

/// Provider projection embedded in the client's appointment listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRef {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Provider projection used by the cancellation mail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderParty {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

/// Client projection embedded in provider-facing views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientParty {
    pub id: Uuid,
    pub name: String,
}

/// Appointment row with its provider eagerly embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithProvider {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub provider: ProviderRef,
}

/// Appointment row with both participants embedded, as loaded for
/// cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithParties {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub provider: ProviderParty,
    pub user: ClientParty,
}

/// Appointment row with the client embedded, for the provider's day view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentWithClient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub date: DateTime<Utc>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub user: ClientParty,
}

/// What the client sees in `GET /appointments`.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub past: bool,
    pub cancelable: bool,
    pub provider: ProviderRef,
}

impl AppointmentView {
    pub fn from_record(record: AppointmentWithProvider, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id,
            date: record.date,
            past: record.date < now,
            cancelable: record.canceled_at.is_none()
                && within_cancellation_window(record.date, now),
            provider: record.provider,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("appointment not found")]
    NotFound,

    #[error("appointments can only be booked with providers")]
    InvalidProvider,

    #[error("providers cannot book appointments with themselves")]
    SelfBooking,

    #[error("appointments must start on the hour or half hour")]
    SlotNotAligned,

    #[error("appointments cannot be booked in the past")]
    PastDate,

    #[error("this slot is already taken")]
    SlotTaken,

    #[error("only the booking client may cancel this appointment")]
    Forbidden,

    #[error("appointments can only be canceled at least 2 hours in advance")]
    TooLate,

    #[error("appointment is already canceled")]
    AlreadyCanceled,

    #[error("only providers can view their schedule")]
    NotProvider,

    #[error("database error: {0}")]
    Database(String),
}
