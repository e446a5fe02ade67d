use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use provider_cell::models::ProviderError;
use provider_cell::services::provider::ProviderService;
use shared_config::AppConfig;
use shared_database::{DbError, SupabaseClient};
use shared_utils::dates;

use crate::models::{
    is_half_hour_aligned, Appointment, AppointmentError, AppointmentView,
    AppointmentWithClient, AppointmentWithProvider, BookAppointmentRequest, ClientParty,
    APPOINTMENTS_PER_PAGE,
};

const LIST_SELECT: &str =
    "id,user_id,provider_id,date,canceled_at,provider:users!appointments_provider_id_fkey(id,name,avatar_url)";
const DAY_SELECT: &str =
    "id,user_id,provider_id,date,canceled_at,user:users!appointments_user_id_fkey(id,name)";

pub struct BookingService {
    supabase: Arc<SupabaseClient>,
    providers: Arc<ProviderService>,
    locale: String,
}

impl BookingService {
    pub fn new(
        supabase: Arc<SupabaseClient>,
        providers: Arc<ProviderService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            supabase,
            providers,
            locale: config.locale.clone(),
        }
    }

    /// Validate and create a booking. The checks run in order and the first
    /// failure wins; the slot pre-check is only a fast path, the partial
    /// unique index behind the `book_appointment` function settles races.
    pub async fn book(
        &self,
        requester_id: Uuid,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking slot {} with provider {} for user {}",
            request.date, request.provider_id, requester_id
        );

        self.providers
            .get_provider(request.provider_id)
            .await
            .map_err(|e| match e {
                ProviderError::NotFound => AppointmentError::InvalidProvider,
                ProviderError::Database(msg) => AppointmentError::Database(msg),
            })?;

        if requester_id == request.provider_id {
            return Err(AppointmentError::SelfBooking);
        }

        if !is_half_hour_aligned(&request.date) {
            return Err(AppointmentError::SlotNotAligned);
        }

        if request.date <= Utc::now() {
            return Err(AppointmentError::PastDate);
        }

        if self.slot_taken(request.provider_id, request.date).await? {
            return Err(AppointmentError::SlotTaken);
        }

        let client = self.get_client(requester_id).await?;
        let content = format!(
            "New booking from {} on {}",
            client.name,
            dates::long_event_format(request.date, &self.locale)
        );

        // One transaction: the appointment row and the provider's
        // notification are created together or not at all.
        let appointment: Appointment = self
            .supabase
            .rpc(
                "book_appointment",
                json!({
                    "p_user_id": requester_id,
                    "p_provider_id": request.provider_id,
                    "p_date": request.date.to_rfc3339(),
                    "p_notification_content": content,
                }),
            )
            .await
            .map_err(|e| match e {
                DbError::Conflict(detail) => {
                    warn!(
                        "Booking race lost for provider {} at {}: {}",
                        request.provider_id, request.date, detail
                    );
                    AppointmentError::SlotTaken
                }
                other => AppointmentError::Database(other.to_string()),
            })?;

        info!(
            "Appointment {} booked with provider {}",
            appointment.id, appointment.provider_id
        );
        Ok(appointment)
    }

    /// The requester's active appointments, oldest first, 20 per page.
    pub async fn list_for_client(
        &self,
        user_id: Uuid,
        page: u32,
    ) -> Result<Vec<AppointmentView>, AppointmentError> {
        debug!("Listing appointments for user {} (page {})", user_id, page);

        let page = page.max(1);
        let offset = (page - 1) * APPOINTMENTS_PER_PAGE;

        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&canceled_at=is.null&order=date.asc&limit={}&offset={}&select={}",
            user_id, APPOINTMENTS_PER_PAGE, offset, LIST_SELECT
        );
        let records: Vec<AppointmentWithProvider> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let now = Utc::now();
        Ok(records
            .into_iter()
            .map(|record| AppointmentView::from_record(record, now))
            .collect())
    }

    /// A provider's own day: active appointments with the booking client
    /// embedded.
    pub async fn provider_day(
        &self,
        requester_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentWithClient>, AppointmentError> {
        debug!("Listing {} schedule for provider {}", date, requester_id);

        self.providers
            .get_provider(requester_id)
            .await
            .map_err(|e| match e {
                ProviderError::NotFound => AppointmentError::NotProvider,
                ProviderError::Database(msg) => AppointmentError::Database(msg),
            })?;

        let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = day_start + Duration::days(1);

        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&canceled_at=is.null&date=gte.{}&date=lt.{}&order=date.asc&select={}",
            requester_id,
            urlencoding::encode(&day_start.to_rfc3339()),
            urlencoding::encode(&day_end.to_rfc3339()),
            DAY_SELECT,
        );
        let records: Vec<AppointmentWithClient> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(records)
    }

    async fn slot_taken(
        &self,
        provider_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<bool, AppointmentError> {
        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&date=eq.{}&canceled_at=is.null&select=id",
            provider_id,
            urlencoding::encode(&date.to_rfc3339()),
        );
        let existing: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(!existing.is_empty())
    }

    async fn get_client(&self, user_id: Uuid) -> Result<ClientParty, AppointmentError> {
        let path = format!("/rest/v1/users?id=eq.{}&select=id,name", user_id);
        let result: Vec<ClientParty> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        result
            .into_iter()
            .next()
            .ok_or_else(|| AppointmentError::Database(format!("booking user {} missing", user_id)))
    }
}
