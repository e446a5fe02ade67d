use std::sync::Arc;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_mailer::{MailMessage, MailerClient};
use shared_utils::dates;

use crate::models::{within_cancellation_window, AppointmentError, AppointmentWithParties};

const PARTIES_SELECT: &str =
    "id,user_id,provider_id,date,canceled_at,provider:users!appointments_provider_id_fkey(id,name,email,avatar_url),user:users!appointments_user_id_fkey(id,name)";

pub struct CancellationService {
    supabase: Arc<SupabaseClient>,
    mailer: Arc<MailerClient>,
    locale: String,
}

impl CancellationService {
    pub fn new(
        supabase: Arc<SupabaseClient>,
        mailer: Arc<MailerClient>,
        config: &AppConfig,
    ) -> Self {
        Self {
            supabase,
            mailer,
            locale: config.locale.clone(),
        }
    }

    /// Cancel an appointment on behalf of its booking client. The state
    /// change commits first; the provider's mail goes out as a detached
    /// best-effort task afterwards.
    pub async fn cancel(
        &self,
        requester_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<AppointmentWithParties, AppointmentError> {
        debug!("Cancelling appointment {}", appointment_id);

        let path = format!(
            "/rest/v1/appointments?id=eq.{}&select={}",
            appointment_id, PARTIES_SELECT
        );
        let result: Vec<AppointmentWithParties> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let appointment = result
            .into_iter()
            .next()
            .ok_or(AppointmentError::NotFound)?;

        if appointment.user_id != requester_id {
            return Err(AppointmentError::Forbidden);
        }

        if appointment.canceled_at.is_some() {
            return Err(AppointmentError::AlreadyCanceled);
        }

        let now = Utc::now();
        if !within_cancellation_window(appointment.date, now) {
            return Err(AppointmentError::TooLate);
        }

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<AppointmentWithParties> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({
                    "canceled_at": now.to_rfc3339(),
                    "updated_at": now.to_rfc3339(),
                })),
                Some(headers),
            )
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let canceled = updated.into_iter().next().ok_or_else(|| {
            AppointmentError::Database("cancellation returned no record".to_string())
        })?;

        self.mailer.send_detached(MailMessage {
            to_name: canceled.provider.name.clone(),
            to_email: canceled.provider.email.clone(),
            subject: "Appointment canceled".to_string(),
            template: "cancellation".to_string(),
            context: json!({
                "provider": canceled.provider.name,
                "user": canceled.user.name,
                "date": dates::long_event_format(canceled.date, &self.locale),
            }),
        });

        info!(
            "Appointment {} canceled by client {}",
            canceled.id, requester_id
        );
        Ok(canceled)
    }
}
