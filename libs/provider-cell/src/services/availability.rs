use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::SupabaseClient;

use crate::models::{DaySlot, ProviderError};
use crate::services::provider::ProviderService;

const SLOT_MINUTES: i64 = 30;

#[derive(Debug, Deserialize)]
struct BookedSlot {
    date: DateTime<Utc>,
}

pub struct AvailabilityService {
    supabase: Arc<SupabaseClient>,
    providers: Arc<ProviderService>,
    opens_at: u32,
    closes_at: u32,
}

impl AvailabilityService {
    pub fn new(
        supabase: Arc<SupabaseClient>,
        providers: Arc<ProviderService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            supabase,
            providers,
            opens_at: config.schedule_opens_at,
            closes_at: config.schedule_closes_at,
        }
    }

    /// Calculate the half-hour slot grid for a provider's day, marking each
    /// slot unavailable when it is not in the future or already booked.
    pub async fn day_slots(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DaySlot>, ProviderError> {
        debug!("Calculating available slots for provider {} on {}", provider_id, date);

        self.providers.get_provider(provider_id).await?;

        let taken = self.booked_times(provider_id, date).await?;
        let slots = build_day_grid(date, self.opens_at, self.closes_at, Utc::now(), &taken);

        debug!("Computed {} slots for provider {}", slots.len(), provider_id);
        Ok(slots)
    }

    /// Start times of the provider's active appointments on the given day.
    async fn booked_times(
        &self,
        provider_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<DateTime<Utc>>, ProviderError> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = day_start + Duration::days(1);

        let path = format!(
            "/rest/v1/appointments?provider_id=eq.{}&canceled_at=is.null&date=gte.{}&date=lt.{}&select=date&order=date.asc",
            provider_id,
            urlencoding::encode(&day_start.to_rfc3339()),
            urlencoding::encode(&day_end.to_rfc3339()),
        );
        let booked: Vec<BookedSlot> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ProviderError::Database(e.to_string()))?;

        Ok(booked.into_iter().map(|slot| slot.date).collect())
    }
}

/// The candidate grid runs from the opening hour to the closing hour
/// (exclusive) at 30-minute spacing. A slot stays available only while it is
/// strictly in the future and unoccupied.
fn build_day_grid(
    date: NaiveDate,
    opens_at: u32,
    closes_at: u32,
    now: DateTime<Utc>,
    taken: &[DateTime<Utc>],
) -> Vec<DaySlot> {
    let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let closing = day_start + Duration::hours(closes_at as i64);

    let mut slots = Vec::new();
    let mut current = day_start + Duration::hours(opens_at as i64);

    while current < closing {
        slots.push(DaySlot {
            time: current.format("%H:%M").to_string(),
            value: current,
            available: current > now && !taken.contains(&current),
        });

        current += Duration::minutes(SLOT_MINUTES);
    }

    slots
}
