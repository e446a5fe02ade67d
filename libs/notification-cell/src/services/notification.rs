use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::SupabaseClient;

use crate::models::{Notification, NotificationError};

const NOTIFICATIONS_PER_PAGE: u32 = 20;

#[derive(Clone)]
pub struct NotificationService {
    supabase: Arc<SupabaseClient>,
}

impl NotificationService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Latest notifications addressed to a provider, newest first.
    pub async fn list_for_provider(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Notification>, NotificationError> {
        debug!("Listing notifications for provider {}", user_id);

        self.ensure_provider(user_id).await?;

        let path = format!(
            "/rest/v1/notifications?user_id=eq.{}&order=created_at.desc&limit={}",
            user_id, NOTIFICATIONS_PER_PAGE
        );
        let notifications: Vec<Notification> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        Ok(notifications)
    }

    /// Mark a notification read. Only the recipient may do this.
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification, NotificationError> {
        debug!("Marking notification {} read", notification_id);

        let path = format!("/rest/v1/notifications?id=eq.{}", notification_id);
        let result: Vec<Notification> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        let notification = result
            .into_iter()
            .next()
            .ok_or(NotificationError::NotFound)?;

        if notification.user_id != user_id {
            return Err(NotificationError::Forbidden);
        }

        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let updated: Vec<Notification> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "read": true })),
                Some(headers),
            )
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        updated
            .into_iter()
            .next()
            .ok_or(NotificationError::NotFound)
    }

    async fn ensure_provider(&self, user_id: Uuid) -> Result<(), NotificationError> {
        let path = format!("/rest/v1/users?id=eq.{}&provider=is.true&select=id", user_id);
        let result: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| NotificationError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(NotificationError::NotProvider);
        }

        Ok(())
    }
}
