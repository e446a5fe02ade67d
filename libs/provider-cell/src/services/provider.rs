use std::sync::Arc;

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_database::SupabaseClient;

use crate::models::{ProviderError, ProviderSummary};

const PROVIDER_SELECT: &str = "id,name,email,avatar_url";

pub struct ProviderService {
    supabase: Arc<SupabaseClient>,
}

impl ProviderService {
    pub fn new(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// All provider-flagged users, ordered by name.
    pub async fn list_providers(&self) -> Result<Vec<ProviderSummary>, ProviderError> {
        debug!("Listing providers");

        let path = format!(
            "/rest/v1/users?provider=is.true&select={}&order=name.asc",
            PROVIDER_SELECT
        );
        let providers: Vec<ProviderSummary> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ProviderError::Database(e.to_string()))?;

        Ok(providers)
    }

    /// Resolve a provider by id; a user without the provider flag does not
    /// count.
    pub async fn get_provider(&self, provider_id: Uuid) -> Result<ProviderSummary, ProviderError> {
        let path = format!(
            "/rest/v1/users?id=eq.{}&provider=is.true&select={}",
            provider_id, PROVIDER_SELECT
        );
        let result: Vec<ProviderSummary> = self
            .supabase
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| ProviderError::Database(e.to_string()))?;

        result.into_iter().next().ok_or(ProviderError::NotFound)
    }
}
