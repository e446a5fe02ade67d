use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use shared_config::AppConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail gateway is not configured")]
    NotConfigured,

    #[error("mail gateway transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail gateway rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// A templated message for the mail gateway: the gateway owns the template
/// bodies, we send the template name and its context mapping.
#[derive(Debug, Clone, Serialize)]
pub struct MailMessage {
    pub to_name: String,
    pub to_email: String,
    pub subject: String,
    pub template: String,
    pub context: Value,
}

/// HTTP client for the transactional mail gateway.
pub struct MailerClient {
    client: Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl MailerClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.mail_api_url.clone(),
            api_key: config.mail_api_key.clone(),
            sender: config.mail_sender.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_key.is_empty()
    }

    pub async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        if !self.is_configured() {
            return Err(MailerError::NotConfigured);
        }

        let url = format!("{}/messages", self.api_url);
        debug!("Sending {} mail to {}", message.template, message.to_email);

        let body = json!({
            "from": self.sender,
            "to": format!("{} <{}>", message.to_name, message.to_email),
            "subject": message.subject,
            "template": message.template,
            "context": message.context,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        info!("Mail delivered to {}", message.to_email);
        Ok(())
    }

    /// Dispatch without blocking the caller. The message is handed to a
    /// detached task; delivery failures are logged, never propagated.
    pub fn send_detached(self: &Arc<Self>, message: MailMessage) {
        let mailer = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&message).await {
                warn!(
                    "Failed to deliver {} mail to {}: {}",
                    message.template, message.to_email, e
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_url: &str, api_key: &str) -> AppConfig {
        AppConfig {
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            mail_api_url: api_url.to_string(),
            mail_api_key: api_key.to_string(),
            mail_sender: "Bookly <noreply@bookly.app>".to_string(),
            locale: "en_US".to_string(),
            schedule_opens_at: 8,
            schedule_closes_at: 20,
        }
    }

    fn cancellation_message() -> MailMessage {
        MailMessage {
            to_name: "Sasha Barber".to_string(),
            to_email: "sasha@example.com".to_string(),
            subject: "Appointment canceled".to_string(),
            template: "cancellation".to_string(),
            context: json!({ "provider": "Sasha Barber" }),
        }
    }

    #[tokio::test]
    async fn send_posts_to_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = MailerClient::new(&test_config(&server.uri(), "test-key"));
        mailer.send(&cancellation_message()).await.unwrap();
    }

    #[tokio::test]
    async fn send_surfaces_gateway_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(422))
            .mount(&server)
            .await;

        let mailer = MailerClient::new(&test_config(&server.uri(), "test-key"));
        let err = mailer.send(&cancellation_message()).await.unwrap_err();
        assert_matches!(err, MailerError::Rejected { status: 422, .. });
    }

    #[tokio::test]
    async fn send_fails_fast_when_unconfigured() {
        let mailer = MailerClient::new(&test_config("", ""));
        let err = mailer.send(&cancellation_message()).await.unwrap_err();
        assert_matches!(err, MailerError::NotConfigured);
    }
}
