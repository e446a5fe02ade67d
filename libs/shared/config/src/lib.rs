use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_sender: String,
    pub locale: String,
    pub schedule_opens_at: u32,
    pub schedule_closes_at: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            token_ttl_hours: parse_env("TOKEN_TTL_HOURS", 168),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, mail dispatch disabled");
                    String::new()
                }),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_sender: env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "Bookly <noreply@bookly.app>".to_string()),
            locale: env::var("APP_LOCALE").unwrap_or_else(|_| "en_US".to_string()),
            schedule_opens_at: parse_env("SCHEDULE_OPENS_AT", 8),
            schedule_closes_at: parse_env("SCHEDULE_CLOSES_AT", 20),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_service_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty() && !self.mail_api_key.is_empty()
    }
}

fn parse_env<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value, using default", name);
            default
        }),
        Err(_) => default,
    }
}
