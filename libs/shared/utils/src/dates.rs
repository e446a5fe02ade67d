use chrono::{DateTime, Locale, Utc};

/// Render a timestamp the way it appears in notification and mail bodies,
/// e.g. "March 14, 10:30". Month names follow the configured locale; an
/// unknown locale name falls back to en_US.
pub fn long_event_format(date: DateTime<Utc>, locale: &str) -> String {
    let locale = Locale::try_from(locale).unwrap_or(Locale::en_US);
    date.format_localized("%B %-d, %H:%M", locale).to_string()
}
