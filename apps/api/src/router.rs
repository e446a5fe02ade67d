use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::router::{appointment_routes, schedule_routes};
use appointment_cell::services::booking::BookingService;
use appointment_cell::services::cancellation::CancellationService;
use auth_cell::handlers::SessionCellState;
use auth_cell::router::session_routes;
use auth_cell::services::session::SessionService;
use notification_cell::handlers::NotificationCellState;
use notification_cell::router::notification_routes;
use notification_cell::services::notification::NotificationService;
use provider_cell::handlers::ProviderCellState;
use provider_cell::router::provider_routes;
use provider_cell::services::availability::AvailabilityService;
use provider_cell::services::provider::ProviderService;
use shared_config::AppConfig;
use shared_database::SupabaseClient;
use shared_mailer::MailerClient;
use user_cell::handlers::UserCellState;
use user_cell::router::user_routes;
use user_cell::services::user::UserService;

/// Build every service once at startup and hand each cell its state.
pub fn create_router(config: Arc<AppConfig>) -> Router {
    let supabase = Arc::new(SupabaseClient::new(&config));
    let mailer = Arc::new(MailerClient::new(&config));

    let users = Arc::new(UserService::new(Arc::clone(&supabase)));
    let sessions = Arc::new(SessionService::new(Arc::clone(&supabase), &config));
    let providers = Arc::new(ProviderService::new(Arc::clone(&supabase)));
    let availability = Arc::new(AvailabilityService::new(
        Arc::clone(&supabase),
        Arc::clone(&providers),
        &config,
    ));
    let notifications = NotificationService::new(Arc::clone(&supabase));
    let bookings = Arc::new(BookingService::new(
        Arc::clone(&supabase),
        Arc::clone(&providers),
        &config,
    ));
    let cancellations = Arc::new(CancellationService::new(
        Arc::clone(&supabase),
        Arc::clone(&mailer),
        &config,
    ));

    let appointment_state = AppointmentCellState {
        bookings,
        cancellations,
        config: Arc::clone(&config),
    };

    Router::new()
        .route("/", get(|| async { "Bookly API is running!" }))
        .nest(
            "/users",
            user_routes(UserCellState {
                users,
                config: Arc::clone(&config),
            }),
        )
        .nest(
            "/sessions",
            session_routes(SessionCellState {
                sessions,
                config: Arc::clone(&config),
            }),
        )
        .nest(
            "/providers",
            provider_routes(ProviderCellState {
                providers,
                availability,
                config: Arc::clone(&config),
            }),
        )
        .nest("/appointments", appointment_routes(appointment_state.clone()))
        .nest("/schedule", schedule_routes(appointment_state))
        .nest(
            "/notifications",
            notification_routes(NotificationCellState {
                notifications,
                config,
            }),
        )
}
