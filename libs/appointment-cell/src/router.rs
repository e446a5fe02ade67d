use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, AppointmentCellState};

pub fn appointment_routes(state: AppointmentCellState) -> Router {
    // All appointment operations require authentication
    Router::new()
        .route("/", get(handlers::index).post(handlers::store))
        .route("/{appointment_id}", delete(handlers::destroy))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ))
        .with_state(state)
}

/// The provider's own day view, mounted at `/schedule`.
pub fn schedule_routes(state: AppointmentCellState) -> Router {
    Router::new()
        .route("/", get(handlers::schedule))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ))
        .with_state(state)
}
