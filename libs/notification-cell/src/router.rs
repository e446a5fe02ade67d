use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, NotificationCellState};

pub fn notification_routes(state: NotificationCellState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/{notification_id}", put(handlers::update))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ))
        .with_state(state)
}
