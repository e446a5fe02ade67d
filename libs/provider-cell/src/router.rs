use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, ProviderCellState};

pub fn provider_routes(state: ProviderCellState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/{provider_id}/available", get(handlers::available))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ))
        .with_state(state)
}
