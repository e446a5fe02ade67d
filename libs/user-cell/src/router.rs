use std::sync::Arc;

use axum::{
    middleware,
    routing::{post, put},
    Router,
};

use shared_utils::extractor::auth_middleware;

use crate::handlers::{self, UserCellState};

pub fn user_routes(state: UserCellState) -> Router {
    // Signup is public; profile updates require authentication.
    let protected_routes = Router::new()
        .route("/", put(handlers::update))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.config),
            auth_middleware,
        ));

    Router::new()
        .route("/", post(handlers::store))
        .merge(protected_routes)
        .with_state(state)
}
