use axum::{routing::post, Router};

use crate::handlers::{self, SessionCellState};

pub fn session_routes(state: SessionCellState) -> Router {
    // Login and token introspection are the unauthenticated entry points.
    Router::new()
        .route("/", post(handlers::store))
        .route("/verify", post(handlers::verify))
        .with_state(state)
}
