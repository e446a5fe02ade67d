pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::SessionCellState;
pub use models::{AuthError, SessionRequest, SessionResponse};
pub use services::session::SessionService;
