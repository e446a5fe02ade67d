pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::NotificationCellState;
pub use models::{Notification, NotificationError};
pub use services::notification::NotificationService;
