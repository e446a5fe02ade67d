pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::ProviderCellState;
pub use models::{DaySlot, ProviderError, ProviderSummary};
pub use services::availability::AvailabilityService;
pub use services::provider::ProviderService;
