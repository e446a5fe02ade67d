pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::AppointmentCellState;
pub use models::{Appointment, AppointmentError, BookAppointmentRequest};
pub use services::booking::BookingService;
pub use services::cancellation::CancellationService;
