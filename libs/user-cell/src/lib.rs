pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use handlers::UserCellState;
pub use models::{CreateUserRequest, UpdateUserRequest, User, UserError, UserResponse};
