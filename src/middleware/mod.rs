pub mod auth;
pub mod response;

pub use auth::require_actor;
pub use response::{ApiResponse, ApiResult};
