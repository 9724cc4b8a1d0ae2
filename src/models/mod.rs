pub mod category;
pub mod status;

pub use category::{Category, NewCategory};
pub use status::{ApprovalStatus, AuctionStatus, OrderStatus, ProductStatus};
