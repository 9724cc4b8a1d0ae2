pub mod hierarchy;
pub mod service;
pub mod tree;

pub use hierarchy::find_cycle;
pub use service::{CategoryError, CategoryService};
pub use tree::{build_category_tree, CategoryNode};
