pub mod bulk;
pub mod token;
pub mod tree;
