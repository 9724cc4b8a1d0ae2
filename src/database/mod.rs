pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod store;

pub use document::{Document, Fields, WriteBatch, WriteOp};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use query::{Condition, Query, SortDirection};
pub use store::{connect, DocumentStore, SharedStore};
