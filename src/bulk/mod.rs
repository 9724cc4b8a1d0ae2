//! Bulk actions: one named operation applied to a set of record ids in a
//! single all-or-nothing batch.
//!
//! Flow per request: parse body → role gate → resolve the action against the
//! caller's dispatch table → load targets → seller ownership check → evaluate
//! every delete guard → commit one batch.

pub mod actions;
pub mod error;
pub mod executor;
pub mod guards;
pub mod mutation;
pub mod ownership;
pub mod policy;
pub mod request;

pub use actions::Action;
pub use error::{BulkError, Violation};
pub use executor::{BulkExecutor, BulkOutcome};
pub use mutation::Mutation;
pub use request::{parse_bulk_body, parse_bulk_request, BulkRequest};
