//! Session storage and its background expiry.

pub mod db;
pub mod store;

// Re-export main types
pub use db::{DB, SVC_SWEEPER};
pub use store::{Store, StoreError};
