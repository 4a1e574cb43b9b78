//! Record store: the only access path to session records.

pub mod error;
pub mod store;


// Re-export main types
pub use error::StoreError;
pub use store::Store;
