//! Data model of the session store.

pub mod record;


// Re-export main types
pub use record::{Data, Record};
