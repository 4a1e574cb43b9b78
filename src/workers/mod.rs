// Background workers operating on the session store.

pub mod backend;
pub mod config;
pub mod sweeper;

// Re-export main types
pub use backend::ExpiryBackend;
pub use config::SweeperConfig;
pub use sweeper::{Sweeper, SweeperState};
