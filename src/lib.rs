#[path = "shared/sid/mod.rs"]
pub mod sid;
#[path = "shared/time/mod.rs"]
pub mod time;
#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod app;
pub mod config;
pub mod db;
pub mod metrics;
pub mod model;
pub mod shutdown;
pub mod workers;
