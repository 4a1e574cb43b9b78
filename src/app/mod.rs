// Demo application wiring the session db.

pub mod app;

pub use app::{App, DemoReport};
