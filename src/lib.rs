// Library surface for the binary, headless/integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod language;
pub mod layout;
pub mod metrics;
pub mod normalizer;
pub mod passage;
pub mod runtime;
pub mod session;
pub mod time_series;
pub mod timer;
pub mod typing_policy;
pub mod ui;

pub use error::{Error, Result};
