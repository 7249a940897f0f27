//! Infrastructure layer module
//!
//! Process-level concerns kept out of the domain and services:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)

pub mod config;
pub mod logging;
