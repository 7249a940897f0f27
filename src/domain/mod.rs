//! Domain layer for the Sherlock phase gate
//!
//! This module contains the core domain models, errors, and the port
//! traits through which external collaborators are consumed.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
