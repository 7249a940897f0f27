//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces of the collaborators the core consumes:
//! - ProgressStore: read access to agent progress records
//! - FileClaimsStore: read access to file claims
//! - VerdictValidator: the GUILTY/INNOCENT decision for a phase
//! - CheckRoutine: one concrete verification routine family
//!
//! The core never writes through these ports.

pub mod check_routine;
pub mod file_claims_store;
pub mod progress_store;
pub mod verdict_validator;

pub use check_routine::CheckRoutine;
pub use file_claims_store::FileClaimsStore;
pub use progress_store::ProgressStore;
pub use verdict_validator::VerdictValidator;
