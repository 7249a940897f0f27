//! Sherlock - forensic phase gate for multi-agent coding pipelines
//!
//! Before a pipeline phase (1-7) may advance, Sherlock scores it, runs a
//! machine-executed verification matrix over the collected evidence, files
//! an immutable case with a binding GUILTY/INNOCENT verdict, and escalates
//! the rigor of each retry. Alongside the gate, it gives every concurrently
//! running agent a snapshot of peer progress, decisions and file claims.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the ports the core reads through
//! - **Service Layer** (`services`): L-Score, verification matrix, case files, gate, awareness
//! - **Adapters** (`adapters`): in-process implementations of the store ports
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sherlock::{Config, ForensicValidator, PhaseExecutionResult, PhaseGate};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let gate = PhaseGate::new(&config)
//!         .with_validator(Arc::new(ForensicValidator::new(&config)));
//!     let result = PhaseExecutionResult::new(true).with_agents(4, 0);
//!     if let Some(validation) = gate.validate_phase(4, &result, 0).await? {
//!         println!("{}", validation.report.unwrap_or_default());
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::{InMemoryFileClaimsStore, InMemoryProgressStore};
pub use domain::models::{
    get_phase_threshold, CaseFile, Config, EvidenceItem, EvidenceStatus, InvestigationTier,
    LScoreBreakdown, Phase, PhaseAttempt, PhaseExecutionResult, PhaseValidation, Verdict,
    VerificationMatrix,
};
pub use domain::ports::{CheckRoutine, FileClaimsStore, ProgressStore, VerdictValidator};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    render_report, CaseFileBuilder, EscalationPolicy, ForensicValidator, LScoreCalculator,
    PhaseGate, SituationalAwarenessBuilder, VerificationMatrixEngine,
};
