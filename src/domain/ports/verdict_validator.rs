//! Verdict validator port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{LScoreBreakdown, Phase, ValidationContext, ValidationOutcome};

/// Decides whether a phase is GUILTY or INNOCENT.
///
/// The phase gate supplies the computed L-Score, sets
/// `context.remediation_attempts` to the retry count, and sets
/// `context.min_tier` to the tier the retry sequence has already reached.
/// Implementations must not investigate below that tier.
#[async_trait]
pub trait VerdictValidator: Send + Sync {
    async fn validate_phase(
        &self,
        phase: Phase,
        lscore: &LScoreBreakdown,
        context: &ValidationContext,
        retry_count: u32,
    ) -> DomainResult<ValidationOutcome>;
}
