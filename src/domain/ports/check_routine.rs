//! Concrete check routine port.

use crate::domain::models::{CheckOutcome, EvidenceItem, LScoreBreakdown};

/// One family of concrete verification routine.
///
/// Routines never fail: evidence they cannot interpret yields
/// [`CheckOutcome::unverifiable`] rather than an error or a panic.
pub trait CheckRoutine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Derive a value from the evidence and compare it with `expected`.
    fn evaluate(
        &self,
        expected: f64,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> CheckOutcome;
}
