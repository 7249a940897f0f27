//! Verification Matrix Engine.
//!
//! Executes the checks of a [`VerificationMatrix`] against collected
//! evidence. Method descriptors were already classified into a
//! [`CheckKind`] when the matrix was defined, so execution is a plain
//! lookup in an explicit routine registry. Kinds without a registered
//! routine run the default routine.
//!
//! The engine holds no mutable state; a single instance can be shared by
//! every concurrent phase validation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::models::{
    CheckKind, ClassifiedCheck, EvidenceItem, LScoreBreakdown, VerificationCheckResult,
    VerificationMatrix,
};
use crate::domain::ports::CheckRoutine;
use crate::services::check_routines::{builtin_routines, DefaultCheck};

/// Routes classified checks to concrete routines and aggregates results.
#[derive(Clone)]
pub struct VerificationMatrixEngine {
    routines: HashMap<CheckKind, Arc<dyn CheckRoutine>>,
    fallback: Arc<dyn CheckRoutine>,
}

impl std::fmt::Debug for VerificationMatrixEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&str> = self.routines.keys().map(CheckKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("VerificationMatrixEngine")
            .field("routines", &kinds)
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl Default for VerificationMatrixEngine {
    fn default() -> Self {
        Self::with_builtin_routines()
    }
}

impl VerificationMatrixEngine {
    /// An engine with no phase-specific routines; everything runs the default.
    pub fn empty() -> Self {
        Self {
            routines: HashMap::new(),
            fallback: Arc::new(DefaultCheck),
        }
    }

    /// An engine populated with every built-in routine.
    pub fn with_builtin_routines() -> Self {
        Self {
            routines: builtin_routines(),
            fallback: Arc::new(DefaultCheck),
        }
    }

    /// Register (or replace) the routine for a check family.
    pub fn with_routine(mut self, kind: CheckKind, routine: Arc<dyn CheckRoutine>) -> Self {
        if kind == CheckKind::Default {
            self.fallback = Arc::clone(&routine);
        }
        self.routines.insert(kind, routine);
        self
    }

    fn routine_for(&self, kind: CheckKind) -> &Arc<dyn CheckRoutine> {
        self.routines.get(&kind).unwrap_or(&self.fallback)
    }

    /// Execute one classified check. Never fails.
    pub fn execute_check(
        &self,
        check: &ClassifiedCheck,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> VerificationCheckResult {
        let routine = self.routine_for(check.kind);
        let outcome = routine.evaluate(check.entry.expected, evidence, lscore);

        debug!(
            check = %check.entry.check,
            kind = check.kind.as_str(),
            routine = routine.name(),
            actual = outcome.actual,
            expected = check.entry.expected,
            passed = outcome.passed,
            "Verification check executed"
        );

        VerificationCheckResult {
            check: check.entry.check.clone(),
            method: check.entry.method.clone(),
            expected: check.entry.expected,
            actual: outcome.actual,
            passed: outcome.passed,
        }
    }

    /// Execute every check of a matrix, one result per entry in matrix order.
    pub fn run_matrix(
        &self,
        matrix: &VerificationMatrix,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> Vec<VerificationCheckResult> {
        matrix
            .checks()
            .iter()
            .map(|check| self.execute_check(check, evidence, lscore))
            .collect()
    }
}

/// Share of passed results: 0 for no results, otherwise passed / total.
pub fn pass_rate(results: &[VerificationCheckResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    passed as f64 / results.len() as f64
}
