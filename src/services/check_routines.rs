//! Built-in concrete check routines.
//!
//! Most routine families share one evidence-driven strategy: select the
//! evidence whose source mentions the family's keywords, average the
//! status weights, and blend in the family's L-Score component when one
//! was supplied. A few families need their own reading of the evidence
//! (cross-referencing, stub markers, test counts).
//!
//! Every routine returns a failed outcome for an empty evidence set, and
//! any contradicted evidence it looks at fails the check.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::domain::models::{
    CheckKind, CheckOutcome, EvidenceItem, EvidenceStatus, LScoreBreakdown,
};
use crate::domain::ports::CheckRoutine;

/// Share of a blended signal contributed by the evidence itself.
const EVIDENCE_SHARE: f64 = 0.7;

/// Note fragments that indicate unfinished code.
const STUB_MARKERS: [&str; 6] = [
    "stub",
    "todo",
    "fixme",
    "placeholder",
    "unimplemented",
    "not implemented",
];

/// Evidence whose source mentions one of the kind's keywords; all evidence
/// when nothing matches.
fn relevant_evidence<'a>(kind: CheckKind, evidence: &'a [EvidenceItem]) -> Vec<&'a EvidenceItem> {
    let matched: Vec<&EvidenceItem> = evidence
        .iter()
        .filter(|item| kind.matches(&item.source.to_lowercase()))
        .collect();
    if matched.is_empty() {
        evidence.iter().collect()
    } else {
        matched
    }
}

fn mean_weight(items: &[&EvidenceItem]) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().map(|i| i.status.weight()).sum::<f64>() / items.len() as f64
}

fn any_contradicted(items: &[&EvidenceItem]) -> bool {
    items.iter().any(|i| i.status == EvidenceStatus::Contradicted)
}

fn blend(kind: CheckKind, signal: f64, lscore: Option<&LScoreBreakdown>) -> f64 {
    match (kind.lscore_component(), lscore) {
        (Some(component), Some(score)) => {
            EVIDENCE_SHARE * signal + (1.0 - EVIDENCE_SHARE) * score.component(component)
        }
        _ => signal,
    }
}

fn outcome(actual: f64, expected: f64, contradicted: bool) -> CheckOutcome {
    let actual = actual.clamp(0.0, 1.0);
    CheckOutcome {
        actual,
        passed: !contradicted && actual >= expected,
    }
}

/// Generic evidence-weighted routine for one check family.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceCheck {
    kind: CheckKind,
}

impl EvidenceCheck {
    pub const fn new(kind: CheckKind) -> Self {
        Self { kind }
    }
}

impl CheckRoutine for EvidenceCheck {
    fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn evaluate(
        &self,
        expected: f64,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> CheckOutcome {
        if evidence.is_empty() {
            return CheckOutcome::unverifiable();
        }
        let items = relevant_evidence(self.kind, evidence);
        let actual = blend(self.kind, mean_weight(&items), lscore);
        outcome(actual, expected, any_contradicted(&items))
    }
}

/// Requires at least two independent sources that corroborate each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossReferenceCheck;

impl CheckRoutine for CrossReferenceCheck {
    fn name(&self) -> &'static str {
        CheckKind::CrossReference.as_str()
    }

    fn evaluate(
        &self,
        expected: f64,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> CheckOutcome {
        if evidence.is_empty() {
            return CheckOutcome::unverifiable();
        }
        let items: Vec<&EvidenceItem> = evidence.iter().collect();
        let corroborating: HashSet<&str> = items
            .iter()
            .filter(|i| i.status == EvidenceStatus::Present)
            .map(|i| i.source.as_str())
            .collect();

        let actual = blend(CheckKind::CrossReference, mean_weight(&items), lscore);
        let mut result = outcome(actual, expected, any_contradicted(&items));
        if corroborating.len() < 2 {
            result.passed = false;
        }
        result
    }
}

/// Penalizes evidence whose notes carry unfinished-work markers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubDetectionCheck;

impl StubDetectionCheck {
    fn is_flagged(item: &EvidenceItem) -> bool {
        let notes = item.notes.to_lowercase();
        STUB_MARKERS.iter().any(|m| notes.contains(m))
    }
}

impl CheckRoutine for StubDetectionCheck {
    fn name(&self) -> &'static str {
        CheckKind::StubDetection.as_str()
    }

    fn evaluate(
        &self,
        expected: f64,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> CheckOutcome {
        if evidence.is_empty() {
            return CheckOutcome::unverifiable();
        }
        let flagged = evidence.iter().filter(|i| Self::is_flagged(i)).count();
        let clean_share = 1.0 - flagged as f64 / evidence.len() as f64;
        let items: Vec<&EvidenceItem> = evidence.iter().collect();
        let actual = blend(CheckKind::StubDetection, clean_share, lscore);
        outcome(actual, expected, any_contradicted(&items))
    }
}

/// Reads `{"passed": n, "total": m}` payloads; falls back to evidence weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestPassRateCheck;

impl TestPassRateCheck {
    fn counts(item: &EvidenceItem) -> Option<(u64, u64)> {
        let payload = item.payload.as_ref()?;
        let passed = payload.get("passed")?.as_u64()?;
        let total = payload.get("total")?.as_u64()?;
        Some((passed.min(total), total))
    }
}

impl CheckRoutine for TestPassRateCheck {
    fn name(&self) -> &'static str {
        CheckKind::TestPassRate.as_str()
    }

    fn evaluate(
        &self,
        expected: f64,
        evidence: &[EvidenceItem],
        lscore: Option<&LScoreBreakdown>,
    ) -> CheckOutcome {
        if evidence.is_empty() {
            return CheckOutcome::unverifiable();
        }
        let (passed, total) = evidence
            .iter()
            .filter_map(Self::counts)
            .fold((0_u128, 0_u128), |(p, t), (ip, it)| {
                (p + u128::from(ip), t + u128::from(it))
            });

        if total == 0 {
            return EvidenceCheck::new(CheckKind::TestPassRate).evaluate(expected, evidence, lscore);
        }

        let items: Vec<&EvidenceItem> = evidence.iter().collect();
        outcome(passed as f64 / total as f64, expected, any_contradicted(&items))
    }
}

/// Fallback for checks no phase-specific routine claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCheck;

impl CheckRoutine for DefaultCheck {
    fn name(&self) -> &'static str {
        CheckKind::Default.as_str()
    }

    fn evaluate(
        &self,
        expected: f64,
        evidence: &[EvidenceItem],
        _lscore: Option<&LScoreBreakdown>,
    ) -> CheckOutcome {
        if evidence.is_empty() {
            return CheckOutcome::unverifiable();
        }
        let items: Vec<&EvidenceItem> = evidence.iter().collect();
        outcome(mean_weight(&items), expected, any_contradicted(&items))
    }
}

/// Every built-in routine, keyed by the family it serves.
pub fn builtin_routines() -> HashMap<CheckKind, Arc<dyn CheckRoutine>> {
    let mut routines: HashMap<CheckKind, Arc<dyn CheckRoutine>> = HashMap::new();
    for phase in crate::domain::models::Phase::ALL {
        for kind in CheckKind::candidates(phase) {
            routines.insert(*kind, Arc::new(EvidenceCheck::new(*kind)));
        }
    }
    routines.insert(CheckKind::CrossReference, Arc::new(CrossReferenceCheck));
    routines.insert(CheckKind::StubDetection, Arc::new(StubDetectionCheck));
    routines.insert(CheckKind::TestPassRate, Arc::new(TestPassRateCheck));
    routines.insert(CheckKind::Default, Arc::new(DefaultCheck));
    routines
}
