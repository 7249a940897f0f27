//! Phase gate domain model.
//!
//! Holds the inputs and outputs of a phase validation and the per-phase
//! attempt state machine:
//!
//! ```text
//! NotStarted -> Validating -> Passed
//!                    |   ^
//!                    v   | retry()
//!           RemediationRequired
//! ```
//!
//! `restart()` returns any state to `NotStarted` when the pipeline rewinds
//! to an earlier phase; it is the only way the retry count or the
//! investigation tier ever go back down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

use super::case_file::{AdversarialFinding, CaseFile, InvestigationTier, Verdict};
use super::lscore::{LScoreBreakdown, LScoreComponent};
use super::phase::Phase;
use super::verification::EvidenceItem;

/// Raw outcome of executing a phase's work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseExecutionResult {
    /// Whether the phase reported overall success.
    pub success: bool,
    #[serde(default)]
    pub agents_succeeded: u32,
    #[serde(default)]
    pub agents_failed: u32,
    /// Execution time; `None` when not measured.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    /// What the investigation is about (feature, ticket, module).
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub evidence: Vec<EvidenceItem>,
    #[serde(default)]
    pub adversarial_findings: Vec<AdversarialFinding>,
    /// Component values reported by tooling (coverage, scanners, profilers).
    /// A measurement replaces the heuristic estimate for its component.
    #[serde(default)]
    pub measurements: BTreeMap<LScoreComponent, f64>,
}

impl PhaseExecutionResult {
    pub fn new(success: bool) -> Self {
        Self {
            success,
            ..Default::default()
        }
    }

    pub fn with_agents(mut self, succeeded: u32, failed: u32) -> Self {
        self.agents_succeeded = succeeded;
        self.agents_failed = failed;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_evidence(mut self, evidence: Vec<EvidenceItem>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_finding(mut self, finding: AdversarialFinding) -> Self {
        self.adversarial_findings.push(finding);
        self
    }

    pub fn with_measurement(mut self, component: LScoreComponent, value: f64) -> Self {
        self.measurements.insert(component, value);
        self
    }

    pub fn total_agents(&self) -> u32 {
        self.agents_succeeded.saturating_add(self.agents_failed)
    }

    /// Share of sub-agents that succeeded, or `None` without sub-agents.
    pub fn success_ratio(&self) -> Option<f64> {
        let total = self.total_agents();
        (total > 0).then(|| f64::from(self.agents_succeeded) / f64::from(total))
    }
}

/// Context handed to the verdict validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Number of remediation rounds already attempted (the retry count).
    pub remediation_attempts: u32,
    /// Lowest tier the investigation may run at. Already reached tiers of
    /// the retry sequence never drop.
    #[serde(default)]
    pub min_tier: InvestigationTier,
    pub subject: String,
    pub evidence: Vec<EvidenceItem>,
    pub adversarial_findings: Vec<AdversarialFinding>,
}

/// What a verdict validator decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub can_proceed: bool,
    #[serde(default)]
    pub investigation_tier: Option<InvestigationTier>,
    #[serde(default)]
    pub remediations: Vec<String>,
    #[serde(default)]
    pub case_file: Option<CaseFile>,
    /// Rendered case-file report, when the validator produced one.
    #[serde(default)]
    pub report: Option<String>,
}

impl ValidationOutcome {
    pub fn innocent() -> Self {
        Self {
            can_proceed: true,
            investigation_tier: None,
            remediations: Vec::new(),
            case_file: None,
            report: None,
        }
    }

    pub fn guilty(remediations: Vec<String>) -> Self {
        Self {
            can_proceed: false,
            investigation_tier: None,
            remediations,
            case_file: None,
            report: None,
        }
    }

    pub fn with_tier(mut self, tier: InvestigationTier) -> Self {
        self.investigation_tier = Some(tier);
        self
    }

    pub fn verdict(&self) -> Verdict {
        if self.can_proceed {
            Verdict::Innocent
        } else {
            Verdict::Guilty
        }
    }
}

/// The phase gate's view of one validation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseValidation {
    pub phase: Phase,
    pub lscore: LScoreBreakdown,
    pub meets_threshold: bool,
    pub verdict: Verdict,
    pub investigation_tier: InvestigationTier,
    pub retry_count: u32,
    pub remediations: Vec<String>,
    pub case_file: Option<CaseFile>,
    pub report: Option<String>,
}

impl PhaseValidation {
    pub fn can_proceed(&self) -> bool {
        self.verdict.can_proceed()
    }
}

/// State of a phase's validation attempt sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    NotStarted,
    Validating,
    Passed,
    RemediationRequired,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Validating => "validating",
            Self::Passed => "passed",
            Self::RemediationRequired => "remediation_required",
        }
    }

    pub fn valid_transitions(&self) -> Vec<GateState> {
        match self {
            Self::NotStarted => vec![Self::Validating],
            Self::Validating => vec![Self::Passed, Self::RemediationRequired],
            Self::RemediationRequired => vec![Self::Validating],
            Self::Passed => vec![],
        }
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// One verdict in an attempt sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub retry_count: u32,
    pub tier: InvestigationTier,
    /// `None` when the phase was passed without a validator.
    pub verdict: Option<Verdict>,
}

/// Attempt sequence for a single phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAttempt {
    phase: Phase,
    state: GateState,
    retry_count: u32,
    tier: InvestigationTier,
    history: Vec<AttemptRecord>,
}

impl PhaseAttempt {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            state: GateState::NotStarted,
            retry_count: 0,
            tier: InvestigationTier::Routine,
            history: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn tier(&self) -> InvestigationTier {
        self.tier
    }

    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    fn transition(&mut self, next: GateState, reason: &str) -> DomainResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.as_str().to_string(),
                to: next.as_str().to_string(),
                reason: reason.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    /// Start the first validation at `tier`.
    pub fn begin(&mut self, tier: InvestigationTier) -> DomainResult<()> {
        self.transition(GateState::Validating, "validation can only begin once per sequence")?;
        self.tier = self.tier.max(tier);
        Ok(())
    }

    /// Record the verdict of the running validation, investigated at `tier`.
    pub fn record_verdict(&mut self, verdict: Verdict, tier: InvestigationTier) -> DomainResult<()> {
        let next = match verdict {
            Verdict::Innocent => GateState::Passed,
            Verdict::Guilty => GateState::RemediationRequired,
        };
        self.transition(next, "no validation is running")?;
        self.tier = self.tier.max(tier);
        self.history.push(AttemptRecord {
            retry_count: self.retry_count,
            tier: self.tier,
            verdict: Some(verdict),
        });
        Ok(())
    }

    /// Pass the running validation without a verdict (no validator configured).
    pub fn pass_ungated(&mut self) -> DomainResult<()> {
        self.transition(GateState::Passed, "no validation is running")?;
        self.history.push(AttemptRecord {
            retry_count: self.retry_count,
            tier: self.tier,
            verdict: None,
        });
        Ok(())
    }

    /// Retry after remediation. The tier never drops below its current level.
    pub fn retry(&mut self, tier: InvestigationTier) -> DomainResult<u32> {
        self.transition(GateState::Validating, "retry requires a GUILTY verdict")?;
        self.retry_count += 1;
        self.tier = self.tier.max(tier);
        Ok(self.retry_count)
    }

    /// Reset the sequence because the pipeline restarted from an earlier phase.
    pub fn restart(&mut self) {
        self.state = GateState::NotStarted;
        self.retry_count = 0;
        self.tier = InvestigationTier::Routine;
        self.history.clear();
    }
}
