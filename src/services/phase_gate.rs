//! Phase Gate.
//!
//! Decides whether a pipeline phase may advance. The gate computes the
//! phase's L-Score, hands it to the configured verdict validator together
//! with the retry count, and turns a GUILTY verdict into a phase-prefixed
//! remediation list. Investigation tiers escalate with the retry count and
//! never drop within a retry sequence.
//!
//! Without a validator the gate is a no-op: validation returns `None` and
//! the pipeline runs ungated. That is the expected mode for bootstrap and
//! test environments, not an error.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Config, GateState, InvestigationTier, LScoreBreakdown, Phase, PhaseAttempt,
    PhaseExecutionResult, PhaseValidation, ValidationContext, ValidationOutcome, Verdict,
};
use crate::domain::ports::VerdictValidator;
use crate::services::escalation::EscalationPolicy;
use crate::services::lscore_calculator::LScoreCalculator;

/// Whether an L-Score's composite clears the phase's fixed threshold.
pub fn meets_phase_threshold(phase: Phase, lscore: &LScoreBreakdown) -> bool {
    lscore.composite() >= phase.threshold()
}

/// Remediation lines for a GUILTY validation, each prefixed with phase context.
///
/// The first line names the phase, the verdict and the investigation tier.
/// An INNOCENT validation yields an empty list; a GUILTY one never does.
pub fn handle_guilty_verdict(validation: &PhaseValidation, phase: Phase) -> Vec<String> {
    if validation.verdict == Verdict::Innocent {
        return Vec::new();
    }

    let mut lines = vec![format!(
        "[{}] GUILTY verdict at {} investigation tier (retry {}, L-Score {:.3} vs threshold {:.2}): remediation required before advancing",
        phase,
        validation.investigation_tier.as_str(),
        validation.retry_count,
        validation.lscore.composite(),
        phase.threshold(),
    )];

    if validation.remediations.is_empty() {
        warn!(phase = phase.number(), "GUILTY verdict carried no remediations");
        let (component, value) = validation.lscore.weakest();
        lines.push(format!(
            "[{}] Re-run the phase and strengthen {} (currently {:.2}) before the next investigation",
            phase.name(),
            component.as_str(),
            value
        ));
    } else {
        lines.extend(
            validation
                .remediations
                .iter()
                .map(|r| format!("[{}] {}", phase.name(), r)),
        );
    }

    lines
}

/// Gate that every phase attempt passes through.
#[derive(Clone)]
pub struct PhaseGate {
    calculator: LScoreCalculator,
    escalation: EscalationPolicy,
    validator: Option<Arc<dyn VerdictValidator>>,
}

impl std::fmt::Debug for PhaseGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseGate")
            .field("calculator", &self.calculator)
            .field("escalation", &self.escalation)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl Default for PhaseGate {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl PhaseGate {
    pub fn new(config: &Config) -> Self {
        Self {
            calculator: LScoreCalculator::new(&config.lscore),
            escalation: EscalationPolicy::new(&config.escalation),
            validator: None,
        }
    }

    /// Set the verdict validator.
    pub fn with_validator(mut self, validator: Arc<dyn VerdictValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    pub fn escalation(&self) -> &EscalationPolicy {
        &self.escalation
    }

    pub fn calculate_phase_lscore(&self, phase: Phase, result: &PhaseExecutionResult) -> LScoreBreakdown {
        self.calculator.calculate(phase, result)
    }

    /// Validate one phase attempt.
    ///
    /// An unknown phase number is rejected before anything runs. Returns
    /// `Ok(None)` when no validator is configured.
    pub async fn validate_phase(
        &self,
        phase_number: u8,
        result: &PhaseExecutionResult,
        retry_count: u32,
    ) -> DomainResult<Option<PhaseValidation>> {
        let phase = Phase::from_number(phase_number)?;
        Ok(self
            .validate(phase, result, retry_count, InvestigationTier::Routine)
            .await)
    }

    /// Validate at `retry_count`, never below `tier_floor`.
    async fn validate(
        &self,
        phase: Phase,
        result: &PhaseExecutionResult,
        retry_count: u32,
        tier_floor: InvestigationTier,
    ) -> Option<PhaseValidation> {
        let validator = self.validator.as_ref()?;

        let lscore = self.calculate_phase_lscore(phase, result);
        let meets_threshold = meets_phase_threshold(phase, &lscore);
        let policy_tier = self.escalation.tier_for(retry_count).max(tier_floor);

        let context = ValidationContext {
            remediation_attempts: retry_count,
            min_tier: policy_tier,
            subject: result.subject.clone(),
            evidence: result.evidence.clone(),
            adversarial_findings: result.adversarial_findings.clone(),
        };

        let outcome = match validator
            .validate_phase(phase, &lscore, &context, retry_count)
            .await
        {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    phase = phase.number(),
                    retry_count,
                    error = %err,
                    "Verdict validator failed; treating phase as GUILTY"
                );
                degraded_outcome(&err)
            }
        };

        let tier = outcome
            .investigation_tier
            .map_or(policy_tier, |t| t.max(policy_tier));
        let verdict = outcome.verdict();

        match verdict {
            Verdict::Innocent => info!(
                phase = phase.number(),
                composite = lscore.composite(),
                tier = tier.as_str(),
                "Phase validation INNOCENT"
            ),
            Verdict::Guilty => warn!(
                phase = phase.number(),
                composite = lscore.composite(),
                tier = tier.as_str(),
                remediations = outcome.remediations.len(),
                "Phase validation GUILTY"
            ),
        }

        Some(PhaseValidation {
            phase,
            lscore,
            meets_threshold,
            verdict,
            investigation_tier: tier,
            retry_count,
            remediations: outcome.remediations,
            case_file: outcome.case_file,
            report: outcome.report,
        })
    }

    /// Drive a phase attempt through one validation round.
    ///
    /// Starts the sequence or retries after a GUILTY verdict, validates at
    /// the attempt's retry count, and records the outcome on the attempt.
    pub async fn advance(
        &self,
        attempt: &mut PhaseAttempt,
        result: &PhaseExecutionResult,
    ) -> DomainResult<Option<PhaseValidation>> {
        match attempt.state() {
            GateState::NotStarted => attempt.begin(self.escalation.tier_for(0))?,
            GateState::RemediationRequired => {
                let next = attempt.retry_count() + 1;
                attempt.retry(self.escalation.tier_for(next))?;
            }
            // A previous round was abandoned mid-validation; validate again.
            GateState::Validating => {}
            GateState::Passed => {
                return Err(DomainError::InvalidStateTransition {
                    from: GateState::Passed.as_str().to_string(),
                    to: GateState::Validating.as_str().to_string(),
                    reason: format!("{} already passed its gate", attempt.phase()),
                })
            }
        }

        let validation = self
            .validate(attempt.phase(), result, attempt.retry_count(), attempt.tier())
            .await;

        match &validation {
            Some(v) => attempt.record_verdict(v.verdict, v.investigation_tier)?,
            None => attempt.pass_ungated()?,
        }

        Ok(validation)
    }
}

fn degraded_outcome(err: &DomainError) -> ValidationOutcome {
    ValidationOutcome::guilty(vec![format!(
        "Verdict could not be obtained ({err}); restore the validator and re-run the investigation"
    )])
    .with_tier(InvestigationTier::Routine)
}
