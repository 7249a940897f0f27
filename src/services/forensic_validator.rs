//! Forensic verdict validator.
//!
//! The built-in [`VerdictValidator`]. For each phase attempt it runs the
//! phase's verification matrix over the supplied evidence, adds adversarial
//! critique proportional to the investigation tier, files a case, and
//! returns the case together with its rendered report.
//!
//! ## Verdict rule
//!
//! A phase is INNOCENT when both hold:
//!
//! 1. the L-Score composite reaches the phase threshold, and
//! 2. the verification pass rate reaches the tier's minimum
//!    (routine 0.66, elevated 0.8, deep 1.0 by default).
//!
//! Anything else is GUILTY. Confidence reflects how far the closer of the
//! two values sits from its boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AdversarialFinding, CaseFile, ChainOfCustody, Config, Confidence, EvidenceStatus,
    InvestigationTier, LScoreBreakdown, Phase, ValidationContext, ValidationOutcome, Verdict,
    VerdictConfig, VerificationCheckResult, VerificationMatrix,
};
use crate::domain::ports::VerdictValidator;
use crate::services::case_file_builder::{render_report, CaseFileBuilder, CaseFileParams};
use crate::services::escalation::EscalationPolicy;
use crate::services::verification_matrix::{pass_rate, VerificationMatrixEngine};

/// Verdict validator backed by the verification matrix engine.
#[derive(Debug, Clone)]
pub struct ForensicValidator {
    engine: VerificationMatrixEngine,
    builder: CaseFileBuilder,
    escalation: EscalationPolicy,
    verdict: VerdictConfig,
    matrices: HashMap<Phase, VerificationMatrix>,
}

impl Default for ForensicValidator {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ForensicValidator {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: VerificationMatrixEngine::with_builtin_routines(),
            builder: CaseFileBuilder::new(config.investigator.clone()),
            escalation: EscalationPolicy::new(&config.escalation),
            verdict: config.verdict.clone(),
            matrices: HashMap::new(),
        }
    }

    /// Use a custom engine (e.g. with externally supplied routines).
    pub fn with_engine(mut self, engine: VerificationMatrixEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the standard matrix of the matrix's phase.
    pub fn with_matrix(mut self, matrix: VerificationMatrix) -> Self {
        self.matrices.insert(matrix.phase(), matrix);
        self
    }

    /// The matrix a phase is investigated with.
    pub fn matrix_for(&self, phase: Phase) -> VerificationMatrix {
        self.matrices
            .get(&phase)
            .cloned()
            .unwrap_or_else(|| VerificationMatrix::standard(phase))
    }

    fn min_pass_rate(&self, tier: InvestigationTier) -> f64 {
        match tier {
            InvestigationTier::Routine => self.verdict.routine_min_pass_rate,
            InvestigationTier::Elevated => self.verdict.elevated_min_pass_rate,
            InvestigationTier::Deep => self.verdict.deep_min_pass_rate,
        }
    }

    /// Run a full investigation and file the case at `now`.
    pub fn investigate(
        &self,
        phase: Phase,
        lscore: &LScoreBreakdown,
        context: &ValidationContext,
        retry_count: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<CaseFile> {
        let tier = self.escalation.tier_for(retry_count).max(context.min_tier);
        let threshold = phase.threshold();
        let mut chain = ChainOfCustody::new();

        chain.record(
            format!("Evidence received: {} item(s)", context.evidence.len()),
            now,
        );
        chain.record(
            format!(
                "L-Score computed: composite {:.3} against threshold {:.2}",
                lscore.composite(),
                threshold
            ),
            now,
        );

        let matrix = self.matrix_for(phase);
        let results = self.engine.run_matrix(&matrix, &context.evidence, Some(lscore));
        let rate = pass_rate(&results);
        chain.record(
            format!(
                "Verification matrix executed: {} of {} checks passed",
                results.iter().filter(|r| r.passed).count(),
                results.len()
            ),
            now,
        );

        let mut findings = context.adversarial_findings.clone();
        findings.extend(tier_findings(tier, retry_count, lscore, &results, context));
        chain.record(
            format!(
                "Adversarial review at {} tier: {} finding(s)",
                tier.as_str(),
                findings.len()
            ),
            now,
        );

        let min_rate = self.min_pass_rate(tier);
        let score_margin = lscore.composite() - threshold;
        let rate_margin = rate - min_rate;
        let verdict = if score_margin >= 0.0 && rate_margin >= 0.0 {
            Verdict::Innocent
        } else {
            Verdict::Guilty
        };
        let confidence = Confidence::from_margin(score_margin.abs().min(rate_margin.abs()));

        let remediations = match verdict {
            Verdict::Innocent => Vec::new(),
            Verdict::Guilty => remediations_for(phase, lscore, &results, rate, min_rate),
        };
        chain.record(format!("Verdict rendered: {}", verdict.as_str()), now);

        info!(
            phase = phase.number(),
            tier = tier.as_str(),
            pass_rate = rate,
            composite = lscore.composite(),
            verdict = verdict.as_str(),
            "Investigation complete"
        );

        self.builder.build(
            CaseFileParams {
                phase,
                subject: context.subject.clone(),
                tier,
                verdict,
                confidence,
                evidence: context.evidence.clone(),
                verification_results: results,
                adversarial_findings: findings,
                chain_of_custody: chain,
                remediations,
            },
            now,
        )
    }
}

/// Critique generated by the investigator itself at elevated and deep tiers.
fn tier_findings(
    tier: InvestigationTier,
    retry_count: u32,
    lscore: &LScoreBreakdown,
    results: &[VerificationCheckResult],
    context: &ValidationContext,
) -> Vec<AdversarialFinding> {
    let mut findings = Vec::new();
    if tier >= InvestigationTier::Elevated {
        let failed = results.iter().filter(|r| !r.passed).count();
        let (component, value) = lscore.weakest();
        findings.push(AdversarialFinding::new(
            "skeptic",
            format!(
                "After {} remediation attempt(s), {} of {} checks still fail; weakest L-Score component is {} at {:.2}",
                retry_count,
                failed,
                results.len(),
                component.as_str(),
                value
            ),
        ));
    }
    if tier == InvestigationTier::Deep {
        let count = |status: EvidenceStatus| {
            context
                .evidence
                .iter()
                .filter(|e| e.status == status)
                .count()
        };
        findings.push(AdversarialFinding::new(
            "auditor",
            format!(
                "Deep audit: {} missing, {} inconclusive and {} contradicted evidence item(s); every check must pass at this tier",
                count(EvidenceStatus::Missing),
                count(EvidenceStatus::Inconclusive),
                count(EvidenceStatus::Contradicted)
            ),
        ));
    }
    findings
}

fn remediations_for(
    phase: Phase,
    lscore: &LScoreBreakdown,
    results: &[VerificationCheckResult],
    rate: f64,
    min_rate: f64,
) -> Vec<String> {
    let mut remediations: Vec<String> = results
        .iter()
        .filter(|r| !r.passed)
        .map(|r| {
            format!(
                "Resolve failed check '{}' ({}): observed {:.2}, required {:.2}",
                r.check, r.method, r.actual, r.expected
            )
        })
        .collect();

    if lscore.composite() < phase.threshold() {
        let (component, value) = lscore.weakest();
        remediations.push(format!(
            "Raise the L-Score composite from {:.3} to at least {:.2}; weakest component is {} at {:.2}",
            lscore.composite(),
            phase.threshold(),
            component.as_str(),
            value
        ));
    }

    if remediations.is_empty() {
        // Only reachable with an empty matrix or a pass-rate floor above 1.0.
        remediations.push(format!(
            "Supply verification evidence: pass rate {rate:.2} is below the required {min_rate:.2}"
        ));
    }

    remediations
}

#[async_trait]
impl VerdictValidator for ForensicValidator {
    async fn validate_phase(
        &self,
        phase: Phase,
        lscore: &LScoreBreakdown,
        context: &ValidationContext,
        retry_count: u32,
    ) -> DomainResult<ValidationOutcome> {
        let case = self.investigate(phase, lscore, context, retry_count, Utc::now())?;
        let report = render_report(&case);
        Ok(ValidationOutcome {
            can_proceed: case.verdict().can_proceed(),
            investigation_tier: Some(case.tier()),
            remediations: case.remediations().to_vec(),
            report: Some(report),
            case_file: Some(case),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{EvidenceItem, LScoreComponents, MatrixEntry};

    fn strong_evidence() -> Vec<EvidenceItem> {
        vec![
            EvidenceItem::new("compile log", EvidenceStatus::Present),
            EvidenceItem::new("stub scan", EvidenceStatus::Present).with_notes("no markers"),
            EvidenceItem::new("lint report", EvidenceStatus::Present),
        ]
    }

    fn context(evidence: Vec<EvidenceItem>, attempts: u32) -> ValidationContext {
        ValidationContext {
            remediation_attempts: attempts,
            min_tier: InvestigationTier::Routine,
            subject: "checkout service".into(),
            evidence,
            adversarial_findings: vec![],
        }
    }

    #[test]
    fn test_strong_phase_is_innocent() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.95));
        let case = validator
            .investigate(Phase::Implementation, &lscore, &context(strong_evidence(), 0), 0, Utc::now())
            .unwrap();
        assert_eq!(case.verdict(), Verdict::Innocent);
        assert!(case.remediations().is_empty());
        assert_eq!(case.tier(), InvestigationTier::Routine);
        assert_eq!(case.verification_results().len(), 3);
        assert_eq!(case.chain_of_custody().len(), 5);
    }

    #[test]
    fn test_low_score_is_guilty_with_remediation() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.5));
        let case = validator
            .investigate(Phase::Implementation, &lscore, &context(strong_evidence(), 0), 0, Utc::now())
            .unwrap();
        assert_eq!(case.verdict(), Verdict::Guilty);
        assert!(case
            .remediations()
            .iter()
            .any(|r| r.contains("Raise the L-Score composite")));
    }

    #[test]
    fn test_empty_evidence_is_guilty() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(1.0));
        let case = validator
            .investigate(Phase::Testing, &lscore, &context(vec![], 0), 0, Utc::now())
            .unwrap();
        assert_eq!(case.verdict(), Verdict::Guilty);
        assert!(case.verification_results().iter().all(|r| !r.passed));
        assert_eq!(case.remediations().len(), 3);
    }

    #[test]
    fn test_tier_findings_added_on_escalation() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.95));
        let elevated = validator
            .investigate(Phase::Implementation, &lscore, &context(strong_evidence(), 1), 1, Utc::now())
            .unwrap();
        let personas: Vec<_> = elevated
            .adversarial_findings()
            .iter()
            .map(|f| f.persona.as_str())
            .collect();
        assert_eq!(personas, vec!["skeptic"]);

        let deep = validator
            .investigate(Phase::Implementation, &lscore, &context(strong_evidence(), 2), 2, Utc::now())
            .unwrap();
        assert_eq!(deep.tier(), InvestigationTier::Deep);
        assert_eq!(deep.adversarial_findings().len(), 2);
    }

    #[test]
    fn test_min_tier_floor_overrides_retry_count() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.95));
        let mut floored = context(strong_evidence(), 0);
        floored.min_tier = InvestigationTier::Deep;

        let case = validator
            .investigate(Phase::Implementation, &lscore, &floored, 0, Utc::now())
            .unwrap();
        assert_eq!(case.tier(), InvestigationTier::Deep);
        assert!(case
            .adversarial_findings()
            .iter()
            .any(|f| f.persona == "auditor"));
    }

    #[tokio::test]
    async fn test_back_to_back_investigations_get_distinct_case_ids() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.6));
        let ctx = context(strong_evidence(), 0);

        let mut ids = std::collections::HashSet::new();
        for _ in 0..50 {
            let outcome = validator
                .validate_phase(Phase::Testing, &lscore, &ctx, 0)
                .await
                .unwrap();
            ids.insert(outcome.case_file.unwrap().case_id().to_string());
        }
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_result_count_matches_custom_matrix() {
        let matrix = VerificationMatrix::define(
            Phase::Delivery,
            vec![
                MatrixEntry::new("Release notes", "Release checklist", 0.5),
                MatrixEntry::new("Sign-off", "Stakeholder approval", 0.5),
            ],
        );
        let validator = ForensicValidator::default().with_matrix(matrix);
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.99));
        let case = validator
            .investigate(
                Phase::Delivery,
                &lscore,
                &context(vec![EvidenceItem::new("release checklist", EvidenceStatus::Present)], 0),
                0,
                Utc::now(),
            )
            .unwrap();
        assert_eq!(case.verification_results().len(), 2);
        assert_eq!(case.verdict(), Verdict::Innocent);
    }

    #[tokio::test]
    async fn test_outcome_includes_case_and_report() {
        let validator = ForensicValidator::default();
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.4));
        let outcome = validator
            .validate_phase(Phase::Exploration, &lscore, &context(vec![], 0), 0)
            .await
            .unwrap();
        assert!(!outcome.can_proceed);
        assert_eq!(outcome.investigation_tier, Some(InvestigationTier::Routine));
        let case = outcome.case_file.unwrap();
        assert_eq!(outcome.remediations, case.remediations());
        assert!(outcome.report.unwrap().contains(case.case_id()));
    }
}
