//! Case File Builder.
//!
//! Assembles investigation outputs into an immutable [`CaseFile`] and
//! renders it as a markdown-like report for agent prompts and audit logs.
//!
//! The report is loss-free: every evidence item, verification result,
//! chain-of-custody event and remediation appears exactly once, in input
//! order. Table cells escape `|` and flatten line breaks so rows stay intact.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AdversarialFinding, CaseFile, ChainOfCustody, Confidence, EvidenceItem, InvestigationTier,
    Phase, Verdict, VerificationCheckResult,
};
use crate::services::verification_matrix::pass_rate;

/// Everything an investigation produced, ready to be filed.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseFileParams {
    pub phase: Phase,
    pub subject: String,
    pub tier: InvestigationTier,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub evidence: Vec<EvidenceItem>,
    pub verification_results: Vec<VerificationCheckResult>,
    pub adversarial_findings: Vec<AdversarialFinding>,
    pub chain_of_custody: ChainOfCustody,
    pub remediations: Vec<String>,
}

/// Builds case files signed by one investigator.
#[derive(Debug, Clone)]
pub struct CaseFileBuilder {
    investigator: String,
}

impl Default for CaseFileBuilder {
    fn default() -> Self {
        Self::new("sherlock")
    }
}

impl CaseFileBuilder {
    pub fn new(investigator: impl Into<String>) -> Self {
        Self {
            investigator: investigator.into(),
        }
    }

    pub fn investigator(&self) -> &str {
        &self.investigator
    }

    /// Fresh case identifier for a phase investigated at `timestamp`.
    ///
    /// `CASE-P{n}-{stamp}-{suffix}`: every non-alphanumeric character of the
    /// millisecond RFC 3339 timestamp becomes `-`, and the random v4 suffix
    /// keeps ids distinct for runs filed within the same millisecond.
    pub fn case_id(phase: Phase, timestamp: DateTime<Utc>) -> String {
        let stamp: String = timestamp
            .to_rfc3339_opts(SecondsFormat::Millis, true)
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        format!("CASE-P{}-{}-{}", phase.number(), stamp, Uuid::new_v4().simple())
    }

    /// File a case. A GUILTY verdict must carry at least one remediation.
    pub fn build(&self, params: CaseFileParams, timestamp: DateTime<Utc>) -> DomainResult<CaseFile> {
        if params.verdict == Verdict::Guilty && params.remediations.is_empty() {
            return Err(DomainError::MissingRemediation {
                phase: params.phase.number(),
            });
        }

        let case_id = Self::case_id(params.phase, timestamp);
        debug!(
            case_id = %case_id,
            verdict = params.verdict.as_str(),
            checks = params.verification_results.len(),
            "Case file built"
        );

        Ok(CaseFile::new(
            case_id,
            params.phase,
            params.subject,
            params.tier,
            params.verdict,
            params.confidence,
            params.evidence,
            params.verification_results,
            params.adversarial_findings,
            params.chain_of_custody,
            params.remediations,
            self.investigator.clone(),
            timestamp,
        ))
    }
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn timestamp_str(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a case file as a human-readable report.
pub fn render_report(case: &CaseFile) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Case File {}\n\n", case.case_id()));
    out.push_str(&format!("- **Phase:** {}\n", case.phase()));
    let subject = if case.subject().is_empty() {
        "(unspecified)"
    } else {
        case.subject()
    };
    out.push_str(&format!("- **Subject:** {subject}\n"));
    out.push_str(&format!("- **Investigation tier:** {}\n", case.tier().as_str()));
    out.push_str(&format!("- **Verdict:** {}\n", case.verdict().as_str()));
    out.push_str(&format!("- **Confidence:** {}\n", case.confidence().as_str()));
    out.push_str(&format!("- **Opened:** {}\n\n", timestamp_str(case.timestamp())));

    out.push_str("## Evidence\n\n");
    if case.evidence().is_empty() {
        out.push_str("_No evidence collected._\n");
    } else {
        out.push_str("| # | Source | Status | Notes |\n");
        out.push_str("|---|--------|--------|-------|\n");
        for (i, item) in case.evidence().iter().enumerate() {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                i + 1,
                cell(&item.source),
                item.status.as_str(),
                cell(&item.notes)
            ));
        }
    }
    out.push('\n');

    out.push_str("## Verification Matrix\n\n");
    let results = case.verification_results();
    if results.is_empty() {
        out.push_str("_No verification checks were run._\n");
    } else {
        out.push_str("| Check | Method | Expected | Actual | Verdict |\n");
        out.push_str("|-------|--------|----------|--------|---------|\n");
        for result in results {
            out.push_str(&format!(
                "| {} | {} | {:.3} | {:.3} | {} |\n",
                cell(&result.check),
                cell(&result.method),
                result.expected,
                result.actual,
                if result.passed { "PASS" } else { "FAIL" }
            ));
        }
        let passed = results.iter().filter(|r| r.passed).count();
        out.push_str(&format!(
            "\nPassed {} of {} checks ({:.1}%).\n",
            passed,
            results.len(),
            pass_rate(results) * 100.0
        ));
    }
    out.push('\n');

    out.push_str("## Adversarial Analysis\n\n");
    if case.adversarial_findings().is_empty() {
        out.push_str("_No adversarial findings._\n");
    } else {
        for finding in case.adversarial_findings() {
            out.push_str(&format!("- **{}:** {}\n", finding.persona, finding.findings));
        }
    }
    out.push('\n');

    out.push_str("## Chain of Custody\n\n");
    if case.chain_of_custody().is_empty() {
        out.push_str("_No custody events recorded._\n");
    } else {
        for (i, event) in case.chain_of_custody().events().iter().enumerate() {
            out.push_str(&format!(
                "{}. [{}] {}\n",
                i + 1,
                timestamp_str(event.timestamp),
                event.label
            ));
        }
    }
    out.push('\n');

    if !case.remediations().is_empty() {
        out.push_str("## Required Remediations\n\n");
        for (i, remediation) in case.remediations().iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, remediation));
        }
        out.push('\n');
    }

    out.push_str("## Sign-off\n\n");
    out.push_str(&format!("Investigator: {}\n", case.investigator()));
    out.push_str(&format!("Confidence: {}\n", case.confidence().as_str()));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EvidenceStatus;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_790_000_000 + secs, 0).unwrap()
    }

    fn params(verdict: Verdict, remediations: Vec<String>) -> CaseFileParams {
        CaseFileParams {
            phase: Phase::Implementation,
            subject: "payment retries".to_string(),
            tier: InvestigationTier::Elevated,
            verdict,
            confidence: Confidence::Medium,
            evidence: vec![
                EvidenceItem::new("build-log-alpha", EvidenceStatus::Present).with_notes("clean | green"),
                EvidenceItem::new("lint-report-beta", EvidenceStatus::Missing),
            ],
            verification_results: vec![
                VerificationCheckResult {
                    check: "check-gamma".into(),
                    method: "Compile workspace".into(),
                    expected: 0.9,
                    actual: 1.0,
                    passed: true,
                },
                VerificationCheckResult {
                    check: "check-delta".into(),
                    method: "Lint quality gate".into(),
                    expected: 0.75,
                    actual: 0.0,
                    passed: false,
                },
            ],
            adversarial_findings: vec![AdversarialFinding::new("skeptic", "lint never ran")],
            chain_of_custody: ChainOfCustody::new()
                .with_event("custody-one", at(0))
                .with_event("custody-two", at(1)),
            remediations,
        }
    }

    #[test]
    fn test_case_id_normalizes_separators() {
        let id = CaseFileBuilder::case_id(Phase::Testing, at(0));
        assert!(id.starts_with("CASE-P5-"));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }

    #[test]
    fn test_case_ids_unique_within_same_instant() {
        let builder = CaseFileBuilder::default();
        let ids: HashSet<String> = (0..200)
            .map(|_| {
                builder
                    .build(params(Verdict::Innocent, vec![]), at(0))
                    .unwrap()
                    .case_id()
                    .to_string()
            })
            .collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.iter().all(|id| id.starts_with("CASE-P4-")));
    }

    #[test]
    fn test_guilty_without_remediation_rejected() {
        let builder = CaseFileBuilder::default();
        let err = builder.build(params(Verdict::Guilty, vec![]), at(0)).unwrap_err();
        assert!(matches!(err, DomainError::MissingRemediation { phase: 4 }));
    }

    #[test]
    fn test_innocent_without_remediation_allowed() {
        let builder = CaseFileBuilder::default();
        let case = builder.build(params(Verdict::Innocent, vec![]), at(0)).unwrap();
        assert_eq!(case.verdict(), Verdict::Innocent);
        assert!(!render_report(&case).contains("Required Remediations"));
    }

    #[test]
    fn test_build_is_idempotent_in_content() {
        let builder = CaseFileBuilder::new("inspector-7");
        let p = params(Verdict::Guilty, vec!["Run the linter".into()]);
        let a = builder.build(p.clone(), at(0)).unwrap();
        let b = builder.build(p, at(5)).unwrap();

        assert_ne!(a.case_id(), b.case_id());
        assert_ne!(a.timestamp(), b.timestamp());
        assert_eq!(a.phase(), b.phase());
        assert_eq!(a.subject(), b.subject());
        assert_eq!(a.tier(), b.tier());
        assert_eq!(a.verdict(), b.verdict());
        assert_eq!(a.confidence(), b.confidence());
        assert_eq!(a.evidence(), b.evidence());
        assert_eq!(a.verification_results(), b.verification_results());
        assert_eq!(a.adversarial_findings(), b.adversarial_findings());
        assert_eq!(a.chain_of_custody(), b.chain_of_custody());
        assert_eq!(a.remediations(), b.remediations());
        assert_eq!(a.investigator(), b.investigator());
    }

    #[test]
    fn test_report_is_loss_free_and_ordered() {
        let builder = CaseFileBuilder::new("inspector-7");
        let case = builder
            .build(
                params(Verdict::Guilty, vec!["fix-epsilon".into(), "fix-zeta".into()]),
                at(0),
            )
            .unwrap();
        let report = render_report(&case);

        let tokens = [
            "build-log-alpha",
            "lint-report-beta",
            "check-gamma",
            "check-delta",
            "custody-one",
            "custody-two",
            "fix-epsilon",
            "fix-zeta",
        ];
        let mut last = 0;
        for token in tokens {
            assert_eq!(report.matches(token).count(), 1, "{token} should appear once");
            let pos = report.find(token).unwrap();
            assert!(pos > last, "{token} out of order");
            last = pos;
        }

        assert!(report.contains("clean \\| green"));
        assert!(report.contains("| check-delta | Lint quality gate | 0.750 | 0.000 | FAIL |"));
        assert!(report.contains("1. fix-epsilon"));
        assert!(report.contains("Investigator: inspector-7"));
        assert!(report.contains("Confidence: medium"));
    }
}
