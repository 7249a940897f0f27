//! Case file domain model.
//!
//! A case file is the immutable record of one completed investigation:
//! what evidence was examined, how each verification check came out, what
//! the adversarial reviewers said, the verdict, and the remediations the
//! verdict requires. A retry never edits a case file; it produces a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use super::verification::{EvidenceItem, VerificationCheckResult};

/// Binary outcome of an investigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Guilty,
    Innocent,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guilty => "GUILTY",
            Self::Innocent => "INNOCENT",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GUILTY" => Some(Self::Guilty),
            "INNOCENT" => Some(Self::Innocent),
            _ => None,
        }
    }

    /// Whether the phase may advance.
    pub fn can_proceed(&self) -> bool {
        matches!(self, Self::Innocent)
    }
}

/// How strongly the evidence supports the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Confidence from the distance between an observed value and the
    /// decision boundary it was compared against.
    pub fn from_margin(margin: f64) -> Self {
        let margin = margin.abs();
        if margin >= 0.15 {
            Self::High
        } else if margin >= 0.05 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Rigor applied to an investigation. Escalates with repeated retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationTier {
    #[default]
    Routine,
    Elevated,
    Deep,
}

impl InvestigationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Routine => "routine",
            Self::Elevated => "elevated",
            Self::Deep => "deep",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "routine" => Some(Self::Routine),
            "elevated" => Some(Self::Elevated),
            "deep" => Some(Self::Deep),
            _ => None,
        }
    }

    /// The next tier up, saturating at [`InvestigationTier::Deep`].
    pub fn escalate(&self) -> Self {
        match self {
            Self::Routine => Self::Elevated,
            Self::Elevated | Self::Deep => Self::Deep,
        }
    }
}

/// An independent critique from one adversarial reviewer persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarialFinding {
    pub persona: String,
    pub findings: String,
}

impl AdversarialFinding {
    pub fn new(persona: impl Into<String>, findings: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            findings: findings.into(),
        }
    }
}

/// One event in an investigation's chain of custody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyEvent {
    pub label: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only, occurrence-ordered log of investigation events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainOfCustody {
    events: Vec<CustodyEvent>,
}

impl ChainOfCustody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Existing events are never touched.
    pub fn record(&mut self, label: impl Into<String>, timestamp: DateTime<Utc>) {
        self.events.push(CustodyEvent {
            label: label.into(),
            timestamp,
        });
    }

    /// Builder-style [`record`](Self::record).
    pub fn with_event(mut self, label: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        self.record(label, timestamp);
        self
    }

    pub fn events(&self) -> &[CustodyEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Immutable record of one completed investigation.
///
/// Only [`CaseFileBuilder`](crate::services::CaseFileBuilder) constructs
/// case files; every field is read through an accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFile {
    case_id: String,
    phase: Phase,
    subject: String,
    tier: InvestigationTier,
    verdict: Verdict,
    confidence: Confidence,
    evidence: Vec<EvidenceItem>,
    verification_results: Vec<VerificationCheckResult>,
    adversarial_findings: Vec<AdversarialFinding>,
    chain_of_custody: ChainOfCustody,
    remediations: Vec<String>,
    investigator: String,
    timestamp: DateTime<Utc>,
}

impl CaseFile {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        case_id: String,
        phase: Phase,
        subject: String,
        tier: InvestigationTier,
        verdict: Verdict,
        confidence: Confidence,
        evidence: Vec<EvidenceItem>,
        verification_results: Vec<VerificationCheckResult>,
        adversarial_findings: Vec<AdversarialFinding>,
        chain_of_custody: ChainOfCustody,
        remediations: Vec<String>,
        investigator: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            case_id,
            phase,
            subject,
            tier,
            verdict,
            confidence,
            evidence,
            verification_results,
            adversarial_findings,
            chain_of_custody,
            remediations,
            investigator,
            timestamp,
        }
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn tier(&self) -> InvestigationTier {
        self.tier
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn evidence(&self) -> &[EvidenceItem] {
        &self.evidence
    }

    pub fn verification_results(&self) -> &[VerificationCheckResult] {
        &self.verification_results
    }

    pub fn adversarial_findings(&self) -> &[AdversarialFinding] {
        &self.adversarial_findings
    }

    pub fn chain_of_custody(&self) -> &ChainOfCustody {
        &self.chain_of_custody
    }

    pub fn remediations(&self) -> &[String] {
        &self.remediations
    }

    pub fn investigator(&self) -> &str {
        &self.investigator
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering_and_escalation() {
        assert!(InvestigationTier::Routine < InvestigationTier::Elevated);
        assert!(InvestigationTier::Elevated < InvestigationTier::Deep);
        assert_eq!(InvestigationTier::Routine.escalate(), InvestigationTier::Elevated);
        assert_eq!(InvestigationTier::Deep.escalate(), InvestigationTier::Deep);
    }

    #[test]
    fn test_verdict_serializes_uppercase() {
        let json = serde_json::to_string(&Verdict::Guilty).unwrap();
        assert_eq!(json, "\"GUILTY\"");
        assert_eq!(Verdict::parse_str("innocent"), Some(Verdict::Innocent));
        assert!(Verdict::Innocent.can_proceed());
        assert!(!Verdict::Guilty.can_proceed());
    }

    #[test]
    fn test_confidence_from_margin() {
        assert_eq!(Confidence::from_margin(0.2), Confidence::High);
        assert_eq!(Confidence::from_margin(-0.07), Confidence::Medium);
        assert_eq!(Confidence::from_margin(0.01), Confidence::Low);
    }

    #[test]
    fn test_chain_of_custody_append_only_order() {
        let t0 = Utc::now();
        let chain = ChainOfCustody::new()
            .with_event("evidence collected", t0)
            .with_event("verdict rendered", t0);
        let labels: Vec<_> = chain.events().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["evidence collected", "verdict rendered"]);
    }
}
