//! Common test utilities for integration tests
//!
//! Shared fixtures for phase execution results, evidence sets and
//! coordination records.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use sherlock::domain::models::{
    EvidenceItem, EvidenceStatus, LScoreComponent, PhaseExecutionResult,
};

/// Fixed reference instant so elapsed-time output is deterministic.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Implementation-phase evidence where every standard check holds.
pub fn clean_implementation_evidence() -> Vec<EvidenceItem> {
    vec![
        EvidenceItem::new("compile log", EvidenceStatus::Present).with_notes("0 errors, 0 warnings"),
        EvidenceItem::new("stub scan", EvidenceStatus::Present).with_notes("no markers found"),
        EvidenceItem::new("lint report", EvidenceStatus::Present),
    ]
}

/// Implementation-phase evidence with a broken build and leftover stubs.
pub fn broken_implementation_evidence() -> Vec<EvidenceItem> {
    vec![
        EvidenceItem::new("compile log", EvidenceStatus::Contradicted)
            .with_notes("3 type errors in payments module"),
        EvidenceItem::new("stub scan", EvidenceStatus::Present)
            .with_notes("TODO left in refund handler"),
        EvidenceItem::new("lint report", EvidenceStatus::Inconclusive),
    ]
}

/// A fully successful, tooling-backed implementation run.
pub fn strong_implementation_result() -> PhaseExecutionResult {
    PhaseExecutionResult::new(true)
        .with_agents(4, 0)
        .with_duration_ms(45_000)
        .with_subject("payment retries")
        .with_evidence(clean_implementation_evidence())
        .with_measurement(LScoreComponent::Maintainability, 0.9)
        .with_measurement(LScoreComponent::Security, 0.95)
        .with_measurement(LScoreComponent::TestCoverage, 0.9)
}

/// A failing implementation run.
pub fn weak_implementation_result() -> PhaseExecutionResult {
    PhaseExecutionResult::new(false)
        .with_agents(1, 3)
        .with_duration_ms(1_200_000)
        .with_subject("payment retries")
        .with_evidence(broken_implementation_evidence())
}

/// Testing-phase evidence carrying test counts.
pub fn test_run_evidence(passed: u64, total: u64) -> Vec<EvidenceItem> {
    vec![
        EvidenceItem::new("test results", EvidenceStatus::Present)
            .with_payload(json!({ "passed": passed, "total": total })),
        EvidenceItem::new("coverage report", EvidenceStatus::Present),
        EvidenceItem::new("regression suite", EvidenceStatus::Present),
    ]
}
