//! Situational awareness over the in-memory coordination stores.

mod common;

use std::sync::Arc;

use chrono::Duration;
use sherlock::adapters::{InMemoryFileClaimsStore, InMemoryProgressStore};
use sherlock::domain::models::{
    AwarenessConfig, ClaimOperation, FileClaim, OutputSummary, Phase,
};
use sherlock::domain::ports::FileClaimsStore;
use sherlock::services::{SituationalAwarenessBuilder, NO_ACTIVITY_PLACEHOLDER};

fn builder(
    progress: &Arc<InMemoryProgressStore>,
    claims: &Arc<InMemoryFileClaimsStore>,
) -> SituationalAwarenessBuilder {
    SituationalAwarenessBuilder::new(progress.clone(), claims.clone(), AwarenessConfig::default())
}

#[tokio::test]
async fn test_isolated_agent_gets_placeholder() {
    let progress = Arc::new(InMemoryProgressStore::new());
    let claims = Arc::new(InMemoryFileClaimsStore::new());
    progress
        .mark_active("solo", Phase::Understanding, common::reference_time())
        .await;

    let section = builder(&progress, &claims)
        .build_awareness_section_at("solo", Phase::Understanding, common::reference_time())
        .await;
    assert_eq!(section, NO_ACTIVITY_PLACEHOLDER);
    assert!(!section.is_empty());
}

#[tokio::test]
async fn test_shared_file_claim_shows_up_as_do_not_modify() {
    let progress = Arc::new(InMemoryProgressStore::new());
    let claims = Arc::new(InMemoryFileClaimsStore::new());
    let now = common::reference_time();

    claims
        .claim(FileClaim::new("src/foo.ts", "agent-1", ClaimOperation::Write, now))
        .await;
    claims
        .claim(FileClaim::new("src/foo.ts", "agent-2", ClaimOperation::Write, now))
        .await;

    let conflicts = claims.get_conflicts("agent-2").await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].claimed_by, "agent-1");

    let section = builder(&progress, &claims)
        .build_awareness_section_at("agent-2", Phase::Implementation, now)
        .await;
    assert!(section.contains("do not modify"));
    assert!(section.contains("`src/foo.ts` (write claimed by agent-1)"));
}

#[tokio::test]
async fn test_full_coordination_snapshot() {
    let progress = Arc::new(InMemoryProgressStore::new());
    let claims = Arc::new(InMemoryFileClaimsStore::new());
    let now = common::reference_time();

    progress
        .mark_active("architect", Phase::Architecture, now - Duration::minutes(20))
        .await;
    progress
        .mark_completed(
            "architect",
            Phase::Architecture,
            600_000,
            OutputSummary {
                key_findings: vec!["Payments already wrap the gateway client".into()],
                decisions: vec!["Retries live in the gateway adapter".into()],
                files_created: vec!["docs/adr/0007-retries.md".into()],
                files_modified: vec![],
            },
        )
        .await
        .unwrap();
    progress
        .mark_active("reviewer", Phase::Architecture, now - Duration::seconds(42))
        .await;
    progress
        .mark_active("designer", Phase::Architecture, now - Duration::minutes(2))
        .await;
    claims
        .claim(FileClaim::new("src/gateway.rs", "reviewer", ClaimOperation::Write, now))
        .await;

    let section = builder(&progress, &claims)
        .build_awareness_section_at("designer", Phase::Architecture, now)
        .await;

    let expected_order = [
        "## Situational Awareness (Phase 3: architecture)",
        "### Completed Agents",
        "**architect** (finished in 10m 00s)",
        "### Active Agents",
        "**reviewer** (Phase 3: architecture, running for 42s)",
        "### Decisions Already Made",
        "1. Retries live in the gateway adapter (architect)",
        "### File Conflicts (do not modify)",
        "### Coordination Directive",
    ];
    let mut last = 0;
    for needle in expected_order {
        let pos = section[last..]
            .find(needle)
            .unwrap_or_else(|| panic!("missing or out of order: {needle}\n{section}"));
        last += pos;
    }
    assert!(!section.contains("**designer**"));
}

#[tokio::test]
async fn test_reads_stay_consistent_under_concurrent_writers() {
    let progress = Arc::new(InMemoryProgressStore::new());
    let claims = Arc::new(InMemoryFileClaimsStore::new());
    let now = common::reference_time();

    let mut writers = Vec::new();
    for i in 0..16 {
        let progress = progress.clone();
        let claims = claims.clone();
        writers.push(tokio::spawn(async move {
            let key = format!("agent-{i}");
            progress.mark_active(&key, Phase::Testing, now).await;
            claims
                .claim(FileClaim::new(format!("tests/t{i}.rs"), key.clone(), ClaimOperation::Create, now))
                .await;
            progress
                .mark_completed(&key, Phase::Testing, 1_000, OutputSummary::default())
                .await
                .unwrap();
        }));
    }

    let reader = builder(&progress, &claims);
    for _ in 0..16 {
        let section = reader
            .build_awareness_section_at("observer", Phase::Testing, now)
            .await;
        assert!(
            section == NO_ACTIVITY_PLACEHOLDER
                || section.starts_with("## Situational Awareness (Phase 5: testing)")
        );
    }

    for writer in writers {
        writer.await.unwrap();
    }

    let section = reader
        .build_awareness_section_at("observer", Phase::Testing, now)
        .await;
    assert!(section.contains("### Completed Agents"));
    assert!(!section.contains("### Active Agents"));
    assert!(!section.contains("### Coordination Directive"));
    assert!(section.contains("...and 6 more claimed file(s) not shown."));
}
