//! Situational Awareness Builder.
//!
//! Produces the coordination snapshot injected into an agent's prompt:
//! which peers finished and what they found, who is still running, which
//! decisions are already made, and which files belong to someone else.
//! It only reads the progress and file-claims stores; conflicting claims are
//! reported, never resolved.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::domain::models::{AgentProgress, AgentStatus, AwarenessConfig, FileClaim, Phase};
use crate::domain::ports::{FileClaimsStore, ProgressStore};

/// Returned when no subsection has anything to say.
pub const NO_ACTIVITY_PLACEHOLDER: &str = "No other agent activity to report for this phase.";

/// Builds per-agent coordination summaries from the shared stores.
#[derive(Clone)]
pub struct SituationalAwarenessBuilder {
    progress: Arc<dyn ProgressStore>,
    claims: Arc<dyn FileClaimsStore>,
    config: AwarenessConfig,
}

impl std::fmt::Debug for SituationalAwarenessBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SituationalAwarenessBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SituationalAwarenessBuilder {
    pub fn new(
        progress: Arc<dyn ProgressStore>,
        claims: Arc<dyn FileClaimsStore>,
        config: AwarenessConfig,
    ) -> Self {
        Self {
            progress,
            claims,
            config,
        }
    }

    /// Awareness section for `agent_key` working in `phase`, as of now.
    pub async fn build_awareness_section(&self, agent_key: &str, phase: Phase) -> String {
        self.build_awareness_section_at(agent_key, phase, Utc::now()).await
    }

    /// Awareness section with elapsed times measured against `now`.
    pub async fn build_awareness_section_at(
        &self,
        agent_key: &str,
        phase: Phase,
        now: DateTime<Utc>,
    ) -> String {
        let phase_records = match self.progress.get_by_phase(phase).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, phase = phase.number(), "Failed to read phase progress");
                Vec::new()
            }
        };
        let active = match self.progress.get_active(agent_key).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, agent_key, "Failed to read active agents");
                Vec::new()
            }
        };
        let conflicts = match self.claims.get_conflicts(agent_key).await {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, agent_key, "Failed to read file claims");
                Vec::new()
            }
        };

        let completed: Vec<&AgentProgress> = phase_records
            .iter()
            .filter(|p| p.status == AgentStatus::Completed && p.agent_key != agent_key)
            .collect();

        let sections: Vec<String> = [
            self.completed_section(&completed),
            active_section(&active, now),
            self.decisions_section(&completed),
            self.conflicts_section(&conflicts),
            directive_section(&active),
        ]
        .into_iter()
        .flatten()
        .collect();

        debug!(
            agent_key,
            phase = phase.number(),
            completed = completed.len(),
            active = active.len(),
            conflicts = conflicts.len(),
            "Built awareness section"
        );

        if sections.is_empty() {
            return NO_ACTIVITY_PLACEHOLDER.to_string();
        }

        let mut out = format!("## Situational Awareness ({phase})\n\n");
        out.push_str(&sections.join("\n"));
        out
    }

    fn completed_section(&self, completed: &[&AgentProgress]) -> Option<String> {
        if completed.is_empty() {
            return None;
        }
        let limit = self.config.max_preview_chars;
        let mut out = String::from("### Completed Agents\n");
        for peer in completed {
            match peer.duration_ms {
                Some(ms) => out.push_str(&format!(
                    "- **{}** (finished in {})\n",
                    peer.agent_key,
                    format_ms(ms)
                )),
                None => out.push_str(&format!("- **{}**\n", peer.agent_key)),
            }
            let Some(output) = &peer.output else {
                continue;
            };
            for finding in &output.key_findings {
                out.push_str(&format!("  - Finding: {}\n", truncate(finding, limit)));
            }
            for decision in &output.decisions {
                out.push_str(&format!("  - Decision: {}\n", truncate(decision, limit)));
            }
            let files: Vec<&String> = output.touched_files().collect();
            if !files.is_empty() {
                let shown: Vec<&str> = files
                    .iter()
                    .take(self.config.max_files_preview)
                    .map(|f| f.as_str())
                    .collect();
                let extra = files.len().saturating_sub(shown.len());
                if extra > 0 {
                    out.push_str(&format!("  - Files: {} (+{} more)\n", shown.join(", "), extra));
                } else {
                    out.push_str(&format!("  - Files: {}\n", shown.join(", ")));
                }
            }
        }
        Some(out)
    }

    fn decisions_section(&self, completed: &[&AgentProgress]) -> Option<String> {
        let decisions: Vec<(&str, &String)> = completed
            .iter()
            .filter_map(|p| p.output.as_ref().map(|o| (p.agent_key.as_str(), o)))
            .flat_map(|(key, o)| o.decisions.iter().map(move |d| (key, d)))
            .collect();
        if decisions.is_empty() {
            return None;
        }
        let mut out = String::from("### Decisions Already Made\n");
        for (i, (key, decision)) in decisions.iter().take(self.config.max_decisions).enumerate() {
            out.push_str(&format!(
                "{}. {} ({})\n",
                i + 1,
                truncate(decision, self.config.max_preview_chars),
                key
            ));
        }
        let extra = decisions.len().saturating_sub(self.config.max_decisions);
        if extra > 0 {
            out.push_str(&format!("_...and {extra} more decision(s) not shown._\n"));
        }
        Some(out)
    }

    fn conflicts_section(&self, conflicts: &[FileClaim]) -> Option<String> {
        if conflicts.is_empty() {
            return None;
        }
        let mut out = String::from("### File Conflicts (do not modify)\n");
        for claim in conflicts.iter().take(self.config.max_conflicts) {
            out.push_str(&format!(
                "- `{}` ({} claimed by {})\n",
                claim.path,
                claim.operation.as_str(),
                claim.claimed_by
            ));
        }
        let extra = conflicts.len().saturating_sub(self.config.max_conflicts);
        if extra > 0 {
            out.push_str(&format!("_...and {extra} more claimed file(s) not shown._\n"));
        }
        Some(out)
    }
}

fn active_section(active: &[AgentProgress], now: DateTime<Utc>) -> Option<String> {
    if active.is_empty() {
        return None;
    }
    let mut out = String::from("### Active Agents\n");
    for peer in active {
        let elapsed = (now - peer.started_at).num_milliseconds().max(0);
        out.push_str(&format!(
            "- **{}** ({}, running for {})\n",
            peer.agent_key,
            peer.phase,
            format_ms(u64::try_from(elapsed).unwrap_or(0))
        ));
    }
    Some(out)
}

fn directive_section(active: &[AgentProgress]) -> Option<String> {
    if active.is_empty() {
        return None;
    }
    Some(
        "### Coordination Directive\n\
         Other agents are working in parallel. Do not modify files claimed by another agent, \
         and build on the decisions already made instead of revisiting them.\n"
            .to_string(),
    )
}

/// Human-readable duration: `42s`, `3m 12s`, `1h 05m`.
fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Truncate to at most `max` characters, ending in `...` when cut.
///
/// Below four characters there is no room for the ellipsis, so the text is
/// cut without one.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let keep = max - 3;
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{DomainError, DomainResult};
    use crate::domain::models::{ClaimOperation, OutputSummary};
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::Mutex;

    struct MockProgressStore {
        records: Mutex<Vec<AgentProgress>>,
    }

    impl MockProgressStore {
        fn new(records: Vec<AgentProgress>) -> Self {
            Self {
                records: Mutex::new(records),
            }
        }
    }

    #[async_trait]
    impl ProgressStore for MockProgressStore {
        async fn get_by_phase(&self, phase: Phase) -> DomainResult<Vec<AgentProgress>> {
            let records = self.records.lock().unwrap();
            Ok(records.iter().filter(|r| r.phase == phase).cloned().collect())
        }

        async fn get_active(&self, exclude_agent_key: &str) -> DomainResult<Vec<AgentProgress>> {
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|r| r.status == AgentStatus::Active && r.agent_key != exclude_agent_key)
                .cloned()
                .collect())
        }
    }

    struct MockClaims {
        claims: Mutex<Vec<FileClaim>>,
    }

    #[async_trait]
    impl FileClaimsStore for MockClaims {
        async fn get_conflicts(&self, agent_key: &str) -> DomainResult<Vec<FileClaim>> {
            let claims = self.claims.lock().unwrap();
            Ok(claims.iter().filter(|c| c.claimed_by != agent_key).cloned().collect())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ProgressStore for BrokenStore {
        async fn get_by_phase(&self, _phase: Phase) -> DomainResult<Vec<AgentProgress>> {
            Err(DomainError::StoreUnavailable("progress offline".into()))
        }

        async fn get_active(&self, _exclude: &str) -> DomainResult<Vec<AgentProgress>> {
            Err(DomainError::StoreUnavailable("progress offline".into()))
        }
    }

    fn builder(records: Vec<AgentProgress>, claims: Vec<FileClaim>) -> SituationalAwarenessBuilder {
        SituationalAwarenessBuilder::new(
            Arc::new(MockProgressStore::new(records)),
            Arc::new(MockClaims {
                claims: Mutex::new(claims),
            }),
            AwarenessConfig::default(),
        )
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 80), "short");
        let long = "é".repeat(100);
        let cut = truncate(&long, 80);
        assert_eq!(cut.chars().count(), 80);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_never_exceeds_tiny_limits() {
        for max in 0..=4 {
            let cut = truncate("investigation", max);
            assert_eq!(cut.chars().count(), max, "max {max}");
        }
        assert_eq!(truncate("investigation", 2), "in");
        assert_eq!(truncate("investigation", 4), "i...");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(42_000), "42s");
        assert_eq!(format_ms(192_000), "3m 12s");
        assert_eq!(format_ms(3_900_000), "1h 05m");
    }

    #[tokio::test]
    async fn test_empty_world_returns_placeholder() {
        let section = builder(vec![], vec![])
            .build_awareness_section_at("agent-a", Phase::Implementation, now())
            .await;
        assert_eq!(section, NO_ACTIVITY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_placeholder() {
        let builder = SituationalAwarenessBuilder::new(
            Arc::new(BrokenStore),
            Arc::new(MockClaims {
                claims: Mutex::new(vec![]),
            }),
            AwarenessConfig::default(),
        );
        let section = builder
            .build_awareness_section_at("agent-a", Phase::Testing, now())
            .await;
        assert_eq!(section, NO_ACTIVITY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_completed_peer_and_decisions() {
        let output = OutputSummary {
            key_findings: vec!["x".repeat(120)],
            decisions: vec!["Use sqlite for the cache".into()],
            files_created: (0..7).map(|i| format!("src/f{i}.rs")).collect(),
            files_modified: vec![],
        };
        let done = AgentProgress::active("agent-b", Phase::Implementation, now() - Duration::minutes(5))
            .completed(90_000, output);
        let section = builder(vec![done], vec![])
            .build_awareness_section_at("agent-a", Phase::Implementation, now())
            .await;

        assert!(section.contains("### Completed Agents"));
        assert!(section.contains("**agent-b** (finished in 1m 30s)"));
        assert!(section.contains(&format!("Finding: {}...", "x".repeat(77))));
        assert!(section.contains("1. Use sqlite for the cache (agent-b)"));
        assert!(section.contains("(+2 more)"));
        assert!(!section.contains("Coordination Directive"));
    }

    #[tokio::test]
    async fn test_decisions_capped_with_overflow_notice() {
        let output = OutputSummary {
            decisions: (0..13).map(|i| format!("decision-{i}")).collect(),
            ..Default::default()
        };
        let done = AgentProgress::active("agent-b", Phase::Architecture, now()).completed(1_000, output);
        let section = builder(vec![done], vec![])
            .build_awareness_section_at("agent-a", Phase::Architecture, now())
            .await;
        assert!(section.contains("10. decision-9"));
        assert!(!section.contains("11. decision-10"));
        assert!(section.contains("...and 3 more decision(s)"));
    }

    #[tokio::test]
    async fn test_active_peer_adds_directive() {
        let running = AgentProgress::active("agent-c", Phase::Implementation, now() - Duration::seconds(75));
        let section = builder(vec![running], vec![])
            .build_awareness_section_at("agent-a", Phase::Implementation, now())
            .await;
        assert!(section.contains("**agent-c** (Phase 4: implementation, running for 1m 15s)"));
        assert!(section.contains("### Coordination Directive"));
    }

    #[tokio::test]
    async fn test_double_claim_reported_as_conflict() {
        let claims = vec![
            FileClaim::new("src/foo.ts", "agent-a", ClaimOperation::Write, now()),
            FileClaim::new("src/foo.ts", "agent-b", ClaimOperation::Write, now()),
        ];
        let section = builder(vec![], claims)
            .build_awareness_section_at("agent-b", Phase::Implementation, now())
            .await;
        assert!(section.contains("### File Conflicts (do not modify)"));
        assert!(section.contains("- `src/foo.ts` (write claimed by agent-a)"));
        assert!(!section.contains("claimed by agent-b"));
    }
}
