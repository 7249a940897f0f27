use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentProgress, AgentStatus, OutputSummary, Phase};
use crate::domain::ports::ProgressStore;

/// Progress records kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    records: RwLock<Vec<AgentProgress>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records.
    pub fn with_records(records: Vec<AgentProgress>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Insert a record, replacing any record for the same agent and phase.
    pub async fn upsert(&self, progress: AgentProgress) {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.agent_key == progress.agent_key && r.phase == progress.phase)
        {
            Some(existing) => *existing = progress,
            None => records.push(progress),
        }
    }

    /// Mark an agent as started now.
    pub async fn mark_active(&self, agent_key: &str, phase: Phase, started_at: DateTime<Utc>) {
        self.upsert(AgentProgress::active(agent_key, phase, started_at))
            .await;
    }

    pub async fn mark_completed(
        &self,
        agent_key: &str,
        phase: Phase,
        duration_ms: u64,
        output: OutputSummary,
    ) -> DomainResult<()> {
        self.update(agent_key, phase, |r| {
            r.status = AgentStatus::Completed;
            r.duration_ms = Some(duration_ms);
            r.output = Some(output);
        })
        .await
    }

    pub async fn mark_failed(&self, agent_key: &str, phase: Phase, duration_ms: u64) -> DomainResult<()> {
        self.update(agent_key, phase, |r| {
            r.status = AgentStatus::Failed;
            r.duration_ms = Some(duration_ms);
        })
        .await
    }

    async fn update<F>(&self, agent_key: &str, phase: Phase, apply: F) -> DomainResult<()>
    where
        F: FnOnce(&mut AgentProgress),
    {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.agent_key == agent_key && r.phase == phase)
            .ok_or_else(|| {
                DomainError::ValidationFailed(format!(
                    "no progress record for agent {agent_key} in {phase}"
                ))
            })?;
        apply(record);
        Ok(())
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn get_by_phase(&self, phase: Phase) -> DomainResult<Vec<AgentProgress>> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.phase == phase).cloned().collect())
    }

    async fn get_active(&self, exclude_agent_key: &str) -> DomainResult<Vec<AgentProgress>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.status == AgentStatus::Active && r.agent_key != exclude_agent_key)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_replaces_same_agent_and_phase() {
        let store = InMemoryProgressStore::new();
        let now = Utc::now();
        store.mark_active("coder-1", Phase::Implementation, now).await;
        store.mark_active("coder-1", Phase::Implementation, now).await;
        store.mark_active("coder-1", Phase::Testing, now).await;

        assert_eq!(store.get_by_phase(Phase::Implementation).await.unwrap().len(), 1);
        assert_eq!(store.get_by_phase(Phase::Testing).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_completion_removes_agent_from_active() {
        let store = InMemoryProgressStore::new();
        store.mark_active("coder-1", Phase::Implementation, Utc::now()).await;
        store.mark_active("coder-2", Phase::Implementation, Utc::now()).await;

        assert_eq!(store.get_active("coder-2").await.unwrap().len(), 1);
        store
            .mark_completed("coder-1", Phase::Implementation, 1_500, OutputSummary::default())
            .await
            .unwrap();
        assert!(store.get_active("coder-2").await.unwrap().is_empty());

        let records = store.get_by_phase(Phase::Implementation).await.unwrap();
        assert_eq!(records[0].status, AgentStatus::Completed);
        assert_eq!(records[0].duration_ms, Some(1_500));
    }

    #[tokio::test]
    async fn test_unknown_agent_update_fails() {
        let store = InMemoryProgressStore::new();
        let err = store
            .mark_failed("ghost", Phase::Delivery, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }
}
