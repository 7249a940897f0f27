//! Progress store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{AgentProgress, Phase};

/// Read access to agent progress records.
///
/// Writers (agents marking themselves active or completed) live outside the
/// core; implementations must hand out consistent snapshots to concurrent
/// readers.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// All progress records for a phase, in the order agents started.
    async fn get_by_phase(&self, phase: Phase) -> DomainResult<Vec<AgentProgress>>;

    /// Active agents across every phase, excluding `exclude_agent_key`.
    async fn get_active(&self, exclude_agent_key: &str) -> DomainResult<Vec<AgentProgress>>;
}
