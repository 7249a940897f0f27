//! File claims store port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::FileClaim;

/// Read access to file claims.
#[async_trait]
pub trait FileClaimsStore: Send + Sync {
    /// Claims held by agents other than `agent_key`.
    async fn get_conflicts(&self, agent_key: &str) -> DomainResult<Vec<FileClaim>>;
}
