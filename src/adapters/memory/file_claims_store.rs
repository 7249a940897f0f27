use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::DomainResult;
use crate::domain::models::FileClaim;
use crate::domain::ports::FileClaimsStore;

/// File claims kept in claim order.
///
/// Several agents may claim the same path; the overlap is surfaced through
/// [`FileClaimsStore::get_conflicts`] rather than rejected.
#[derive(Debug, Default)]
pub struct InMemoryFileClaimsStore {
    claims: RwLock<Vec<FileClaim>>,
}

impl InMemoryFileClaimsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claims(claims: Vec<FileClaim>) -> Self {
        Self {
            claims: RwLock::new(claims),
        }
    }

    /// Record a claim. A repeated claim by the same agent on the same path
    /// replaces the earlier one.
    pub async fn claim(&self, claim: FileClaim) {
        let mut claims = self.claims.write().await;
        claims.retain(|c| !(c.path == claim.path && c.claimed_by == claim.claimed_by));
        claims.push(claim);
    }

    /// Drop the claim `agent_key` holds on `path`. Returns whether one existed.
    pub async fn release(&self, path: &str, agent_key: &str) -> bool {
        let mut claims = self.claims.write().await;
        let before = claims.len();
        claims.retain(|c| !(c.path == path && c.claimed_by == agent_key));
        claims.len() != before
    }

    pub async fn claims_for(&self, agent_key: &str) -> Vec<FileClaim> {
        let claims = self.claims.read().await;
        claims
            .iter()
            .filter(|c| c.claimed_by == agent_key)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl FileClaimsStore for InMemoryFileClaimsStore {
    async fn get_conflicts(&self, agent_key: &str) -> DomainResult<Vec<FileClaim>> {
        let claims = self.claims.read().await;
        Ok(claims
            .iter()
            .filter(|c| c.claimed_by != agent_key)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ClaimOperation;
    use chrono::Utc;

    #[tokio::test]
    async fn test_double_claim_is_visible_to_second_agent() {
        let store = InMemoryFileClaimsStore::new();
        store
            .claim(FileClaim::new("src/foo.ts", "agent-1", ClaimOperation::Write, Utc::now()))
            .await;
        store
            .claim(FileClaim::new("src/foo.ts", "agent-2", ClaimOperation::Write, Utc::now()))
            .await;

        let conflicts = store.get_conflicts("agent-2").await.unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].claimed_by, "agent-1");
        assert_eq!(conflicts[0].path, "src/foo.ts");
    }

    #[tokio::test]
    async fn test_release_and_reclaim() {
        let store = InMemoryFileClaimsStore::new();
        let claim = FileClaim::new("src/lib.rs", "agent-1", ClaimOperation::Create, Utc::now());
        store.claim(claim.clone()).await;
        store.claim(claim).await;
        assert_eq!(store.claims_for("agent-1").await.len(), 1);

        assert!(store.release("src/lib.rs", "agent-1").await);
        assert!(!store.release("src/lib.rs", "agent-1").await);
        assert!(store.get_conflicts("agent-2").await.unwrap().is_empty());
    }
}
