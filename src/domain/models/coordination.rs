//! Agent coordination records.
//!
//! These records are owned by external stores and consumed read-only by
//! the situational awareness builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;

/// Lifecycle status of an agent within a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Completed,
    Failed,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// What an agent reported when it finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSummary {
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub files_created: Vec<String>,
    #[serde(default)]
    pub files_modified: Vec<String>,
}

impl OutputSummary {
    /// Created then modified files, in that order.
    pub fn touched_files(&self) -> impl Iterator<Item = &String> {
        self.files_created.iter().chain(self.files_modified.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.key_findings.is_empty()
            && self.decisions.is_empty()
            && self.files_created.is_empty()
            && self.files_modified.is_empty()
    }
}

/// Progress record for one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProgress {
    pub agent_key: String,
    pub phase: Phase,
    pub status: AgentStatus,
    pub started_at: DateTime<Utc>,
    /// Wall-clock run time once the agent has finished.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub output: Option<OutputSummary>,
}

impl AgentProgress {
    /// A freshly started agent.
    pub fn active(agent_key: impl Into<String>, phase: Phase, started_at: DateTime<Utc>) -> Self {
        Self {
            agent_key: agent_key.into(),
            phase,
            status: AgentStatus::Active,
            started_at,
            duration_ms: None,
            output: None,
        }
    }

    pub fn completed(mut self, duration_ms: u64, output: OutputSummary) -> Self {
        self.status = AgentStatus::Completed;
        self.duration_ms = Some(duration_ms);
        self.output = Some(output);
        self
    }

    pub fn failed(mut self, duration_ms: u64) -> Self {
        self.status = AgentStatus::Failed;
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// What a file claim intends to do with the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOperation {
    Read,
    Write,
    Create,
    Delete,
}

impl ClaimOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Create => "create",
            Self::Delete => "delete",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "read" => Some(Self::Read),
            "write" | "modify" => Some(Self::Write),
            "create" => Some(Self::Create),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A declared intent by one agent to operate on a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileClaim {
    pub path: String,
    pub claimed_by: String,
    pub operation: ClaimOperation,
    pub claimed_at: DateTime<Utc>,
}

impl FileClaim {
    pub fn new(
        path: impl Into<String>,
        claimed_by: impl Into<String>,
        operation: ClaimOperation,
        claimed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            claimed_by: claimed_by.into(),
            operation,
            claimed_at,
        }
    }
}
