//! `sherlock awareness`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use super::read_json;
use crate::adapters::{InMemoryFileClaimsStore, InMemoryProgressStore};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{AgentProgress, Config, FileClaim, Phase};
use crate::services::SituationalAwarenessBuilder;

#[derive(Args, Debug)]
pub struct AwarenessArgs {
    /// Agent the section is built for
    #[arg(short, long)]
    pub agent: String,

    /// Phase number (1-7)
    #[arg(short, long)]
    pub phase: u8,

    /// Coordination snapshot (JSON with `progress` and `claims` arrays)
    #[arg(short, long)]
    pub snapshot: PathBuf,
}

/// Progress records and file claims captured from the shared stores.
#[derive(Debug, Default, Deserialize)]
pub struct CoordinationSnapshot {
    #[serde(default)]
    pub progress: Vec<AgentProgress>,
    #[serde(default)]
    pub claims: Vec<FileClaim>,
}

#[derive(Debug, Serialize)]
pub struct AwarenessOutput {
    pub agent_key: String,
    pub phase: Phase,
    pub section: String,
}

impl CommandOutput for AwarenessOutput {
    fn to_human(&self) -> String {
        self.section.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: AwarenessArgs, config: &Config, json_mode: bool) -> Result<()> {
    let phase = Phase::from_number(args.phase)?;
    let snapshot: CoordinationSnapshot = read_json(&args.snapshot).await?;

    let builder = SituationalAwarenessBuilder::new(
        Arc::new(InMemoryProgressStore::with_records(snapshot.progress)),
        Arc::new(InMemoryFileClaimsStore::with_claims(snapshot.claims)),
        config.awareness.clone(),
    );
    let section = builder.build_awareness_section(&args.agent, phase).await;

    output(
        &AwarenessOutput {
            agent_key: args.agent,
            phase,
            section,
        },
        json_mode,
    );
    Ok(())
}
