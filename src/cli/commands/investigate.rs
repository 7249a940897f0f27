//! `sherlock investigate`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::info;

use super::read_json;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, Phase, PhaseExecutionResult, PhaseValidation, Verdict};
use crate::services::{handle_guilty_verdict, ForensicValidator, PhaseGate};

#[derive(Args, Debug)]
pub struct InvestigateArgs {
    /// Phase number (1-7)
    #[arg(short, long)]
    pub phase: u8,

    /// Phase execution result (JSON)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Remediation rounds already attempted for this phase
    #[arg(short, long, default_value = "0")]
    pub retry: u32,

    /// Write the case file (JSON) to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Exit non-zero when the verdict is GUILTY
    #[arg(long)]
    pub fail_on_guilty: bool,
}

#[derive(Debug, Serialize)]
pub struct InvestigateOutput {
    pub validation: PhaseValidation,
    /// Phase-prefixed remediation lines; empty when INNOCENT.
    pub remediation_lines: Vec<String>,
}

impl CommandOutput for InvestigateOutput {
    fn to_human(&self) -> String {
        let mut out = self.validation.report.clone().unwrap_or_default();
        let verdict = match self.validation.verdict {
            Verdict::Innocent => console::style("INNOCENT").green().bold(),
            Verdict::Guilty => console::style("GUILTY").red().bold(),
        };
        out.push_str(&format!(
            "\n{}: {} at {} tier (L-Score {:.3})\n",
            self.validation.phase,
            verdict,
            self.validation.investigation_tier.as_str(),
            self.validation.lscore.composite()
        ));
        for line in &self.remediation_lines {
            out.push_str(&format!("  {line}\n"));
        }
        out
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: InvestigateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let phase = Phase::from_number(args.phase)?;
    let result: PhaseExecutionResult = read_json(&args.input).await?;

    let gate = PhaseGate::new(config).with_validator(Arc::new(ForensicValidator::new(config)));
    let validation = gate
        .validate_phase(args.phase, &result, args.retry)
        .await?
        .ok_or_else(|| anyhow!("no verdict validator configured"))?;

    if let (Some(path), Some(case)) = (&args.output, &validation.case_file) {
        let body = serde_json::to_string_pretty(case)?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write case file to {}", path.display()))?;
        info!(case_id = case.case_id(), path = %path.display(), "Case file written");
    }

    let verdict = validation.verdict;
    let remediation_lines = handle_guilty_verdict(&validation, phase);
    output(
        &InvestigateOutput {
            validation,
            remediation_lines,
        },
        json_mode,
    );

    if args.fail_on_guilty && verdict == Verdict::Guilty {
        anyhow::bail!("{phase} is GUILTY; remediation required");
    }
    Ok(())
}
