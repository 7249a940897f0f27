//! `sherlock score`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::read_json;
use crate::cli::output::{output, CommandOutput};
use crate::cli::table::TableFormatter;
use crate::domain::models::{
    Config, LScoreBreakdown, LScoreComponent, Phase, PhaseExecutionResult,
};
use crate::services::{meets_phase_threshold, PhaseGate};

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Phase number (1-7)
    #[arg(short, long)]
    pub phase: u8,

    /// Phase execution result (JSON)
    #[arg(short, long)]
    pub input: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ComponentScore {
    pub component: &'static str,
    pub weight: f64,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ScoreOutput {
    pub phase: Phase,
    pub components: Vec<ComponentScore>,
    pub composite: f64,
    pub threshold: f64,
    pub meets_threshold: bool,
    #[serde(skip)]
    lscore: LScoreBreakdown,
}

impl ScoreOutput {
    pub fn new(phase: Phase, lscore: LScoreBreakdown) -> Self {
        Self {
            phase,
            components: LScoreComponent::ALL
                .iter()
                .map(|c| ComponentScore {
                    component: c.as_str(),
                    weight: c.weight(),
                    value: lscore.component(*c),
                })
                .collect(),
            composite: lscore.composite(),
            threshold: phase.threshold(),
            meets_threshold: meets_phase_threshold(phase, &lscore),
            lscore,
        }
    }
}

impl CommandOutput for ScoreOutput {
    fn to_human(&self) -> String {
        let verdict = if self.meets_threshold {
            console::style("meets threshold").green().bold()
        } else {
            console::style("below threshold").red().bold()
        };
        format!(
            "{}\n{}\nComposite {:.3} {} ({:.2})",
            self.phase,
            TableFormatter::new().format_lscore(self.phase, &self.lscore),
            self.composite,
            verdict,
            self.threshold
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ScoreArgs, config: &Config, json_mode: bool) -> Result<()> {
    let phase = Phase::from_number(args.phase)?;
    let result: PhaseExecutionResult = read_json(&args.input).await?;

    let lscore = PhaseGate::new(config).calculate_phase_lscore(phase, &result);
    output(&ScoreOutput::new(phase, lscore), json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::LScoreComponents;

    #[test]
    fn test_score_output_json() {
        let lscore = LScoreBreakdown::from_components(LScoreComponents::uniform(0.9));
        let json = ScoreOutput::new(Phase::Architecture, lscore).to_json();
        assert_eq!(json["phase"], "architecture");
        assert_eq!(json["meets_threshold"], true);
        assert_eq!(json["components"].as_array().unwrap().len(), 6);
        assert!(json.get("lscore").is_none());
    }
}
