//! `sherlock thresholds`

use anyhow::Result;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::cli::table::TableFormatter;
use crate::domain::models::Phase;

#[derive(Debug, Serialize)]
pub struct ThresholdRow {
    pub phase: u8,
    pub name: &'static str,
    pub threshold: f64,
}

#[derive(Debug, Serialize)]
pub struct ThresholdsOutput {
    pub phases: Vec<ThresholdRow>,
}

impl ThresholdsOutput {
    pub fn collect() -> Self {
        Self {
            phases: Phase::ALL
                .iter()
                .map(|p| ThresholdRow {
                    phase: p.number(),
                    name: p.name(),
                    threshold: p.threshold(),
                })
                .collect(),
        }
    }
}

impl CommandOutput for ThresholdsOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_thresholds()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(json_mode: bool) -> Result<()> {
    output(&ThresholdsOutput::collect(), json_mode);
    Ok(())
}
