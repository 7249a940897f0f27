//! `sherlock report`

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::read_json;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{CaseFile, Verdict};
use crate::services::render_report;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Case file written by `sherlock investigate --output`
    #[arg(short, long)]
    pub case_file: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub case_id: String,
    pub verdict: Verdict,
    pub report: String,
}

impl From<&CaseFile> for ReportOutput {
    fn from(case: &CaseFile) -> Self {
        Self {
            case_id: case.case_id().to_string(),
            verdict: case.verdict(),
            report: render_report(case),
        }
    }
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        self.report.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ReportArgs, json_mode: bool) -> Result<()> {
    let case: CaseFile = read_json(&args.case_file).await?;
    output(&ReportOutput::from(&case), json_mode);
    Ok(())
}
