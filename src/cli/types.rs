//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::{
    awareness::AwarenessArgs, investigate::InvestigateArgs, report::ReportArgs, score::ScoreArgs,
};

#[derive(Parser, Debug)]
#[command(name = "sherlock")]
#[command(about = "Sherlock - forensic phase gate for multi-agent coding pipelines", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to .sherlock/config.yaml and .sherlock/local.yaml)
    #[arg(short, long, global = true, env = "SHERLOCK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the L-Score threshold of every phase
    Thresholds,

    /// Compute the L-Score of a phase execution result
    Score(ScoreArgs),

    /// Investigate a phase execution result and render a verdict
    Investigate(InvestigateArgs),

    /// Render a stored case file as a report
    Report(ReportArgs),

    /// Build the situational awareness section for an agent
    Awareness(AwarenessArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_investigate() {
        let cli = Cli::try_parse_from([
            "sherlock",
            "--json",
            "investigate",
            "--phase",
            "4",
            "--input",
            "result.json",
            "--retry",
            "2",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Investigate(args) => {
                assert_eq!(args.phase, 4);
                assert_eq!(args.retry, 2);
                assert!(args.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_score_requires_input() {
        assert!(Cli::try_parse_from(["sherlock", "score", "--phase", "1"]).is_err());
    }
}
