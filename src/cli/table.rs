//! Table output formatting for CLI commands
//!
//! Renders thresholds, L-Score breakdowns and verification results with
//! comfy-table. Colors are dropped when `NO_COLOR` is set or the terminal
//! cannot show them.

use comfy_table::{presets, Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::env;

use crate::domain::models::{LScoreBreakdown, LScoreComponent, Phase, VerificationCheckResult};

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Phase thresholds, one row per phase
    pub fn format_thresholds(&self) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            header("Phase"),
            header("Name"),
            header("Threshold"),
        ]);

        for phase in Phase::ALL {
            table.add_row(vec![
                Cell::new(phase.number()),
                Cell::new(phase.name()),
                Cell::new(format!("{:.2}", phase.threshold())).set_alignment(CellAlignment::Right),
            ]);
        }

        table.to_string()
    }

    /// Component breakdown followed by the weighted composite
    pub fn format_lscore(&self, phase: Phase, lscore: &LScoreBreakdown) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![header("Component"), header("Weight"), header("Value")]);

        for component in LScoreComponent::ALL {
            table.add_row(vec![
                Cell::new(component.as_str()),
                Cell::new(format!("{:.2}", component.weight())).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", lscore.component(component)))
                    .set_alignment(CellAlignment::Right),
            ]);
        }

        let passed = lscore.composite() >= phase.threshold();
        let composite = Cell::new(format!("{:.3}", lscore.composite()))
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold);
        table.add_row(vec![
            Cell::new("composite").add_attribute(Attribute::Bold),
            Cell::new(format!(">= {:.2}", phase.threshold())).set_alignment(CellAlignment::Right),
            if self.use_colors {
                composite.fg(pass_color(passed))
            } else {
                composite
            },
        ]);

        table.to_string()
    }

    /// Verification results with PASS/FAIL markers
    pub fn format_verification(&self, results: &[VerificationCheckResult]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            header("Check"),
            header("Method"),
            header("Expected"),
            header("Actual"),
            header("Result"),
        ]);

        for result in results {
            let label = if result.passed { "PASS" } else { "FAIL" };
            let result_cell = if self.use_colors {
                Cell::new(label).fg(pass_color(result.passed))
            } else {
                Cell::new(label)
            };
            table.add_row(vec![
                Cell::new(&result.check),
                Cell::new(&result.method),
                Cell::new(format!("{:.3}", result.expected)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.3}", result.actual)).set_alignment(CellAlignment::Right),
                result_cell,
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

const fn pass_color(passed: bool) -> Color {
    if passed {
        Color::Green
    } else {
        Color::Red
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::colors_enabled()
}
