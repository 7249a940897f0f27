//! L-Score calculator.
//!
//! Derives the six L-Score components from a phase's raw execution signals.
//! Components without a relevant signal fall back to a configurable baseline.
//! Tool-reported measurements on the result override the estimates.

use crate::domain::models::{
    LScoreBreakdown, LScoreComponents, LScoreConfig, Phase, PhaseExecutionResult,
};

/// Upper bounds (seconds) of the performance duration bands and their scores.
const PERFORMANCE_BANDS: [(u64, f64); 4] = [(60, 1.0), (300, 0.85), (900, 0.7), (1800, 0.55)];

/// Performance score for anything slower than the last band.
const SLOWEST_BAND_SCORE: f64 = 0.4;

/// Computes L-Score breakdowns from phase execution results.
#[derive(Debug, Clone)]
pub struct LScoreCalculator {
    baseline: f64,
}

impl Default for LScoreCalculator {
    fn default() -> Self {
        Self::new(&LScoreConfig::default())
    }
}

impl LScoreCalculator {
    pub fn new(config: &LScoreConfig) -> Self {
        Self {
            baseline: config.baseline.clamp(0.0, 1.0),
        }
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Calculate the breakdown for one phase execution attempt. Never fails.
    pub fn calculate(&self, phase: Phase, result: &PhaseExecutionResult) -> LScoreBreakdown {
        let ratio = result.success_ratio();
        let clean_success = result.success && result.agents_failed == 0;
        let b = self.baseline;

        let accuracy = match ratio {
            Some(r) => 0.8 * r + if result.success { 0.2 } else { 0.0 },
            None => b,
        };

        let completeness = match (result.success, ratio) {
            (true, r) => 0.85 + 0.15 * r.unwrap_or(1.0),
            (false, Some(r)) => 0.6 * r,
            (false, None) => b,
        };

        let maintainability = match phase {
            Phase::Architecture | Phase::Implementation | Phase::Optimization if clean_success => {
                b + 0.2
            }
            _ => b,
        };

        let security = if phase == Phase::Optimization && result.success {
            b + 0.3
        } else {
            b
        };

        let performance = match result.duration_ms {
            Some(ms) if ms > 0 => performance_band(ms),
            _ => b,
        };

        let test_coverage = match (phase, ratio) {
            (Phase::Testing, Some(r)) => 0.5 + 0.5 * r,
            (Phase::Testing, None) if result.success => 0.85,
            _ => b,
        };

        let mut components = LScoreComponents {
            accuracy,
            completeness,
            maintainability,
            security,
            performance,
            test_coverage,
        };
        for (&component, &value) in &result.measurements {
            *components.get_mut(component) = value;
        }

        LScoreBreakdown::from_components(components)
    }
}

fn performance_band(duration_ms: u64) -> f64 {
    PERFORMANCE_BANDS
        .iter()
        .find(|(limit, _)| duration_ms <= limit.saturating_mul(1000))
        .map_or(SLOWEST_BAND_SCORE, |(_, score)| *score)
}
