//! L-Score domain model.
//!
//! The L-Score summarizes the quality of one phase execution attempt as six
//! bounded components and a weighted composite. A breakdown is built once
//! per attempt and never changes afterwards.

use serde::{Deserialize, Serialize};

/// Weight of each component in the composite. Sums to 1.0.
pub const ACCURACY_WEIGHT: f64 = 0.25;
pub const COMPLETENESS_WEIGHT: f64 = 0.20;
pub const MAINTAINABILITY_WEIGHT: f64 = 0.15;
pub const SECURITY_WEIGHT: f64 = 0.15;
pub const PERFORMANCE_WEIGHT: f64 = 0.10;
pub const TEST_COVERAGE_WEIGHT: f64 = 0.15;

/// Names one of the six L-Score components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LScoreComponent {
    Accuracy,
    Completeness,
    Maintainability,
    Security,
    Performance,
    TestCoverage,
}

impl LScoreComponent {
    pub const ALL: [LScoreComponent; 6] = [
        LScoreComponent::Accuracy,
        LScoreComponent::Completeness,
        LScoreComponent::Maintainability,
        LScoreComponent::Security,
        LScoreComponent::Performance,
        LScoreComponent::TestCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Completeness => "completeness",
            Self::Maintainability => "maintainability",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::TestCoverage => "test_coverage",
        }
    }

    pub const fn weight(&self) -> f64 {
        match self {
            Self::Accuracy => ACCURACY_WEIGHT,
            Self::Completeness => COMPLETENESS_WEIGHT,
            Self::Maintainability => MAINTAINABILITY_WEIGHT,
            Self::Security => SECURITY_WEIGHT,
            Self::Performance => PERFORMANCE_WEIGHT,
            Self::TestCoverage => TEST_COVERAGE_WEIGHT,
        }
    }
}

/// Raw component values before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LScoreComponents {
    pub accuracy: f64,
    pub completeness: f64,
    pub maintainability: f64,
    pub security: f64,
    pub performance: f64,
    pub test_coverage: f64,
}

impl LScoreComponents {
    /// Every component set to the same value.
    pub const fn uniform(value: f64) -> Self {
        Self {
            accuracy: value,
            completeness: value,
            maintainability: value,
            security: value,
            performance: value,
            test_coverage: value,
        }
    }

    pub fn get_mut(&mut self, component: LScoreComponent) -> &mut f64 {
        match component {
            LScoreComponent::Accuracy => &mut self.accuracy,
            LScoreComponent::Completeness => &mut self.completeness,
            LScoreComponent::Maintainability => &mut self.maintainability,
            LScoreComponent::Security => &mut self.security,
            LScoreComponent::Performance => &mut self.performance,
            LScoreComponent::TestCoverage => &mut self.test_coverage,
        }
    }
}

/// Six-component weighted quality score for one phase execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LScoreBreakdown {
    accuracy: f64,
    completeness: f64,
    maintainability: f64,
    security: f64,
    performance: f64,
    test_coverage: f64,
    composite: f64,
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl LScoreBreakdown {
    /// Build a breakdown, clamping each component to [0,1] before weighting.
    pub fn from_components(components: LScoreComponents) -> Self {
        let accuracy = clamp_unit(components.accuracy);
        let completeness = clamp_unit(components.completeness);
        let maintainability = clamp_unit(components.maintainability);
        let security = clamp_unit(components.security);
        let performance = clamp_unit(components.performance);
        let test_coverage = clamp_unit(components.test_coverage);

        let composite = clamp_unit(
            accuracy * ACCURACY_WEIGHT
                + completeness * COMPLETENESS_WEIGHT
                + maintainability * MAINTAINABILITY_WEIGHT
                + security * SECURITY_WEIGHT
                + performance * PERFORMANCE_WEIGHT
                + test_coverage * TEST_COVERAGE_WEIGHT,
        );

        Self {
            accuracy,
            completeness,
            maintainability,
            security,
            performance,
            test_coverage,
            composite,
        }
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn completeness(&self) -> f64 {
        self.completeness
    }

    pub fn maintainability(&self) -> f64 {
        self.maintainability
    }

    pub fn security(&self) -> f64 {
        self.security
    }

    pub fn performance(&self) -> f64 {
        self.performance
    }

    pub fn test_coverage(&self) -> f64 {
        self.test_coverage
    }

    /// Weighted sum of the clamped components, in [0,1].
    pub fn composite(&self) -> f64 {
        self.composite
    }

    /// Value of a single component.
    pub fn component(&self, component: LScoreComponent) -> f64 {
        match component {
            LScoreComponent::Accuracy => self.accuracy,
            LScoreComponent::Completeness => self.completeness,
            LScoreComponent::Maintainability => self.maintainability,
            LScoreComponent::Security => self.security,
            LScoreComponent::Performance => self.performance,
            LScoreComponent::TestCoverage => self.test_coverage,
        }
    }

    /// The lowest-scoring component. Ties resolve to the earlier component.
    pub fn weakest(&self) -> (LScoreComponent, f64) {
        LScoreComponent::ALL
            .iter()
            .map(|c| (*c, self.component(*c)))
            .fold((LScoreComponent::Accuracy, f64::INFINITY), |acc, item| {
                if item.1 < acc.1 {
                    item
                } else {
                    acc
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = LScoreComponent::ALL.iter().map(LScoreComponent::weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_uniform_components_give_same_composite() {
        let score = LScoreBreakdown::from_components(LScoreComponents::uniform(0.9));
        assert!((score.composite() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_components_clamped_before_weighting() {
        let score = LScoreBreakdown::from_components(LScoreComponents {
            accuracy: 1.7,
            completeness: -0.3,
            maintainability: 0.5,
            security: 0.5,
            performance: 0.5,
            test_coverage: 0.5,
        });
        assert!((score.accuracy() - 1.0).abs() < f64::EPSILON);
        assert!(score.completeness().abs() < f64::EPSILON);
        let expected = 0.25 + 0.0 + 0.5 * (0.15 + 0.15 + 0.10 + 0.15);
        assert!((score.composite() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_nan_component_treated_as_zero() {
        let mut components = LScoreComponents::uniform(1.0);
        components.security = f64::NAN;
        let score = LScoreBreakdown::from_components(components);
        assert!(score.security().abs() < f64::EPSILON);
        assert!((score.composite() - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_weakest_component() {
        let score = LScoreBreakdown::from_components(LScoreComponents {
            accuracy: 0.9,
            completeness: 0.8,
            maintainability: 0.7,
            security: 0.3,
            performance: 0.6,
            test_coverage: 0.3,
        });
        assert_eq!(score.weakest(), (LScoreComponent::Security, 0.3));
    }
}
