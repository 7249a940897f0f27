//! Pipeline phase identity and per-phase gate thresholds.
//!
//! The pipeline has seven phases in a fixed order. Each phase carries the
//! minimum L-Score composite it must reach before it may advance; the
//! thresholds rise strictly from the first phase to the last.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// One of the seven pipeline phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Understanding,
    Exploration,
    Architecture,
    Implementation,
    Testing,
    Optimization,
    Delivery,
}

impl Phase {
    /// All phases in pipeline order.
    pub const ALL: [Phase; 7] = [
        Phase::Understanding,
        Phase::Exploration,
        Phase::Architecture,
        Phase::Implementation,
        Phase::Testing,
        Phase::Optimization,
        Phase::Delivery,
    ];

    /// Resolve a phase from its 1-based pipeline number.
    pub fn from_number(number: u8) -> DomainResult<Self> {
        match number {
            1 => Ok(Self::Understanding),
            2 => Ok(Self::Exploration),
            3 => Ok(Self::Architecture),
            4 => Ok(Self::Implementation),
            5 => Ok(Self::Testing),
            6 => Ok(Self::Optimization),
            7 => Ok(Self::Delivery),
            other => Err(DomainError::UnknownPhase(other)),
        }
    }

    /// Resolve a phase from its name (case-insensitive).
    pub fn parse_str(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "understanding" => Ok(Self::Understanding),
            "exploration" => Ok(Self::Exploration),
            "architecture" => Ok(Self::Architecture),
            "implementation" => Ok(Self::Implementation),
            "testing" => Ok(Self::Testing),
            "optimization" => Ok(Self::Optimization),
            "delivery" => Ok(Self::Delivery),
            _ => Err(DomainError::UnknownPhaseName(s.to_string())),
        }
    }

    /// 1-based pipeline number.
    pub const fn number(&self) -> u8 {
        match self {
            Self::Understanding => 1,
            Self::Exploration => 2,
            Self::Architecture => 3,
            Self::Implementation => 4,
            Self::Testing => 5,
            Self::Optimization => 6,
            Self::Delivery => 7,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Understanding => "understanding",
            Self::Exploration => "exploration",
            Self::Architecture => "architecture",
            Self::Implementation => "implementation",
            Self::Testing => "testing",
            Self::Optimization => "optimization",
            Self::Delivery => "delivery",
        }
    }

    /// Minimum L-Score composite required to pass this phase's gate.
    pub const fn threshold(&self) -> f64 {
        match self {
            Self::Understanding => 0.75,
            Self::Exploration => 0.78,
            Self::Architecture => 0.82,
            Self::Implementation => 0.85,
            Self::Testing => 0.88,
            Self::Optimization => 0.92,
            Self::Delivery => 0.95,
        }
    }

    /// The phase that follows this one, if any.
    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1).ok()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {}: {}", self.number(), self.name())
    }
}

impl TryFrom<u8> for Phase {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value)
    }
}

/// Threshold for a phase given by number.
///
/// Unknown phase numbers are a configuration error, never defaulted.
pub fn get_phase_threshold(phase_number: u8) -> DomainResult<f64> {
    Phase::from_number(phase_number).map(|p| p.threshold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_strictly_increasing() {
        let thresholds: Vec<f64> = (1..=7).map(|n| get_phase_threshold(n).unwrap()).collect();
        for pair in thresholds.windows(2) {
            assert!(pair[0] < pair[1], "{} should be below {}", pair[0], pair[1]);
        }
        assert!((thresholds[0] - 0.75).abs() < f64::EPSILON);
        assert!((thresholds[6] - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_number_round_trip() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_number(phase.number()).unwrap(), phase);
            assert_eq!(Phase::parse_str(phase.name()).unwrap(), phase);
        }
    }

    #[test]
    fn test_unknown_phase_rejected() {
        assert!(matches!(Phase::from_number(0), Err(DomainError::UnknownPhase(0))));
        assert!(matches!(Phase::from_number(8), Err(DomainError::UnknownPhase(8))));
        assert!(Phase::parse_str("deployment").is_err());
    }

    #[test]
    fn test_display_and_next() {
        assert_eq!(Phase::Implementation.to_string(), "Phase 4: implementation");
        assert_eq!(Phase::Testing.next(), Some(Phase::Optimization));
        assert_eq!(Phase::Delivery.next(), None);
    }
}
