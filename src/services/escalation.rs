//! Escalation policy: retry count to investigation tier.

use crate::domain::models::{EscalationConfig, InvestigationTier};

/// Maps how many remediation rounds a phase has been through to the rigor
/// of its next investigation. Monotonic in the retry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    elevated_after: u32,
    deep_after: u32,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::new(&EscalationConfig::default())
    }
}

impl EscalationPolicy {
    /// Build from config. A deep threshold below the elevated one is raised
    /// to match it so the mapping stays monotonic.
    pub fn new(config: &EscalationConfig) -> Self {
        Self {
            elevated_after: config.elevated_after,
            deep_after: config.deep_after.max(config.elevated_after),
        }
    }

    pub fn tier_for(&self, retry_count: u32) -> InvestigationTier {
        if retry_count >= self.deep_after {
            InvestigationTier::Deep
        } else if retry_count >= self.elevated_after {
            InvestigationTier::Elevated
        } else {
            InvestigationTier::Routine
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let policy = EscalationPolicy::default();
        assert_eq!(policy.tier_for(0), InvestigationTier::Routine);
        assert_eq!(policy.tier_for(1), InvestigationTier::Elevated);
        assert_eq!(policy.tier_for(2), InvestigationTier::Deep);
        assert_eq!(policy.tier_for(40), InvestigationTier::Deep);
    }

    #[test]
    fn test_monotonic_in_retry_count() {
        let policy = EscalationPolicy::new(&EscalationConfig {
            elevated_after: 2,
            deep_after: 5,
        });
        let tiers: Vec<_> = (0..10).map(|r| policy.tier_for(r)).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(tiers[1], InvestigationTier::Routine);
        assert_eq!(tiers[4], InvestigationTier::Elevated);
    }

    #[test]
    fn test_inverted_config_is_normalized() {
        let policy = EscalationPolicy::new(&EscalationConfig {
            elevated_after: 3,
            deep_after: 1,
        });
        assert_eq!(policy.tier_for(1), InvestigationTier::Routine);
        assert_eq!(policy.tier_for(3), InvestigationTier::Deep);
    }
}
