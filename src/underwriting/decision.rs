//! Underwriting decision table

use serde::{Deserialize, Serialize};
use std::fmt;

/// Financial scores at or above this decline the application outright
pub const FINANCIAL_DECLINE_SCORE: f64 = 3.0;

pub const PREFERRED_LIMIT: f64 = 0.95;
pub const STANDARD_LIMIT: f64 = 1.2;
pub const SUBSTANDARD_LIMIT: f64 = 2.0;
pub const HIGH_RISK_LIMIT: f64 = 4.0;

/// Coverage cap for substandard risks up to 2.0x
pub const SUBSTANDARD_COVERAGE_CAP: f64 = 2_000_000.0;

/// Coverage cap for high risks up to 4.0x
pub const HIGH_RISK_COVERAGE_CAP: f64 = 500_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderwritingDecision {
    ApprovedPreferred,
    ApprovedStandard,
    ApprovedSubstandard,
    Declined,
    /// Reserved for cases needing more evidence; the rating rules never produce it
    Postponed,
}

impl UnderwritingDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnderwritingDecision::ApprovedPreferred => "approved_preferred",
            UnderwritingDecision::ApprovedStandard => "approved_standard",
            UnderwritingDecision::ApprovedSubstandard => "approved_substandard",
            UnderwritingDecision::Declined => "declined",
            UnderwritingDecision::Postponed => "postponed",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(
            self,
            UnderwritingDecision::ApprovedPreferred
                | UnderwritingDecision::ApprovedStandard
                | UnderwritingDecision::ApprovedSubstandard
        )
    }

    /// Title-case label for notes, e.g. "Approved Substandard"
    pub fn title(&self) -> &'static str {
        match self {
            UnderwritingDecision::ApprovedPreferred => "Approved Preferred",
            UnderwritingDecision::ApprovedStandard => "Approved Standard",
            UnderwritingDecision::ApprovedSubstandard => "Approved Substandard",
            UnderwritingDecision::Declined => "Declined",
            UnderwritingDecision::Postponed => "Postponed",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            UnderwritingDecision::ApprovedPreferred => {
                "Preferred risk classification - excellent health and lifestyle profile."
            }
            UnderwritingDecision::ApprovedStandard => {
                "Standard risk classification - acceptable risk profile within normal parameters."
            }
            UnderwritingDecision::ApprovedSubstandard => {
                "Substandard risk classification - elevated risk requiring premium adjustment and/or coverage limitations."
            }
            UnderwritingDecision::Declined => {
                "Application declined due to excessive risk factors or financial capacity limitations."
            }
            UnderwritingDecision::Postponed => {
                "Application postponed pending additional information or medical examination."
            }
        }
    }
}

impl fmt::Display for UnderwritingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decision and maximum approvable coverage; first matching row wins
pub fn decide(overall_risk: f64, financial_risk: f64, requested: f64) -> (UnderwritingDecision, f64) {
    if financial_risk >= FINANCIAL_DECLINE_SCORE {
        (UnderwritingDecision::Declined, 0.0)
    } else if overall_risk <= PREFERRED_LIMIT {
        (UnderwritingDecision::ApprovedPreferred, requested)
    } else if overall_risk <= STANDARD_LIMIT {
        (UnderwritingDecision::ApprovedStandard, requested)
    } else if overall_risk <= SUBSTANDARD_LIMIT {
        (UnderwritingDecision::ApprovedSubstandard, requested.min(SUBSTANDARD_COVERAGE_CAP))
    } else if overall_risk <= HIGH_RISK_LIMIT {
        (UnderwritingDecision::ApprovedSubstandard, requested.min(HIGH_RISK_COVERAGE_CAP))
    } else {
        (UnderwritingDecision::Declined, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_rows() {
        let requested = 3_000_000.0;
        assert_eq!(decide(0.9, 1.0, requested), (UnderwritingDecision::ApprovedPreferred, requested));
        assert_eq!(decide(0.95, 1.0, requested), (UnderwritingDecision::ApprovedPreferred, requested));
        assert_eq!(decide(1.2, 1.0, requested), (UnderwritingDecision::ApprovedStandard, requested));
        assert_eq!(decide(1.5, 1.0, requested), (UnderwritingDecision::ApprovedSubstandard, 2_000_000.0));
        assert_eq!(decide(2.0, 1.0, requested), (UnderwritingDecision::ApprovedSubstandard, 2_000_000.0));
        assert_eq!(decide(2.01, 1.0, requested), (UnderwritingDecision::ApprovedSubstandard, 500_000.0));
        assert_eq!(decide(4.0, 1.0, requested), (UnderwritingDecision::ApprovedSubstandard, 500_000.0));
        assert_eq!(decide(4.01, 1.0, requested), (UnderwritingDecision::Declined, 0.0));
    }

    #[test]
    fn test_financial_gate() {
        for overall in [0.5, 1.0, 1.5, 3.0, 10.0] {
            assert_eq!(decide(overall, 3.5, 100_000.0), (UnderwritingDecision::Declined, 0.0));
            assert_eq!(decide(overall, 3.0, 100_000.0).0, UnderwritingDecision::Declined);
        }
        // A score of 2.0 is informational only
        assert_eq!(decide(1.0, 2.0, 100_000.0).0, UnderwritingDecision::ApprovedStandard);
        assert_eq!(decide(1.0, 2.6, 100_000.0).0, UnderwritingDecision::ApprovedStandard);
    }

    #[test]
    fn test_approved_never_exceeds_requested() {
        for overall in [0.5, 1.0, 1.5, 2.0, 3.0, 4.0, 6.0] {
            for requested in [10_000.0, 400_000.0, 1_000_000.0, 9_000_000.0] {
                let (_, approved) = decide(overall, 1.0, requested);
                assert!(approved <= requested);
                assert!(approved >= 0.0);
            }
        }
        assert_eq!(decide(1.5, 1.0, 750_000.0).1, 750_000.0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&UnderwritingDecision::ApprovedSubstandard).unwrap();
        assert_eq!(json, "\"approved_substandard\"");
        assert!(!UnderwritingDecision::Postponed.is_approved());
        assert_eq!(UnderwritingDecision::ApprovedPreferred.title(), "Approved Preferred");
    }
}
