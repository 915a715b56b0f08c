//! Lifestyle rating: tobacco, alcohol and hazardous pursuits

use super::{Applicant, FactorAssessment};
use crate::format;
use crate::tables::{SmokingStatus, UnderwritingRules};

pub(super) fn assess(rules: &UnderwritingRules, applicant: &Applicant) -> FactorAssessment {
    let mut assessment = FactorAssessment::neutral();

    let smoking = applicant.smoking_status;
    if smoking != SmokingStatus::NonSmoker {
        if let Some(rule) = rules.smoking_rule(smoking) {
            assessment.apply(
                rule.multiplier,
                format!(
                    "Smoking: {} ({}x multiplier)",
                    smoking.as_str(),
                    format::multiplier(rule.multiplier)
                ),
            );
        }
    }

    let alcohol = applicant.alcohol_use;
    if let Some(rule) = rules.alcohol_rule(alcohol) {
        if rule.multiplier > 1.0 {
            assessment.apply(
                rule.multiplier,
                format!(
                    "Alcohol use: {} ({}x multiplier)",
                    alcohol.as_str(),
                    format::multiplier(rule.multiplier)
                ),
            );
        } else {
            assessment.apply_silently(rule.multiplier);
        }
    }

    for activity in &applicant.hazardous_activities {
        if let Some(rule) = rules.hazardous_activity_rule(activity) {
            assessment.apply(
                rule.multiplier,
                format!(
                    "Hazardous activity: {} ({}x multiplier)",
                    activity,
                    format::multiplier(rule.multiplier)
                ),
            );
        }
    }

    assessment
}
