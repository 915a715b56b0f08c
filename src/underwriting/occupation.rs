//! Occupation rating by class, with an extra load for older manual workers

use super::{Applicant, FactorAssessment};
use crate::format;
use crate::tables::UnderwritingRules;

/// Loading for class 4+ occupations once the applicant is over 50
pub const OLDER_WORKER_ADJUSTMENT: f64 = 1.2;

pub const OLDER_WORKER_AGE: u32 = 50;

/// Lowest class number treated as manual or hazardous work
pub const MANUAL_CLASS_THRESHOLD: u8 = 4;

pub(super) fn assess(rules: &UnderwritingRules, applicant: &Applicant) -> FactorAssessment {
    let mut assessment = FactorAssessment::neutral();

    if let Some(rule) = rules.occupation_rule(applicant.occupation()) {
        if rule.multiplier != 1.0 {
            assessment.apply(
                rule.multiplier,
                format!(
                    "Occupation: {} - Class {} ({}x)",
                    applicant.occupation_title,
                    applicant.occupation_class,
                    format::multiplier(rule.multiplier)
                ),
            );
        }
    }

    if applicant.occupation_class >= MANUAL_CLASS_THRESHOLD && applicant.age > OLDER_WORKER_AGE {
        assessment.apply(
            OLDER_WORKER_ADJUSTMENT,
            format!(
                "Age + hazardous occupation adjustment: {}x",
                format::multiplier(OLDER_WORKER_ADJUSTMENT)
            ),
        );
    }

    assessment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Gender;
    use approx::assert_relative_eq;

    fn worker(age: u32, class: u8, title: &str) -> Applicant {
        let mut applicant = Applicant::new(age, Gender::Male);
        applicant.occupation_class = class;
        applicant.occupation_title = title.to_string();
        applicant
    }

    #[test]
    fn test_standard_class_is_silent() {
        let rules = UnderwritingRules::standard();
        let result = assess(&rules, &worker(40, 2, "Clerk"));
        assert_eq!(result.multiplier, 1.0);
        assert!(result.factors.is_empty());
    }

    #[test]
    fn test_professional_discount() {
        let rules = UnderwritingRules::standard();
        let result = assess(&rules, &worker(40, 1, "Actuary"));
        assert_relative_eq!(result.multiplier, 0.9);
        assert_eq!(result.factors, vec!["Occupation: Actuary - Class 1 (0.9x)".to_string()]);
    }

    #[test]
    fn test_older_manual_worker() {
        let rules = UnderwritingRules::standard();

        let result = assess(&rules, &worker(51, 4, "Roofer"));
        assert_relative_eq!(result.multiplier, 1.4 * 1.2);
        assert_eq!(result.factors.len(), 2);

        let younger = assess(&rules, &worker(50, 4, "Roofer"));
        assert_relative_eq!(younger.multiplier, 1.4);
    }

    #[test]
    fn test_out_of_range_class_rates_hazardous() {
        let rules = UnderwritingRules::standard();
        let result = assess(&rules, &worker(30, 7, "Stunt performer"));
        assert_relative_eq!(result.multiplier, 2.0);
        assert_eq!(result.factors, vec!["Occupation: Stunt performer - Class 7 (2.0x)".to_string()]);
    }
}
