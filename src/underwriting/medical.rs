//! Medical rating: declared conditions, build (BMI) and age

use super::{Applicant, FactorAssessment};
use crate::format;
use crate::tables::UnderwritingRules;

/// Extra loading when an applicant over 60 has any medical condition
pub const SENIOR_CONDITION_ADJUSTMENT: f64 = 1.1;

/// Ages above this trigger the senior condition adjustment
pub const SENIOR_AGE: u32 = 60;

/// BMI used when the reported height is not positive
pub const FALLBACK_BMI: f64 = 25.0;

/// Body mass index from imperial measurements
pub fn body_mass_index(weight_lbs: f64, height_inches: f64) -> f64 {
    if height_inches <= 0.0 {
        return FALLBACK_BMI;
    }
    weight_lbs * 703.0 / (height_inches * height_inches)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiBand {
    Underweight,
    Normal,
    Overweight,
    ObeseClassI,
    ObeseClassII,
    ObeseClassIII,
}

impl BmiBand {
    /// Bands are closed below and open above: 25.0 is overweight
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiBand::Underweight
        } else if bmi < 25.0 {
            BmiBand::Normal
        } else if bmi < 30.0 {
            BmiBand::Overweight
        } else if bmi < 35.0 {
            BmiBand::ObeseClassI
        } else if bmi < 40.0 {
            BmiBand::ObeseClassII
        } else {
            BmiBand::ObeseClassIII
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            BmiBand::Underweight => 1.2,
            BmiBand::Normal => 1.0,
            BmiBand::Overweight => 1.1,
            BmiBand::ObeseClassI => 1.3,
            BmiBand::ObeseClassII => 2.0,
            BmiBand::ObeseClassIII => 3.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiBand::Underweight => "Underweight",
            BmiBand::Normal => "Normal",
            BmiBand::Overweight => "Overweight",
            BmiBand::ObeseClassI => "Obese Class I",
            BmiBand::ObeseClassII => "Obese Class II",
            BmiBand::ObeseClassIII => "Obese Class III",
        }
    }
}

pub(super) fn assess(rules: &UnderwritingRules, applicant: &Applicant) -> FactorAssessment {
    let mut assessment = FactorAssessment::neutral();

    for condition in &applicant.medical_conditions {
        match rules.medical_rule(condition) {
            Some(rule) => assessment.apply(
                rule.multiplier,
                format!("Medical: {} (Risk: {}x)", condition, format::multiplier(rule.multiplier)),
            ),
            None => assessment.apply(
                rules.medical_multiplier(condition),
                format!("Medical: {} (Unknown condition - conservative rating)", condition),
            ),
        }
    }

    if let Some((height, weight)) = applicant.height_and_weight() {
        let bmi = body_mass_index(weight, height);
        let band = BmiBand::from_bmi(bmi);
        if band == BmiBand::Normal {
            assessment.apply_silently(band.multiplier());
        } else {
            assessment.apply(
                band.multiplier(),
                format!(
                    "{} BMI: {:.1} ({}x multiplier)",
                    band.label(),
                    bmi,
                    format::multiplier(band.multiplier())
                ),
            );
        }
    }

    if !applicant.medical_conditions.is_empty() && applicant.age > SENIOR_AGE {
        assessment.apply(
            SENIOR_CONDITION_ADJUSTMENT,
            format!(
                "Age adjustment for medical conditions: {}x",
                format::multiplier(SENIOR_CONDITION_ADJUSTMENT)
            ),
        );
    }

    assessment
}
