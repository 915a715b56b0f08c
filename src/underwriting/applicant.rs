//! Applicant data consumed by underwriting and critical illness pricing

use serde::{Deserialize, Serialize};

use crate::policy::Gender;
use crate::tables::{AlcoholUse, OccupationClass, SmokingStatus};

fn default_occupation_class() -> u8 {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub age: u32,
    pub gender: Gender,

    #[serde(default)]
    pub medical_conditions: Vec<String>,

    /// Height in inches and weight in pounds; BMI is rated only when both are given
    #[serde(default)]
    pub height_inches: Option<f64>,
    #[serde(default)]
    pub weight_lbs: Option<f64>,

    #[serde(default)]
    pub smoking_status: SmokingStatus,
    #[serde(default)]
    pub alcohol_use: AlcoholUse,
    #[serde(default)]
    pub hazardous_activities: Vec<String>,

    /// Reported occupation class, 1 (professional) through 5 (hazardous)
    #[serde(default = "default_occupation_class")]
    pub occupation_class: u8,
    #[serde(default)]
    pub occupation_title: String,

    #[serde(default)]
    pub annual_income: f64,
    #[serde(default)]
    pub net_worth: f64,
    #[serde(default)]
    pub total_debt: f64,
}

impl Applicant {
    /// Applicant with no medical, lifestyle or financial history on file
    pub fn new(age: u32, gender: Gender) -> Self {
        Self {
            age,
            gender,
            medical_conditions: Vec::new(),
            height_inches: None,
            weight_lbs: None,
            smoking_status: SmokingStatus::NonSmoker,
            alcohol_use: AlcoholUse::ModerateUse,
            hazardous_activities: Vec::new(),
            occupation_class: default_occupation_class(),
            occupation_title: String::new(),
            annual_income: 0.0,
            net_worth: 0.0,
            total_debt: 0.0,
        }
    }

    pub fn occupation(&self) -> OccupationClass {
        OccupationClass::from_number(self.occupation_class)
    }

    /// `Some((height, weight))` when both measurements are present
    pub fn height_and_weight(&self) -> Option<(f64, f64)> {
        self.height_inches.zip(self.weight_lbs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_defaults() {
        let applicant: Applicant = serde_json::from_str(r#"{"age": 42, "gender": "female"}"#).unwrap();
        assert_eq!(applicant, Applicant::new(42, Gender::Female));
        assert_eq!(applicant.occupation(), OccupationClass::Standard);
        assert_eq!(applicant.height_and_weight(), None);
    }

    #[test]
    fn test_sample_applicant_file() {
        let text = std::fs::read_to_string("data/sample_applicant.json").unwrap();
        let applicant: Applicant = serde_json::from_str(&text).unwrap();
        assert_eq!(applicant.age, 35);
        assert_eq!(applicant.occupation(), OccupationClass::Professional);
        assert_eq!(applicant.height_and_weight(), Some((70.0, 180.0)));
        assert_eq!(applicant.medical_conditions, vec!["hypertension_controlled".to_string()]);
    }
}
