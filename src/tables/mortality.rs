//! Mortality table based on the 2017 CSO select-and-ultimate table
//!
//! Rates are annual probabilities of death by attained age, stored as
//! `(female, male)` pairs indexed by age. The last tabulated age is the
//! ceiling: any older age reuses its rate.

use crate::error::{PricingError, Result};
use crate::policy::Gender;

/// Annual mortality rates by age with a clamped ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct MortalityTable {
    /// Annual rates by age (index = age), stored as (female_rate, male_rate)
    rates: Vec<(f64, f64)>,
}

impl MortalityTable {
    /// Built-in 2017 CSO rates, ages 0 through 80
    pub fn cso_2017() -> Self {
        Self {
            rates: Self::cso_2017_rates(),
        }
    }

    /// Build a table from `(female, male)` rates indexed by age
    pub fn from_rates(rates: Vec<(f64, f64)>) -> Result<Self> {
        if rates.is_empty() {
            return Err(PricingError::ConfigurationAbsent(
                "mortality table has no ages".to_string(),
            ));
        }

        for (age, &(female, male)) in rates.iter().enumerate() {
            if !(0.0..=1.0).contains(&female) || !(0.0..=1.0).contains(&male) {
                return Err(PricingError::InvalidConfiguration(format!(
                    "mortality rate at age {} outside [0, 1]",
                    age
                )));
            }
        }

        Ok(Self { rates })
    }

    /// Highest tabulated age
    pub fn max_age(&self) -> u32 {
        (self.rates.len() - 1) as u32
    }

    /// Annual probability of death at `attained_age`, clamped to the ceiling age
    pub fn annual_rate(&self, attained_age: u32, gender: Gender) -> f64 {
        let age = attained_age.min(self.max_age()) as usize;
        let (female_rate, male_rate) = self.rates[age];

        match gender {
            Gender::Female => female_rate,
            Gender::Male => male_rate,
        }
    }

    /// Probability of surviving `years` full years from `attained_age`
    pub fn survival_probability(&self, attained_age: u32, gender: Gender, years: u32) -> f64 {
        (0..years)
            .map(|t| 1.0 - self.annual_rate(attained_age.saturating_add(t), gender))
            .product()
    }

    fn cso_2017_rates() -> Vec<(f64, f64)> {
        vec![
            // Age 0-9
            (0.0006, 0.00072), (0.000255, 0.0003), (0.000242, 0.000285), (0.000229, 0.00027), (0.000217, 0.000255), (0.000204, 0.00024), (0.000191, 0.000225), (0.000178, 0.00021), (0.000166, 0.000195), (0.000153, 0.00018),
            // Age 10-19
            (0.00014, 0.000165), (0.000158, 0.00022), (0.000176, 0.000275), (0.000194, 0.00033), (0.000212, 0.000385), (0.00023, 0.00044), (0.000248, 0.000495), (0.000266, 0.00055), (0.000284, 0.000605), (0.000302, 0.00066),
            // Age 20-29
            (0.00032, 0.000715), (0.000338, 0.00077), (0.000356, 0.000825), (0.000374, 0.00088), (0.000392, 0.000935), (0.00041, 0.00099), (0.000696, 0.00099), (0.000756, 0.00105), (0.00082, 0.001139), (0.000891, 0.001237),
            // Age 30-39
            (0.000967, 0.001343), (0.001049, 0.001457), (0.001139, 0.001582), (0.001236, 0.001717), (0.001342, 0.001864), (0.001457, 0.002023), (0.001581, 0.002196), (0.001716, 0.002384), (0.001863, 0.002587), (0.002022, 0.002808),
            // Age 40-49
            (0.002195, 0.003048), (0.002382, 0.003309), (0.002586, 0.003592), (0.002807, 0.003898), (0.003047, 0.004232), (0.003307, 0.004593), (0.00359, 0.004986), (0.003897, 0.005412), (0.00423, 0.005874), (0.004591, 0.006376),
            // Age 50-59
            (0.004983, 0.006921), (0.005409, 0.007513), (0.005871, 0.008155), (0.006373, 0.008852), (0.006918, 0.009608), (0.007509, 0.010429), (0.008151, 0.01132), (0.008847, 0.012288), (0.009603, 0.013338), (0.010424, 0.014477),
            // Age 60-69
            (0.011314, 0.015715), (0.012281, 0.017057), (0.013331, 0.018515), (0.01447, 0.020097), (0.015707, 0.021815), (0.017049, 0.023679), (0.018506, 0.025703), (0.020087, 0.027899), (0.021804, 0.030283), (0.023667, 0.032871),
            // Age 70-79
            (0.02569, 0.03568), (0.027885, 0.038729), (0.030268, 0.042039), (0.032854, 0.045631), (0.035662, 0.049531), (0.03871, 0.053763), (0.042017, 0.058358), (0.045608, 0.063345), (0.049506, 0.068758), (0.053736, 0.074633),
            // Age 80
            (0.058328, 0.081011),
        ]
    }
}
