//! Present value engine: discounting, benefit PVs and premium annuities

mod discount;
mod present_value;

pub use discount::{DiscountRate, DEFAULT_DISCOUNT_RATE};
pub use present_value::{net_premium, BenefitPeriod, PresentValueEngine, DISABILITY_END_AGE};
