//! Liquidity advice derived from a projected balance timeline

mod kpi;
mod runway;
mod surplus;

pub use kpi::{margin, percent_change, KpiSnapshot, KpiVariation};
pub use runway::{Runway, RunwayEstimator};
pub use surplus::{
    investable_amount, minimum_reserve, InvestmentRecommendation, SurplusAdvisor,
    DEFAULT_ANNUAL_YIELD,
};
