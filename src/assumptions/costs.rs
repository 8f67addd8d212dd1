//! Cost structure: fixed monthly costs plus a revenue-proportional variable rate

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ForecastError, ForecastResult};

/// Fallback fixed monthly costs when an extracted figure is implausible
pub const DEFAULT_FIXED_COSTS: f64 = 65_732.0;

/// Fallback variable cost rate (fraction of revenue)
pub const DEFAULT_VARIABLE_RATE: f64 = 0.0962;

/// Fixed monthly cost and variable cost rate
///
/// `burn_rate(revenue) = fixed_costs + revenue * variable_rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    fixed_costs: f64,
    variable_rate: f64,
}

impl CostModel {
    /// Create a cost model; `variable_rate` must lie in [0, 1)
    pub fn new(fixed_costs: f64, variable_rate: f64) -> ForecastResult<Self> {
        ensure_finite("fixed_costs", fixed_costs)?;
        ensure_finite("variable_rate", variable_rate)?;
        if fixed_costs < 0.0 {
            return Err(ForecastError::invalid_input("fixed_costs", "cannot be negative"));
        }
        if !(0.0..1.0).contains(&variable_rate) {
            return Err(ForecastError::invalid_input(
                "variable_rate",
                format!("must be in [0, 1), got {}", variable_rate),
            ));
        }
        Ok(Self { fixed_costs, variable_rate })
    }

    /// The "no data loaded" model
    pub fn zero() -> Self {
        Self {
            fixed_costs: 0.0,
            variable_rate: 0.0,
        }
    }

    /// Fallback model built from the documented defaults
    pub fn fallback() -> Self {
        Self {
            fixed_costs: DEFAULT_FIXED_COSTS,
            variable_rate: DEFAULT_VARIABLE_RATE,
        }
    }

    pub fn fixed_costs(&self) -> f64 {
        self.fixed_costs
    }

    pub fn variable_rate(&self) -> f64 {
        self.variable_rate
    }

    pub fn is_zero(&self) -> bool {
        self.fixed_costs == 0.0 && self.variable_rate == 0.0
    }

    /// Total monthly outflow at a revenue level
    pub fn burn_rate(&self, revenue: f64) -> f64 {
        self.fixed_costs + self.variable_costs(revenue)
    }

    /// Variable part of the burn at a revenue level
    pub fn variable_costs(&self, revenue: f64) -> f64 {
        revenue.max(0.0) * self.variable_rate
    }
}

/// A named fixed expense line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCategory {
    pub name: String,
    pub monthly_amount: f64,
}

/// Plausibility band for extracted cost figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSanityBand {
    pub min_fixed: f64,
    pub max_fixed: f64,
    pub max_variable_rate: f64,
}

impl Default for CostSanityBand {
    fn default() -> Self {
        Self {
            min_fixed: 10_000.0,
            max_fixed: 500_000.0,
            max_variable_rate: 0.5,
        }
    }
}

/// Record of a fallback applied during ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSubstitution {
    pub field: String,
    pub extracted: f64,
    pub substituted: f64,
}

/// Categorised fixed expenses plus a variable rate, as extracted from reports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub categories: Vec<CostCategory>,
    pub variable_rate: f64,
}

impl CostBreakdown {
    pub fn new(categories: Vec<CostCategory>, variable_rate: f64) -> Self {
        Self { categories, variable_rate }
    }

    pub fn total_fixed(&self) -> f64 {
        self.categories.iter().map(|c| c.monthly_amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.variable_rate == 0.0
    }

    /// Convert to a cost model, substituting fallbacks for implausible figures
    ///
    /// An empty breakdown maps to the zero model (no data), not to fallbacks.
    pub fn to_cost_model(&self, band: &CostSanityBand) -> (CostModel, Vec<CostSubstitution>) {
        if self.is_empty() {
            return (CostModel::zero(), Vec::new());
        }

        let mut substitutions = Vec::new();

        let extracted_fixed = self.total_fixed();
        let fixed_costs = if extracted_fixed.is_finite()
            && extracted_fixed >= band.min_fixed
            && extracted_fixed <= band.max_fixed
        {
            extracted_fixed
        } else {
            warn!(
                "fixed costs {:.2} outside [{:.2}, {:.2}], substituting {:.2}",
                extracted_fixed, band.min_fixed, band.max_fixed, DEFAULT_FIXED_COSTS
            );
            substitutions.push(CostSubstitution {
                field: "fixed_costs".to_string(),
                extracted: extracted_fixed,
                substituted: DEFAULT_FIXED_COSTS,
            });
            DEFAULT_FIXED_COSTS
        };

        let upper = band.max_variable_rate.min(1.0);
        let variable_rate = if self.variable_rate.is_finite()
            && self.variable_rate >= 0.0
            && self.variable_rate < upper
        {
            self.variable_rate
        } else {
            warn!(
                "variable rate {:.4} outside [0, {:.4}), substituting {:.4}",
                self.variable_rate, upper, DEFAULT_VARIABLE_RATE
            );
            substitutions.push(CostSubstitution {
                field: "variable_rate".to_string(),
                extracted: self.variable_rate,
                substituted: DEFAULT_VARIABLE_RATE,
            });
            DEFAULT_VARIABLE_RATE
        };

        (CostModel { fixed_costs, variable_rate }, substitutions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn category(name: &str, amount: f64) -> CostCategory {
        CostCategory {
            name: name.to_string(),
            monthly_amount: amount,
        }
    }

    #[test]
    fn test_reference_burn_rate() {
        let model = CostModel::new(65_732.0, 0.0962).unwrap();
        let burn = model.burn_rate(127_468.0);
        // 65,732 + 127,468 * 0.0962 = 77,994.42
        assert_relative_eq!(burn, 77_994.4216, epsilon = 1e-6);
        assert!((burn - 77_994.0).abs() < 1.0);
        assert_relative_eq!(model.variable_costs(127_468.0), 12_262.4216, epsilon = 1e-6);
        assert_eq!(model.variable_costs(-5_000.0), 0.0);
    }

    #[test]
    fn test_burn_rate_monotonic_and_floored() {
        let model = CostModel::new(10_000.0, 0.2).unwrap();
        let mut previous = model.burn_rate(0.0);
        assert_eq!(previous, 10_000.0);
        for step in 1..50 {
            let burn = model.burn_rate(step as f64 * 5_000.0);
            assert!(burn >= previous);
            assert!(burn >= model.fixed_costs());
            previous = burn;
        }
    }

    #[test]
    fn test_zero_model() {
        let model = CostModel::zero();
        assert!(model.is_zero());
        assert_eq!(model.burn_rate(150_000.0), 0.0);
    }

    #[test]
    fn test_new_validates() {
        assert!(CostModel::new(-1.0, 0.1).is_err());
        assert!(CostModel::new(1.0, 1.0).is_err());
        assert!(CostModel::new(1.0, -0.01).is_err());
        assert!(CostModel::new(f64::NAN, 0.1).is_err());
        assert!(CostModel::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_breakdown_within_band() {
        let breakdown = CostBreakdown::new(
            vec![category("Salaries", 40_000.0), category("Logistics", 15_000.0)],
            0.1,
        );
        let (model, substitutions) = breakdown.to_cost_model(&CostSanityBand::default());
        assert!(substitutions.is_empty());
        assert_relative_eq!(model.fixed_costs(), 55_000.0);
        assert_relative_eq!(model.variable_rate(), 0.1);
    }

    #[test]
    fn test_breakdown_falls_back_when_implausible() {
        // Extraction picked up an annual figure instead of a monthly one
        let breakdown = CostBreakdown::new(vec![category("Salaries", 4_800_000.0)], 0.9);
        let (model, substitutions) = breakdown.to_cost_model(&CostSanityBand::default());

        assert_eq!(model, CostModel::fallback());
        assert_eq!(substitutions.len(), 2);
        assert_eq!(substitutions[0].field, "fixed_costs");
        assert_eq!(substitutions[0].extracted, 4_800_000.0);
        assert_eq!(substitutions[1].field, "variable_rate");
    }

    #[test]
    fn test_empty_breakdown_is_no_data() {
        let (model, substitutions) = CostBreakdown::default().to_cost_model(&CostSanityBand::default());
        assert!(model.is_zero());
        assert!(substitutions.is_empty());
    }
}
