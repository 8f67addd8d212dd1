//! Forecasting assumptions: seasonality, cost structure, and scenarios

mod costs;
mod scenarios;
mod seasonality;
pub mod loader;

pub use costs::{
    CostBreakdown, CostCategory, CostModel, CostSanityBand, CostSubstitution, DEFAULT_FIXED_COSTS,
    DEFAULT_VARIABLE_RATE,
};
pub use loader::LoadedAssumptions;
pub use scenarios::{ScenarioCatalog, ScenarioConfig, ScenarioName};
pub use seasonality::{SeasonalProfile, DECEMBER_OVERRIDE_FACTOR};

use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ensure_finite, ForecastError, ForecastResult};
use crate::history::{load_history, HistoricalDataset, DEFAULT_HISTORY_PATH};

/// Number of trailing months averaged into the baseline revenue
pub const BASELINE_TRAILING_MONTHS: usize = 6;

/// Container for all forecasting assumptions
///
/// Derived once per dataset; rebuild it whenever the history or cost
/// breakdown changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub seasonality: SeasonalProfile,
    pub costs: CostModel,
    pub scenarios: ScenarioCatalog,
    /// Current monthly revenue level that scenarios scale from
    pub baseline_revenue: f64,
    /// Fallbacks applied while ingesting the cost breakdown
    pub cost_substitutions: Vec<CostSubstitution>,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::no_data()
    }
}

impl Assumptions {
    /// Empty state before any data is loaded
    pub fn no_data() -> Self {
        Self {
            seasonality: SeasonalProfile::flat(),
            costs: CostModel::zero(),
            scenarios: ScenarioCatalog::standard(),
            baseline_revenue: 0.0,
            cost_substitutions: Vec::new(),
        }
    }

    /// Build from explicit values
    pub fn new(
        seasonality: SeasonalProfile,
        costs: CostModel,
        scenarios: ScenarioCatalog,
        baseline_revenue: f64,
    ) -> ForecastResult<Self> {
        ensure_finite("baseline_revenue", baseline_revenue)?;
        if baseline_revenue < 0.0 {
            return Err(ForecastError::invalid_input("baseline_revenue", "cannot be negative"));
        }
        Ok(Self {
            seasonality,
            costs,
            scenarios,
            baseline_revenue,
            cost_substitutions: Vec::new(),
        })
    }

    /// Derive seasonality and baseline revenue from history, costs from a breakdown
    pub fn from_history(
        dataset: &HistoricalDataset,
        breakdown: &CostBreakdown,
        band: &CostSanityBand,
    ) -> Self {
        let (costs, cost_substitutions) = breakdown.to_cost_model(band);
        let assumptions = Self {
            seasonality: SeasonalProfile::from_history(dataset),
            costs,
            scenarios: ScenarioCatalog::standard(),
            baseline_revenue: dataset.baseline_revenue(BASELINE_TRAILING_MONTHS),
            cost_substitutions,
        };

        if assumptions.is_no_data() {
            info!("no revenue or cost data loaded; forecasts will be zero");
        }
        assumptions
    }

    /// Load history and assumption files from the default locations
    pub fn from_csv() -> ForecastResult<Self> {
        Self::from_csv_path(Path::new(DEFAULT_HISTORY_PATH), Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load history from a file and assumption files from a directory
    pub fn from_csv_path(history_path: &Path, assumptions_path: &Path) -> ForecastResult<Self> {
        let dataset = load_history(history_path)?;
        let loaded = LoadedAssumptions::load_from(assumptions_path)?;

        let mut assumptions = Self::from_history(&dataset, &loaded.cost_breakdown, &CostSanityBand::default());
        assumptions.seasonality = assumptions.seasonality.with_overrides(&loaded.seasonal_overrides)?;
        assumptions.scenarios = loaded.scenario_catalog;
        Ok(assumptions)
    }

    /// True when neither revenue nor costs are available
    pub fn is_no_data(&self) -> bool {
        self.baseline_revenue == 0.0 && self.costs.is_zero()
    }

    /// Burn rate at the baseline revenue level
    pub fn burn_rate(&self) -> f64 {
        self.costs.burn_rate(self.baseline_revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RevenueRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    #[test]
    fn test_no_data() {
        let assumptions = Assumptions::no_data();
        assert!(assumptions.is_no_data());
        assert_eq!(assumptions.burn_rate(), 0.0);
    }

    #[test]
    fn test_from_history() {
        let records = (1..=12)
            .map(|m| RevenueRecord::new(NaiveDate::from_ymd_opt(2024, m, 1).unwrap(), 100_000.0, None))
            .collect();
        let breakdown = CostBreakdown::new(
            vec![CostCategory { name: "Salaries".into(), monthly_amount: 60_000.0 }],
            0.1,
        );

        let assumptions = Assumptions::from_history(
            &HistoricalDataset::new(records),
            &breakdown,
            &CostSanityBand::default(),
        );

        assert!(!assumptions.is_no_data());
        assert_relative_eq!(assumptions.baseline_revenue, 100_000.0);
        assert_relative_eq!(assumptions.burn_rate(), 70_000.0);
        assert_eq!(assumptions.seasonality, SeasonalProfile::flat());
        assert!(assumptions.cost_substitutions.is_empty());
    }

    #[test]
    fn test_new_rejects_negative_baseline() {
        let result = Assumptions::new(
            SeasonalProfile::flat(),
            CostModel::zero(),
            ScenarioCatalog::standard(),
            -5.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_csv_defaults() {
        let assumptions = Assumptions::from_csv().expect("Failed to load default data");
        assert!(assumptions.baseline_revenue > 0.0);
        assert!(assumptions.burn_rate() > assumptions.costs.fixed_costs());
        assert!(assumptions.cost_substitutions.is_empty());
    }
}
