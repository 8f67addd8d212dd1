//! Scenario runner for repeated what-if forecasts
//!
//! Derives assumptions once, then runs any number of forecasts with
//! different configurations without re-reading CSV files.

use std::path::Path;

use rayon::prelude::*;

use crate::assumptions::{Assumptions, ScenarioName};
use crate::error::ForecastResult;
use crate::projection::{ForecastEngine, ProjectionConfig, ProjectionResult};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// // All three scenarios for one cash position
/// let results = runner.run_all(&ProjectionConfig::default(), 250_000.0)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Runner in the no-data state
    pub fn new() -> Self {
        Self::default()
    }

    /// Load history and assumptions from the default data files
    pub fn from_csv() -> ForecastResult<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    pub fn from_csv_path(history_path: &Path, assumptions_path: &Path) -> ForecastResult<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv_path(history_path, assumptions_path)?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Forecast the scenario named in `config`
    pub fn run(&self, config: ProjectionConfig, cash_on_hand: f64) -> ForecastResult<ProjectionResult> {
        ForecastEngine::new(self.base_assumptions.clone(), config).project(cash_on_hand)
    }

    /// Conservative, Moderate and Optimistic, in that order
    pub fn run_all(&self, config: &ProjectionConfig, cash_on_hand: f64) -> ForecastResult<Vec<ProjectionResult>> {
        let configs: Vec<ProjectionConfig> = ScenarioName::ALL
            .iter()
            .map(|&scenario| ProjectionConfig { scenario, ..config.clone() })
            .collect();
        self.run_scenarios(&configs, cash_on_hand)
    }

    /// One forecast per config, run in parallel; output order matches input
    pub fn run_scenarios(
        &self,
        configs: &[ProjectionConfig],
        cash_on_hand: f64,
    ) -> ForecastResult<Vec<ProjectionResult>> {
        configs
            .par_iter()
            .map(|config| self.run(config.clone(), cash_on_hand))
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }
}
