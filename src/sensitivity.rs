//! Seeded Monte-Carlo sensitivity around the deterministic forecast
//!
//! Opt-in only. Each path perturbs the scenario's revenue series with
//! multiplicative shocks drawn from its own ChaCha stream, then re-runs the
//! deterministic pipeline downstream of revenue. The same seed always gives
//! the same summary, however rayon schedules the paths.

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::advisory::Runway;
use crate::error::{ensure_finite, ForecastError, ForecastResult};
use crate::projection::EngineInputs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    /// Number of simulated paths
    pub paths: u32,
    pub seed: u64,
    /// Maximum relative revenue shock per month, in [0, 1)
    pub revenue_volatility: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            paths: 500,
            seed: 42,
            revenue_volatility: 0.15,
        }
    }
}

impl SensitivityConfig {
    fn validate(&self) -> ForecastResult<()> {
        if self.paths == 0 {
            return Err(ForecastError::invalid_input("paths", "must be at least 1"));
        }
        ensure_finite("revenue_volatility", self.revenue_volatility)?;
        if !(0.0..1.0).contains(&self.revenue_volatility) {
            return Err(ForecastError::invalid_input("revenue_volatility", "must be in [0, 1)"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySummary {
    pub paths: u32,
    pub seed: u64,
    pub p5_final_balance: f64,
    pub p50_final_balance: f64,
    pub p95_final_balance: f64,
    /// Share of paths whose post-transfer balance goes below zero in any month
    pub probability_negative_balance: f64,
    pub median_runway: Runway,
}

struct PathOutcome {
    final_balance: f64,
    went_negative: bool,
    runway_months: f64,
}

/// Nearest-rank percentile of an ascending slice
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

pub fn run_sensitivity(inputs: &EngineInputs, config: &SensitivityConfig) -> ForecastResult<SensitivitySummary> {
    config.validate()?;

    let engine = inputs.engine();
    let scenario = inputs.assumptions.scenarios.get(inputs.config.scenario);
    let base_revenue = engine.scenario_revenue(&scenario);
    let volatility = config.revenue_volatility;

    let outcomes = (0..config.paths)
        .into_par_iter()
        .map(|path| -> ForecastResult<PathOutcome> {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(path as u64));
            let shocked: Vec<f64> = base_revenue
                .iter()
                .map(|revenue| revenue * (1.0 + rng.gen_range(-volatility..=volatility)))
                .collect();

            let result = engine.project_revenue(&shocked, inputs.cash_on_hand)?;
            Ok(PathOutcome {
                final_balance: result.final_balance(),
                went_negative: result
                    .transfers
                    .balance_timeline
                    .iter()
                    .any(|b| b.balance_after_transfer < 0.0),
                runway_months: result.kpis.runway.months(),
            })
        })
        .collect::<ForecastResult<Vec<_>>>()?;

    let mut finals: Vec<f64> = outcomes.iter().map(|o| o.final_balance).collect();
    finals.sort_by(|a, b| a.total_cmp(b));
    let mut runways: Vec<f64> = outcomes.iter().map(|o| o.runway_months).collect();
    runways.sort_by(|a, b| a.total_cmp(b));

    let negative = outcomes.iter().filter(|o| o.went_negative).count();
    let median_runway = percentile(&runways, 0.5);

    let summary = SensitivitySummary {
        paths: config.paths,
        seed: config.seed,
        p5_final_balance: percentile(&finals, 0.05),
        p50_final_balance: percentile(&finals, 0.50),
        p95_final_balance: percentile(&finals, 0.95),
        probability_negative_balance: negative as f64 / config.paths as f64,
        median_runway: if median_runway.is_finite() {
            Runway::Finite(median_runway)
        } else {
            Runway::Infinite
        },
    };

    info!(
        "sensitivity: {} paths, P5/P50/P95 final balance {:.0}/{:.0}/{:.0}",
        summary.paths, summary.p5_final_balance, summary.p50_final_balance, summary.p95_final_balance
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Assumptions, CostModel, ScenarioCatalog, SeasonalProfile};
    use crate::projection::ProjectionConfig;
    use approx::assert_relative_eq;

    fn inputs(cash: f64) -> EngineInputs {
        let assumptions = Assumptions::new(
            SeasonalProfile::flat(),
            CostModel::new(65_732.0, 0.0962).unwrap(),
            ScenarioCatalog::standard(),
            127_468.0,
        )
        .unwrap();
        EngineInputs::new(assumptions, ProjectionConfig::default(), cash)
    }

    #[test]
    fn test_same_seed_same_summary() {
        let config = SensitivityConfig { paths: 64, seed: 7, revenue_volatility: 0.2 };
        let first = run_sensitivity(&inputs(150_000.0), &config).unwrap();
        let second = run_sensitivity(&inputs(150_000.0), &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_percentiles_ordered() {
        let config = SensitivityConfig { paths: 200, seed: 11, revenue_volatility: 0.3 };
        let summary = run_sensitivity(&inputs(100_000.0), &config).unwrap();

        assert!(summary.p5_final_balance <= summary.p50_final_balance);
        assert!(summary.p50_final_balance <= summary.p95_final_balance);
        assert!((0.0..=1.0).contains(&summary.probability_negative_balance));
    }

    #[test]
    fn test_zero_volatility_matches_deterministic_core() {
        let inputs = inputs(120_000.0);
        let deterministic = inputs.run().unwrap();
        let config = SensitivityConfig { paths: 8, seed: 1, revenue_volatility: 0.0 };
        let summary = run_sensitivity(&inputs, &config).unwrap();

        assert_relative_eq!(summary.p5_final_balance, deterministic.final_balance());
        assert_relative_eq!(summary.p95_final_balance, deterministic.final_balance());
        assert_eq!(summary.median_runway, deterministic.kpis.runway);
    }

    #[test]
    fn test_invalid_config() {
        let zero_paths = SensitivityConfig { paths: 0, ..Default::default() };
        assert!(run_sensitivity(&inputs(0.0), &zero_paths).is_err());

        let wild = SensitivityConfig { revenue_volatility: 1.5, ..Default::default() };
        assert!(run_sensitivity(&inputs(0.0), &wild).is_err());
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 0.5), 3.0);
        assert_eq!(percentile(&sorted, 1.0), 5.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }
}
