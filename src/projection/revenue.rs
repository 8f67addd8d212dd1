//! Scenario revenue series: level multiplier, compounding growth, seasonality

use chrono::NaiveDate;
use log::debug;

use crate::assumptions::{ScenarioConfig, SeasonalProfile};
use crate::calendar::CalendarMonth;

/// Produces monthly revenue for a scenario
///
/// Fully deterministic: identical inputs always give identical series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioRevenueGenerator {
    /// Calendar month of projection step 0
    start_month: CalendarMonth,
}

impl ScenarioRevenueGenerator {
    pub fn new(start_month: CalendarMonth) -> Self {
        Self { start_month }
    }

    /// Projection begins the calendar month after `as_of`
    pub fn starting_after(as_of: NaiveDate) -> Self {
        Self::new(CalendarMonth::of(as_of).next())
    }

    /// Calendar month of projection step `i` (0-based)
    pub fn calendar_month(&self, step: u32) -> CalendarMonth {
        self.start_month.plus(step)
    }

    /// Revenue for each of `horizon_months` months
    ///
    /// `revenue_i = base * level * (1 + growth)^i * factor(month_i)`, with the
    /// factor omitted when no profile is given. A zero base yields a zero series.
    pub fn generate(
        &self,
        base_revenue: f64,
        config: &ScenarioConfig,
        horizon_months: u32,
        seasonality: Option<&SeasonalProfile>,
    ) -> Vec<f64> {
        if base_revenue <= 0.0 {
            debug!("{}: no base revenue, zero-filled series", config.name);
            return vec![0.0; horizon_months as usize];
        }

        let level = base_revenue * config.level_multiplier;
        let growth = 1.0 + config.monthly_growth;

        (0..horizon_months)
            .map(|step| {
                let trend = level * growth.powi(step as i32);
                match seasonality {
                    Some(profile) => trend * profile.factor(self.calendar_month(step)),
                    None => trend,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{ScenarioCatalog, ScenarioName};
    use approx::assert_relative_eq;

    fn moderate() -> ScenarioConfig {
        ScenarioConfig::new(ScenarioName::Moderate, 1.0, 0.01)
    }

    #[test]
    fn test_compounding_without_seasonality() {
        let generator = ScenarioRevenueGenerator::new(CalendarMonth::January);
        let series = generator.generate(100_000.0, &moderate(), 3, None);

        assert_eq!(series.len(), 3);
        assert_relative_eq!(series[0], 100_000.0);
        assert_relative_eq!(series[1], 101_000.0);
        assert_relative_eq!(series[2], 102_010.0, epsilon = 1e-9);
    }

    #[test]
    fn test_level_multiplier() {
        let generator = ScenarioRevenueGenerator::new(CalendarMonth::January);
        let config = ScenarioConfig::new(ScenarioName::Conservative, 0.8, 0.0);
        let series = generator.generate(100_000.0, &config, 4, None);
        assert!(series.iter().all(|&r| (r - 80_000.0).abs() < 1e-9));
    }

    #[test]
    fn test_seasonality_starts_next_month() {
        let as_of = NaiveDate::from_ymd_opt(2025, 11, 18).unwrap();
        let generator = ScenarioRevenueGenerator::starting_after(as_of);
        assert_eq!(generator.calendar_month(0), CalendarMonth::December);
        assert_eq!(generator.calendar_month(1), CalendarMonth::January);

        let profile = SeasonalProfile::flat()
            .with_override(CalendarMonth::December, 0.5)
            .unwrap()
            .with_override(CalendarMonth::January, 1.5)
            .unwrap();
        let config = ScenarioConfig::new(ScenarioName::Moderate, 1.0, 0.0);
        let series = generator.generate(100_000.0, &config, 3, Some(&profile));

        assert_relative_eq!(series[0], 50_000.0);
        assert_relative_eq!(series[1], 150_000.0);
        assert_relative_eq!(series[2], 100_000.0);
    }

    #[test]
    fn test_zero_base_is_zero_series() {
        let generator = ScenarioRevenueGenerator::new(CalendarMonth::March);
        let series = generator.generate(0.0, &moderate(), 6, Some(&SeasonalProfile::flat()));
        assert_eq!(series, vec![0.0; 6]);
    }

    #[test]
    fn test_deterministic() {
        let generator = ScenarioRevenueGenerator::new(CalendarMonth::June);
        let profile = SeasonalProfile::from_factors([
            1.15, 0.85, 1.05, 0.95, 1.10, 1.20, 1.08, 0.92, 1.03, 1.12, 0.98, 1.18,
        ])
        .unwrap();
        let first = generator.generate(127_468.0, &moderate(), 12, Some(&profile));
        let second = generator.generate(127_468.0, &moderate(), 12, Some(&profile));
        assert_eq!(first, second);
    }

    #[test]
    fn test_scenarios_never_cross() {
        let generator = ScenarioRevenueGenerator::new(CalendarMonth::October);
        let catalog = ScenarioCatalog::standard();
        let profile = SeasonalProfile::flat().with_december_smoothing();

        let series: Vec<Vec<f64>> = ScenarioName::ALL
            .iter()
            .map(|&name| generator.generate(150_000.0, &catalog.get(name), 12, Some(&profile)))
            .collect();

        for month in 0..12 {
            assert!(series[2][month] >= series[1][month]);
            assert!(series[1][month] >= series[0][month]);
        }
    }
}
