//! Seasonal revenue profile by calendar month
//!
//! Factor for a month = (average revenue of that calendar month across years)
//! / (average of all monthly revenue totals). Factors are expected to average
//! close to 1.0 but this is not enforced.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarMonth;
use crate::error::{ensure_finite, ForecastError, ForecastResult};
use crate::history::HistoricalDataset;

/// Business override for December
///
/// The derived December factor (0.289 in the reference history) was judged an
/// outlier and smoothed to this value. It is a judgement call, not a derived
/// statistic, so it is only applied on request.
pub const DECEMBER_OVERRIDE_FACTOR: f64 = 0.550;

/// Twelve month-to-factor ratios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    factors: [f64; 12],
}

impl Default for SeasonalProfile {
    fn default() -> Self {
        Self::flat()
    }
}

impl SeasonalProfile {
    /// No seasonality: every factor is 1.0
    pub fn flat() -> Self {
        Self { factors: [1.0; 12] }
    }

    /// Build from explicit factors (January first)
    pub fn from_factors(factors: [f64; 12]) -> ForecastResult<Self> {
        for (month, &factor) in CalendarMonth::ALL.iter().zip(factors.iter()) {
            validate_factor(*month, factor)?;
        }
        Ok(Self { factors })
    }

    /// Derive from historical revenue
    ///
    /// Months with no history keep the neutral 1.0. A zero grand average
    /// yields a flat profile rather than NaN factors.
    pub fn from_history(dataset: &HistoricalDataset) -> Self {
        let totals = dataset.monthly_totals();
        if totals.is_empty() {
            return Self::flat();
        }

        let grand_average = totals.iter().map(|m| m.revenue).sum::<f64>() / totals.len() as f64;
        if !grand_average.is_finite() || grand_average <= 0.0 {
            warn!("grand average revenue is {}, using flat seasonality", grand_average);
            return Self::flat();
        }

        let mut sums = [0.0_f64; 12];
        let mut counts = [0_u32; 12];
        for month in &totals {
            let idx = month.period.month.index();
            sums[idx] += month.revenue;
            counts[idx] += 1;
        }

        let mut factors = [1.0_f64; 12];
        for month in CalendarMonth::ALL {
            let idx = month.index();
            if counts[idx] == 0 {
                continue;
            }
            let factor = sums[idx] / counts[idx] as f64 / grand_average;
            if factor > 0.0 && factor.is_finite() {
                factors[idx] = factor;
            } else {
                warn!("{} factor {} is not positive, using 1.0", month, factor);
            }
        }

        Self { factors }
    }

    /// Factor for a calendar month
    pub fn factor(&self, month: CalendarMonth) -> f64 {
        self.factors[month.index()]
    }

    /// All factors, January first
    pub fn factors(&self) -> &[f64; 12] {
        &self.factors
    }

    /// Mean of the twelve factors (≈1.0 for a profile derived from full years)
    pub fn mean_factor(&self) -> f64 {
        self.factors.iter().sum::<f64>() / 12.0
    }

    /// Replace one month's factor with an explicit business override
    pub fn with_override(mut self, month: CalendarMonth, factor: f64) -> ForecastResult<Self> {
        validate_factor(month, factor)?;
        info!(
            "seasonal override for {}: {:.3} -> {:.3}",
            month,
            self.factors[month.index()],
            factor
        );
        self.factors[month.index()] = factor;
        Ok(self)
    }

    /// Apply several overrides in order
    pub fn with_overrides(self, overrides: &[(CalendarMonth, f64)]) -> ForecastResult<Self> {
        overrides
            .iter()
            .try_fold(self, |profile, &(month, factor)| profile.with_override(month, factor))
    }

    /// Apply the documented December smoothing
    pub fn with_december_smoothing(mut self) -> Self {
        info!(
            "smoothing December factor {:.3} -> {:.3}",
            self.factors[CalendarMonth::December.index()],
            DECEMBER_OVERRIDE_FACTOR
        );
        self.factors[CalendarMonth::December.index()] = DECEMBER_OVERRIDE_FACTOR;
        self
    }
}

fn validate_factor(month: CalendarMonth, factor: f64) -> ForecastResult<()> {
    ensure_finite("seasonal_factor", factor)?;
    if factor <= 0.0 {
        return Err(ForecastError::invalid_input(
            "seasonal_factor",
            format!("{} factor must be positive, got {}", month, factor),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RevenueRecord;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32, amount: f64) -> RevenueRecord {
        RevenueRecord::new(NaiveDate::from_ymd_opt(y, m, 1).unwrap(), amount, None)
    }

    #[test]
    fn test_flat_profile() {
        let profile = SeasonalProfile::flat();
        for month in CalendarMonth::ALL {
            assert_eq!(profile.factor(month), 1.0);
        }
        assert_eq!(SeasonalProfile::from_history(&HistoricalDataset::default()), profile);
    }

    #[test]
    fn test_factors_from_history() {
        // Two years, January always double December, other months at 100
        let mut records = Vec::new();
        for year in [2023, 2024] {
            for month in 1..=12 {
                let amount = match month {
                    1 => 200.0,
                    12 => 100.0 / 2.0,
                    _ => 100.0,
                };
                records.push(record(year, month, amount));
            }
        }
        let profile = SeasonalProfile::from_history(&HistoricalDataset::new(records));

        let grand = (200.0 + 50.0 + 10.0 * 100.0) / 12.0;
        assert_relative_eq!(profile.factor(CalendarMonth::January), 200.0 / grand);
        assert_relative_eq!(profile.factor(CalendarMonth::December), 50.0 / grand);
        assert_relative_eq!(profile.factor(CalendarMonth::June), 100.0 / grand);
        assert_relative_eq!(profile.mean_factor(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_months_without_data_are_neutral() {
        let dataset = HistoricalDataset::new(vec![record(2024, 3, 100.0), record(2024, 4, 300.0)]);
        let profile = SeasonalProfile::from_history(&dataset);

        assert_relative_eq!(profile.factor(CalendarMonth::March), 0.5);
        assert_relative_eq!(profile.factor(CalendarMonth::April), 1.5);
        assert_eq!(profile.factor(CalendarMonth::July), 1.0);
    }

    #[test]
    fn test_zero_grand_average_is_flat() {
        let dataset = HistoricalDataset::new(vec![record(2024, 1, 0.0), record(2024, 2, 0.0)]);
        let profile = SeasonalProfile::from_history(&dataset);
        assert_eq!(profile, SeasonalProfile::flat());
        assert!(profile.factors().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn test_zero_month_falls_back_to_neutral() {
        let dataset = HistoricalDataset::new(vec![record(2024, 1, 0.0), record(2024, 2, 200.0)]);
        let profile = SeasonalProfile::from_history(&dataset);
        assert_eq!(profile.factor(CalendarMonth::January), 1.0);
        assert_relative_eq!(profile.factor(CalendarMonth::February), 2.0);
    }

    #[test]
    fn test_december_smoothing() {
        let profile = SeasonalProfile::flat().with_december_smoothing();
        assert_eq!(profile.factor(CalendarMonth::December), DECEMBER_OVERRIDE_FACTOR);
        assert_eq!(profile.factor(CalendarMonth::November), 1.0);
    }

    #[test]
    fn test_override_validation() {
        let profile = SeasonalProfile::flat();
        assert!(profile.with_override(CalendarMonth::May, 0.0).is_err());
        assert!(profile.with_override(CalendarMonth::May, -1.0).is_err());
        assert!(profile.with_override(CalendarMonth::May, f64::NAN).is_err());

        let updated = profile
            .with_overrides(&[(CalendarMonth::May, 1.2), (CalendarMonth::June, 0.8)])
            .unwrap();
        assert_eq!(updated.factor(CalendarMonth::May), 1.2);
        assert_eq!(updated.factor(CalendarMonth::June), 0.8);
    }

    #[test]
    fn test_from_factors_rejects_non_positive() {
        let mut factors = [1.0; 12];
        factors[4] = 0.0;
        assert!(SeasonalProfile::from_factors(factors).is_err());
        assert!(SeasonalProfile::from_factors([1.1; 12]).is_ok());
    }
}
