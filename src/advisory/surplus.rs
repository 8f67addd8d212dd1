//! Investable surplus above a protection buffer

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, ForecastError, ForecastResult};
use crate::projection::BalancePoint;

/// Annual yield assumed for short-term placements
pub const DEFAULT_ANNUAL_YIELD: f64 = 0.10;

/// Lead times above this many days push liquidation one month further out
const ONE_MONTH_LEAD_DAYS: u32 = 30;

/// Short-term investment suggestion for one projected month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecommendation {
    pub month_index: u32,
    pub investable_amount: f64,
    pub expected_monthly_yield: f64,
    /// Funds must be back in the account before this projection month
    pub liquidate_before_month: u32,
}

/// Cash kept aside before anything counts as surplus
pub fn minimum_reserve(burn_rate: f64, buffer_months: u32) -> f64 {
    burn_rate.max(0.0) * buffer_months as f64
}

/// Balance in excess of the reserve, floored at zero
pub fn investable_amount(balance: f64, burn_rate: f64, buffer_months: u32) -> f64 {
    (balance - minimum_reserve(burn_rate, buffer_months)).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurplusAdvisor {
    annual_yield: f64,
}

impl Default for SurplusAdvisor {
    fn default() -> Self {
        Self { annual_yield: DEFAULT_ANNUAL_YIELD }
    }
}

impl SurplusAdvisor {
    pub fn new(annual_yield: f64) -> ForecastResult<Self> {
        ensure_finite("annual_yield", annual_yield)?;
        if annual_yield < 0.0 {
            return Err(ForecastError::invalid_input("annual_yield", "cannot be negative"));
        }
        Ok(Self { annual_yield })
    }

    pub fn annual_yield(&self) -> f64 {
        self.annual_yield
    }

    /// One recommendation per month with a positive surplus
    ///
    /// Uses each month's post-transfer balance.
    pub fn advise(
        &self,
        balance_timeline: &[BalancePoint],
        burn_rate: f64,
        buffer_months: u32,
        liquidation_lead_days: u32,
    ) -> Vec<InvestmentRecommendation> {
        let months_ahead = if liquidation_lead_days > ONE_MONTH_LEAD_DAYS { 2 } else { 1 };
        let monthly_yield = self.annual_yield / 12.0;

        balance_timeline
            .iter()
            .filter_map(|point| {
                let investable =
                    investable_amount(point.balance_after_transfer, burn_rate, buffer_months);
                (investable > 0.0).then(|| InvestmentRecommendation {
                    month_index: point.month_index,
                    investable_amount: investable,
                    expected_monthly_yield: investable * monthly_yield,
                    liquidate_before_month: point.month_index + months_ahead,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn timeline(balances: &[f64]) -> Vec<BalancePoint> {
        balances
            .iter()
            .enumerate()
            .map(|(i, &b)| BalancePoint::untransferred(i as u32 + 1, b))
            .collect()
    }

    #[test]
    fn test_buffer_reserve() {
        assert_relative_eq!(minimum_reserve(50_000.0, 2), 100_000.0);
        assert_relative_eq!(investable_amount(200_000.0, 50_000.0, 2), 100_000.0);
        assert_eq!(investable_amount(100_000.0, 50_000.0, 2), 0.0);
        assert_eq!(investable_amount(-5_000.0, 50_000.0, 2), 0.0);
    }

    #[test]
    fn test_advise() {
        let advisor = SurplusAdvisor::default();
        let recs = advisor.advise(&timeline(&[200_000.0, 90_000.0, 160_000.0]), 50_000.0, 2, 15);

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].month_index, 1);
        assert_relative_eq!(recs[0].investable_amount, 100_000.0);
        assert_relative_eq!(recs[0].expected_monthly_yield, 100_000.0 * 0.10 / 12.0);
        assert_eq!(recs[0].liquidate_before_month, 2);
        assert_eq!(recs[1].month_index, 3);
        assert_relative_eq!(recs[1].investable_amount, 60_000.0);
    }

    #[test]
    fn test_long_lead_time() {
        let advisor = SurplusAdvisor::default();
        let thirty = advisor.advise(&timeline(&[500_000.0]), 50_000.0, 1, 30);
        assert_eq!(thirty[0].liquidate_before_month, 2);

        let longer = advisor.advise(&timeline(&[500_000.0]), 50_000.0, 1, 45);
        assert_eq!(longer[0].liquidate_before_month, 3);
    }

    #[test]
    fn test_uses_post_transfer_balance() {
        let point = BalancePoint {
            month_index: 3,
            balance_before_transfer: 300_000.0,
            transfer_amount: 150_000.0,
            balance_after_transfer: 150_000.0,
        };
        let recs = SurplusAdvisor::default().advise(&[point], 50_000.0, 2, 7);
        assert_relative_eq!(recs[0].investable_amount, 50_000.0);
    }

    #[test]
    fn test_zero_burn_means_zero_reserve() {
        let recs = SurplusAdvisor::default().advise(&timeline(&[10_000.0]), 0.0, 3, 7);
        assert_relative_eq!(recs[0].investable_amount, 10_000.0);
    }

    #[test]
    fn test_rejects_negative_yield() {
        assert!(SurplusAdvisor::new(-0.01).is_err());
        assert!(SurplusAdvisor::new(0.0).is_ok());
    }
}
