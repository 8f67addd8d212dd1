//! Headline indicators and their change between runs

use serde::{Deserialize, Serialize};

use super::runway::Runway;

/// Scalar KPIs for one forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub cash_available: f64,
    pub monthly_revenue: f64,
    pub burn_rate: f64,
    pub runway: Runway,
    /// `(revenue - burn) / revenue`, 0 without revenue
    pub margin: f64,
    /// Post-transfer balance three months out (or at the horizon if shorter)
    pub projected_three_month_balance: f64,
    /// Cash above (positive) or below (negative) the minimum reserve
    pub surplus_vs_reserve: f64,
}

/// Percent changes against an earlier snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiVariation {
    pub cash_pct: f64,
    pub revenue_pct: f64,
    pub burn_rate_pct: f64,
}

/// `(current - previous) / previous * 100`, or 0 when `previous <= 0`
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

pub fn margin(revenue: f64, burn_rate: f64) -> f64 {
    if revenue > 0.0 {
        (revenue - burn_rate) / revenue
    } else {
        0.0
    }
}

impl KpiSnapshot {
    pub fn variation_from(&self, previous: &KpiSnapshot) -> KpiVariation {
        KpiVariation {
            cash_pct: percent_change(self.cash_available, previous.cash_available),
            revenue_pct: percent_change(self.monthly_revenue, previous.monthly_revenue),
            burn_rate_pct: percent_change(self.burn_rate, previous.burn_rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot(cash: f64, revenue: f64, burn: f64) -> KpiSnapshot {
        KpiSnapshot {
            cash_available: cash,
            monthly_revenue: revenue,
            burn_rate: burn,
            runway: Runway::Infinite,
            margin: margin(revenue, burn),
            projected_three_month_balance: cash,
            surplus_vs_reserve: 0.0,
        }
    }

    #[test]
    fn test_variation() {
        let previous = snapshot(100_000.0, 120_000.0, 80_000.0);
        let current = snapshot(110_000.0, 108_000.0, 80_000.0);
        let variation = current.variation_from(&previous);

        assert_relative_eq!(variation.cash_pct, 10.0, epsilon = 1e-9);
        assert_relative_eq!(variation.revenue_pct, -10.0, epsilon = 1e-9);
        assert_eq!(variation.burn_rate_pct, 0.0);
    }

    #[test]
    fn test_variation_against_empty_snapshot() {
        let previous = snapshot(0.0, 0.0, 0.0);
        let current = snapshot(50_000.0, 90_000.0, 70_000.0);
        assert_eq!(current.variation_from(&previous), KpiVariation::default());
    }

    #[test]
    fn test_margin() {
        assert_relative_eq!(margin(127_468.0, 77_994.4216), 0.38812, epsilon = 1e-4);
        assert_eq!(margin(0.0, 65_732.0), 0.0);
    }
}
