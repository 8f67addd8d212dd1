//! Running state of a quarter during the transfer pass

use super::cashflows::ProjectionPoint;

/// Accumulates one quarter (three projected months, or fewer at the end)
#[derive(Debug, Clone, PartialEq)]
pub struct QuarterState {
    /// Quarter number within the projection (1-indexed)
    pub quarter_index: u32,

    /// First and last projection month recorded so far
    pub first_month: u32,
    pub last_month: u32,

    /// Revenue and net flow accumulated this quarter
    pub revenue: f64,
    pub net_flow: f64,

    /// Months recorded (1..=3)
    pub months: u32,
}

impl QuarterState {
    /// Open a quarter at the given projection month
    pub fn begin(quarter_index: u32, first_month: u32) -> Self {
        Self {
            quarter_index,
            first_month,
            last_month: first_month,
            revenue: 0.0,
            net_flow: 0.0,
            months: 0,
        }
    }

    pub fn record(&mut self, point: &ProjectionPoint) {
        self.last_month = point.month_index;
        self.revenue += point.revenue;
        self.net_flow += point.net_flow;
        self.months += 1;
    }

    /// Profit kept locally: `revenue * profit_rate`
    pub fn required_local_profit(&self, profit_rate: f64) -> f64 {
        self.revenue * profit_rate
    }

    /// Amount sent to the parent company, never negative
    pub fn transfer_amount(&self, profit_rate: f64) -> f64 {
        (self.net_flow - self.required_local_profit(profit_rate)).max(0.0)
    }

    pub fn is_partial(&self) -> bool {
        self.months < 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(month_index: u32, revenue: f64, net_flow: f64) -> ProjectionPoint {
        ProjectionPoint { month_index, revenue, outflow: revenue - net_flow, net_flow }
    }

    #[test]
    fn test_transfer_above_required_profit() {
        let mut quarter = QuarterState::begin(1, 1);
        quarter.record(&point(1, 150_000.0, 60_000.0));
        quarter.record(&point(2, 120_000.0, 40_000.0));
        quarter.record(&point(3, 130_000.0, 50_000.0));

        assert_relative_eq!(quarter.revenue, 400_000.0);
        assert_relative_eq!(quarter.net_flow, 150_000.0);
        assert_relative_eq!(quarter.required_local_profit(0.10), 40_000.0);
        assert_relative_eq!(quarter.transfer_amount(0.10), 110_000.0);
        assert_eq!(quarter.last_month, 3);
        assert!(!quarter.is_partial());
    }

    #[test]
    fn test_transfer_floored_at_zero() {
        let mut quarter = QuarterState::begin(2, 4);
        quarter.record(&point(4, 100_000.0, -20_000.0));
        assert_eq!(quarter.transfer_amount(0.10), 0.0);
        assert!(quarter.is_partial());
    }
}
