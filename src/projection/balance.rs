//! Running cash balance over projected flows

use serde::{Deserialize, Serialize};

use super::cashflows::ProjectionPoint;

/// Cash balance at the close of a projected month
///
/// `balance_after_transfer = balance_before_transfer - transfer_amount`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub month_index: u32,
    pub balance_before_transfer: f64,
    pub transfer_amount: f64,
    pub balance_after_transfer: f64,
}

impl BalancePoint {
    /// A month with no transfer
    pub fn untransferred(month_index: u32, balance: f64) -> Self {
        Self {
            month_index,
            balance_before_transfer: balance,
            transfer_amount: 0.0,
            balance_after_transfer: balance,
        }
    }
}

/// Accumulates net flows onto an opening balance
pub struct BalanceProjector;

impl BalanceProjector {
    /// Pre-transfer running balance
    ///
    /// Negative balances are kept as-is; they signal a funding gap.
    pub fn accumulate(opening_cash: f64, points: &[ProjectionPoint]) -> Vec<BalancePoint> {
        points
            .iter()
            .scan(opening_cash, |balance, point| {
                *balance += point.net_flow;
                Some(BalancePoint::untransferred(point.month_index, *balance))
            })
            .collect()
    }
}

/// Lowest post-transfer balance in a timeline
pub fn trough_balance(timeline: &[BalancePoint]) -> Option<f64> {
    timeline
        .iter()
        .map(|b| b.balance_after_transfer)
        .min_by(|a, b| a.total_cmp(b))
}

/// First month whose post-transfer balance is negative
pub fn first_funding_gap(timeline: &[BalancePoint]) -> Option<u32> {
    timeline
        .iter()
        .find(|b| b.balance_after_transfer < 0.0)
        .map(|b| b.month_index)
}
