//! Quarterly profit transfers to the parent company
//!
//! At the end of each quarter the subsidiary keeps `revenue * profit_rate`
//! and sends whatever net flow exceeds it upstream. Quarters are consecutive
//! three-month blocks from the projection start; a trailing partial block is
//! settled the same way.

use log::debug;
use serde::{Deserialize, Serialize};

use super::balance::BalancePoint;
use super::cashflows::ProjectionPoint;
use super::state::QuarterState;
use crate::error::{ensure_finite, ForecastError, ForecastResult};

/// Share of quarterly revenue retained locally
pub const DEFAULT_PROFIT_RATE: f64 = 0.10;

/// Settlement of one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuarterSummary {
    pub quarter_index: u32,
    pub first_month: u32,
    pub last_month: u32,
    pub revenue: f64,
    pub net_flow: f64,
    pub required_local_profit: f64,
    pub transfer: f64,
    /// Balance at quarter end, before and after the transfer
    pub balance_before_transfer: f64,
    pub balance_after_transfer: f64,
}

/// Post-transfer timeline and per-quarter settlements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub balance_timeline: Vec<BalancePoint>,
    pub quarterly_summary: Vec<QuarterSummary>,
    pub total_transferred: f64,
    pub final_balance: f64,
}

/// Applies quarterly transfers to a projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuarterlyTransferEngine {
    profit_rate: f64,
}

impl Default for QuarterlyTransferEngine {
    fn default() -> Self {
        Self { profit_rate: DEFAULT_PROFIT_RATE }
    }
}

impl QuarterlyTransferEngine {
    /// `profit_rate` must lie in [0, 1]
    pub fn new(profit_rate: f64) -> ForecastResult<Self> {
        ensure_finite("profit_rate", profit_rate)?;
        if !(0.0..=1.0).contains(&profit_rate) {
            return Err(ForecastError::invalid_input("profit_rate", "must be between 0 and 1"));
        }
        Ok(Self { profit_rate })
    }

    pub fn profit_rate(&self) -> f64 {
        self.profit_rate
    }

    /// Walk the projection, deducting each quarter's transfer at its last month
    ///
    /// Deducted amounts are carried forward into every later balance.
    pub fn apply_transfers(&self, points: &[ProjectionPoint], opening_cash: f64) -> TransferOutcome {
        let mut outcome = TransferOutcome {
            balance_timeline: Vec::with_capacity(points.len()),
            final_balance: opening_cash,
            ..Default::default()
        };
        let mut balance = opening_cash;

        for (i, block) in points.chunks(3).enumerate() {
            let mut quarter = QuarterState::begin(i as u32 + 1, block[0].month_index);

            for point in block {
                balance += point.net_flow;
                quarter.record(point);
                outcome
                    .balance_timeline
                    .push(BalancePoint::untransferred(point.month_index, balance));
            }

            let balance_before_transfer = balance;
            let transfer = quarter.transfer_amount(self.profit_rate);
            if transfer > 0.0 {
                balance -= transfer;
                if let Some(last) = outcome.balance_timeline.last_mut() {
                    last.transfer_amount = transfer;
                    last.balance_after_transfer = balance;
                }
                debug!(
                    "quarter {} (months {}-{}): transfer {:.2}",
                    quarter.quarter_index, quarter.first_month, quarter.last_month, transfer
                );
            }

            outcome.total_transferred += transfer;
            outcome.quarterly_summary.push(QuarterSummary {
                quarter_index: quarter.quarter_index,
                first_month: quarter.first_month,
                last_month: quarter.last_month,
                revenue: quarter.revenue,
                net_flow: quarter.net_flow,
                required_local_profit: quarter.required_local_profit(self.profit_rate),
                transfer,
                balance_before_transfer,
                balance_after_transfer: balance,
            });
        }

        outcome.final_balance = balance;
        outcome
    }
}
