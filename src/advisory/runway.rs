//! Months of operation current cash can sustain

use std::fmt;

use serde::{Deserialize, Serialize};

/// Runway in months
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Runway {
    Finite(f64),
    /// Zero burn: cash is never depleted
    Infinite,
}

impl Runway {
    pub fn is_infinite(&self) -> bool {
        matches!(self, Runway::Infinite)
    }

    /// Months as a float (`f64::INFINITY` for an unbounded runway)
    pub fn months(&self) -> f64 {
        match self {
            Runway::Finite(months) => *months,
            Runway::Infinite => f64::INFINITY,
        }
    }
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Runway::Finite(months) => write!(f, "{:.1} months", months),
            Runway::Infinite => write!(f, "unlimited"),
        }
    }
}

pub struct RunwayEstimator;

impl RunwayEstimator {
    /// Walk the near-term flows, then extend at the flat burn rate
    ///
    /// Returns the first month `k` at which the running balance is `<= 0`;
    /// otherwise `window + remaining / burn_rate`.
    pub fn estimate(current_cash: f64, near_term_net_flows: &[f64], burn_rate: f64) -> Runway {
        if burn_rate <= 0.0 {
            return Runway::Infinite;
        }

        let mut balance = current_cash;
        for (k, flow) in near_term_net_flows.iter().enumerate() {
            balance += flow;
            if balance <= 0.0 {
                return Runway::Finite(k as f64 + 1.0);
            }
        }

        // Only an empty window can reach here with a non-positive balance
        Runway::Finite((near_term_net_flows.len() as f64 + balance / burn_rate).max(0.0))
    }
}
