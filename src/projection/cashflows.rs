//! Monthly cash flow rows for a projection

use serde::{Deserialize, Serialize};

use crate::assumptions::CostModel;

/// A single month of projected cash flow
///
/// `net_flow = revenue - outflow`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    /// Projection month (1-indexed)
    pub month_index: u32,
    pub revenue: f64,
    pub outflow: f64,
    pub net_flow: f64,
}

/// Applies a cost model to a revenue series
#[derive(Debug, Clone, Copy)]
pub struct CashFlowProjector<'a> {
    costs: &'a CostModel,
}

impl<'a> CashFlowProjector<'a> {
    pub fn new(costs: &'a CostModel) -> Self {
        Self { costs }
    }

    /// One point per revenue value, months numbered from 1
    pub fn project(&self, revenue_series: &[f64]) -> Vec<ProjectionPoint> {
        revenue_series
            .iter()
            .enumerate()
            .map(|(i, &revenue)| {
                let outflow = self.costs.burn_rate(revenue);
                ProjectionPoint {
                    month_index: i as u32 + 1,
                    revenue,
                    outflow,
                    net_flow: revenue - outflow,
                }
            })
            .collect()
    }
}

/// Totals over a projected series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub total_months: u32,
    pub total_revenue: f64,
    pub total_outflow: f64,
    pub total_net_flow: f64,
    /// Net flow as a share of revenue (0 when there is no revenue)
    pub margin: f64,
}

impl FlowSummary {
    pub fn from_points(points: &[ProjectionPoint]) -> Self {
        let total_revenue: f64 = points.iter().map(|p| p.revenue).sum();
        let total_outflow: f64 = points.iter().map(|p| p.outflow).sum();
        let total_net_flow: f64 = points.iter().map(|p| p.net_flow).sum();

        Self {
            total_months: points.len() as u32,
            total_revenue,
            total_outflow,
            total_net_flow,
            margin: if total_revenue > 0.0 { total_net_flow / total_revenue } else { 0.0 },
        }
    }
}
