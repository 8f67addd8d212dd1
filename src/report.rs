//! Cash-flow report assembled from a dataset and one forecast

use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::advisory::{InvestmentRecommendation, KpiSnapshot, KpiVariation};
use crate::calendar::YearMonth;
use crate::error::ForecastResult;
use crate::history::{ClientRevenue, HistoricalDataset, MonthlyRevenue, QuarterlyRevenue, RevenueStatistics};
use crate::projection::{ProjectionResult, QuarterSummary};

/// Clients listed in the report
pub const REPORT_TOP_CLIENTS: usize = 5;

/// Months of history shown in the trend
pub const REPORT_TREND_MONTHS: usize = 12;

/// One projected month as written to CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionLine {
    pub month: u32,
    pub label: String,
    pub revenue: f64,
    pub outflow: f64,
    pub net_flow: f64,
    pub balance_before_transfer: f64,
    pub transfer: f64,
    pub balance_after_transfer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowReport {
    pub report_date: NaiveDate,
    pub scenario: String,
    pub awaiting_data: bool,
    pub kpis: KpiSnapshot,
    /// Change against an earlier run's KPIs, when one was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi_variation: Option<KpiVariation>,
    pub statistics: RevenueStatistics,
    pub quarterly_history: Vec<QuarterlyRevenue>,
    pub top_clients: Vec<ClientRevenue>,
    pub revenue_trend: Vec<MonthlyRevenue>,
    pub projection: Vec<ProjectionLine>,
    pub quarterly_transfers: Vec<QuarterSummary>,
    pub recommendations: Vec<InvestmentRecommendation>,
}

/// First projected (year, month) for a forecast run on `as_of`
fn projection_start(as_of: NaiveDate, result: &ProjectionResult) -> YearMonth {
    let start = YearMonth::new(as_of.year(), result.start_month);
    if start <= YearMonth::of(as_of) {
        YearMonth::new(as_of.year() + 1, result.start_month)
    } else {
        start
    }
}

impl CashflowReport {
    pub fn build(as_of: NaiveDate, dataset: &HistoricalDataset, result: &ProjectionResult) -> Self {
        let start = projection_start(as_of, result);

        let projection = result
            .points
            .iter()
            .zip(result.transfers.balance_timeline.iter())
            .map(|(point, balance)| ProjectionLine {
                month: point.month_index,
                label: start.plus(point.month_index - 1).label(),
                revenue: point.revenue,
                outflow: point.outflow,
                net_flow: point.net_flow,
                balance_before_transfer: balance.balance_before_transfer,
                transfer: balance.transfer_amount,
                balance_after_transfer: balance.balance_after_transfer,
            })
            .collect();

        Self {
            report_date: as_of,
            scenario: result.scenario.name.to_string(),
            awaiting_data: result.no_data,
            kpis: result.kpis.clone(),
            kpi_variation: None,
            statistics: dataset.statistics(),
            quarterly_history: dataset.quarterly_totals(),
            top_clients: dataset.top_clients(REPORT_TOP_CLIENTS),
            revenue_trend: dataset.revenue_trend(REPORT_TREND_MONTHS),
            projection,
            quarterly_transfers: result.transfers.quarterly_summary.clone(),
            recommendations: result.recommendations.clone(),
        }
    }

    /// Attach the percent change against a previous run's KPIs
    pub fn with_previous(mut self, previous: &KpiSnapshot) -> Self {
        self.kpi_variation = Some(self.kpis.variation_from(previous));
        self
    }

    pub fn to_json(&self) -> ForecastResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the projection lines as CSV
    pub fn write_projection_csv<P: AsRef<Path>>(&self, path: P) -> ForecastResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for line in &self.projection {
            writer.serialize(line)?;
        }
        writer.flush()?;
        Ok(())
    }
}
