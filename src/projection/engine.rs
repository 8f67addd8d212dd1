//! Forecast engine: chains revenue, flows, balances, transfers and advice

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::balance::{BalancePoint, BalanceProjector};
use super::cashflows::{CashFlowProjector, FlowSummary, ProjectionPoint};
use super::revenue::ScenarioRevenueGenerator;
use super::transfers::{QuarterlyTransferEngine, TransferOutcome, DEFAULT_PROFIT_RATE};
use crate::advisory::{
    margin, minimum_reserve, InvestmentRecommendation, KpiSnapshot, RunwayEstimator,
    SurplusAdvisor, DEFAULT_ANNUAL_YIELD,
};
use crate::assumptions::{Assumptions, ScenarioConfig, ScenarioName};
use crate::calendar::CalendarMonth;
use crate::error::{ensure_finite, ForecastError, ForecastResult};

/// Projected months fed to the runway estimate before extending at flat burn
pub const RUNWAY_WINDOW_MONTHS: usize = 3;

/// Configuration for a forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of months to project
    pub horizon_months: u32,

    /// Scenario whose series drives transfers, advice and runway
    pub scenario: ScenarioName,

    /// Months of burn held back as minimum reserve
    pub buffer_months: u32,

    /// Days needed to turn an investment back into cash
    pub liquidation_lead_days: u32,

    /// Share of quarterly revenue retained locally
    pub profit_rate: f64,

    /// Yield assumed on invested surplus
    pub annual_yield: f64,

    /// Calendar month of the first projected month
    pub start_month: CalendarMonth,

    /// Modulate revenue by the seasonal profile
    pub apply_seasonality: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_months: 12,
            scenario: ScenarioName::Moderate,
            buffer_months: 2,
            liquidation_lead_days: 15,
            profit_rate: DEFAULT_PROFIT_RATE,
            annual_yield: DEFAULT_ANNUAL_YIELD,
            start_month: CalendarMonth::January,
            apply_seasonality: true,
        }
    }
}

impl ProjectionConfig {
    /// Start the projection the month after `as_of`
    pub fn starting_after(mut self, as_of: NaiveDate) -> Self {
        self.start_month = CalendarMonth::of(as_of).next();
        self
    }

    fn validate(&self) -> ForecastResult<()> {
        if self.horizon_months == 0 {
            return Err(ForecastError::invalid_input("horizon_months", "must be at least 1"));
        }
        Ok(())
    }
}

/// Everything one forecast depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInputs {
    pub assumptions: Assumptions,
    pub config: ProjectionConfig,
    pub cash_on_hand: f64,
}

impl EngineInputs {
    pub fn new(assumptions: Assumptions, config: ProjectionConfig, cash_on_hand: f64) -> Self {
        Self { assumptions, config, cash_on_hand }
    }

    pub fn engine(&self) -> ForecastEngine {
        ForecastEngine::new(self.assumptions.clone(), self.config.clone())
    }

    pub fn run(&self) -> ForecastResult<ProjectionResult> {
        self.engine().project(self.cash_on_hand)
    }
}

/// Complete output of one forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub scenario: ScenarioConfig,
    pub start_month: CalendarMonth,
    pub opening_cash: f64,
    pub baseline_revenue: f64,
    pub burn_rate: f64,

    /// Monthly revenue, outflow and net flow
    pub points: Vec<ProjectionPoint>,

    /// Running balance before any transfer
    pub balances: Vec<BalancePoint>,

    /// Post-transfer timeline and quarterly schedule
    pub transfers: TransferOutcome,

    pub recommendations: Vec<InvestmentRecommendation>,
    pub kpis: KpiSnapshot,

    /// Neither revenue nor costs were loaded; render as awaiting data
    pub no_data: bool,
}

impl ProjectionResult {
    pub fn summary(&self) -> FlowSummary {
        FlowSummary::from_points(&self.points)
    }

    pub fn final_balance(&self) -> f64 {
        self.transfers.final_balance
    }

    /// Calendar month of a projected month (1-indexed)
    pub fn calendar_month(&self, month_index: u32) -> CalendarMonth {
        self.start_month.plus(month_index.saturating_sub(1))
    }
}

/// Main forecast engine
///
/// Pure: the same assumptions, config and cash always give the same result.
pub struct ForecastEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ForecastEngine {
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Revenue series for any scenario under this engine's config
    pub fn scenario_revenue(&self, scenario: &ScenarioConfig) -> Vec<f64> {
        let seasonality = self
            .config
            .apply_seasonality
            .then_some(&self.assumptions.seasonality);

        ScenarioRevenueGenerator::new(self.config.start_month).generate(
            self.assumptions.baseline_revenue,
            scenario,
            self.config.horizon_months,
            seasonality,
        )
    }

    /// Run the configured scenario end to end
    pub fn project(&self, cash_on_hand: f64) -> ForecastResult<ProjectionResult> {
        self.config.validate()?;
        let scenario = self.assumptions.scenarios.get(self.config.scenario);
        let revenue = self.scenario_revenue(&scenario);
        self.project_revenue(&revenue, cash_on_hand)
    }

    /// Run everything downstream of revenue on a supplied series
    pub fn project_revenue(
        &self,
        revenue_series: &[f64],
        cash_on_hand: f64,
    ) -> ForecastResult<ProjectionResult> {
        self.config.validate()?;
        ensure_finite("cash_on_hand", cash_on_hand)?;
        if let Some(bad) = revenue_series.iter().find(|r| !r.is_finite()) {
            return Err(ForecastError::invalid_input("revenue", format!("must be finite, got {}", bad)));
        }

        let transfer_engine = QuarterlyTransferEngine::new(self.config.profit_rate)?;
        let advisor = SurplusAdvisor::new(self.config.annual_yield)?;
        let scenario = self.assumptions.scenarios.get(self.config.scenario);
        let no_data = self.assumptions.is_no_data();
        if no_data {
            info!("forecasting without data: awaiting upload");
        }

        let burn_rate = self.assumptions.burn_rate();
        let points = CashFlowProjector::new(&self.assumptions.costs).project(revenue_series);
        let balances = BalanceProjector::accumulate(cash_on_hand, &points);
        let transfers = transfer_engine.apply_transfers(&points, cash_on_hand);

        let recommendations = advisor.advise(
            &transfers.balance_timeline,
            burn_rate,
            self.config.buffer_months,
            self.config.liquidation_lead_days,
        );

        let near_term: Vec<f64> = points
            .iter()
            .take(RUNWAY_WINDOW_MONTHS)
            .map(|p| p.net_flow)
            .collect();
        let runway = RunwayEstimator::estimate(cash_on_hand, &near_term, burn_rate);

        let three_month = transfers
            .balance_timeline
            .iter()
            .take(RUNWAY_WINDOW_MONTHS)
            .last()
            .map_or(cash_on_hand, |b| b.balance_after_transfer);

        let kpis = KpiSnapshot {
            cash_available: cash_on_hand,
            monthly_revenue: self.assumptions.baseline_revenue,
            burn_rate,
            runway,
            margin: margin(self.assumptions.baseline_revenue, burn_rate),
            projected_three_month_balance: three_month,
            surplus_vs_reserve: cash_on_hand - minimum_reserve(burn_rate, self.config.buffer_months),
        };

        debug!(
            "{}: {} months, final balance {:.2}, transferred {:.2}",
            scenario.name,
            points.len(),
            transfers.final_balance,
            transfers.total_transferred
        );

        Ok(ProjectionResult {
            scenario,
            start_month: self.config.start_month,
            opening_cash: cash_on_hand,
            baseline_revenue: self.assumptions.baseline_revenue,
            burn_rate,
            points,
            balances,
            transfers,
            recommendations,
            kpis,
            no_data,
        })
    }
}
