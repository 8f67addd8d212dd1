//! Projection pipeline: revenue series through to post-transfer balances

mod balance;
mod cashflows;
mod engine;
mod revenue;
mod state;
mod transfers;

pub use balance::{first_funding_gap, trough_balance, BalancePoint, BalanceProjector};
pub use cashflows::{CashFlowProjector, FlowSummary, ProjectionPoint};
pub use engine::{EngineInputs, ForecastEngine, ProjectionConfig, ProjectionResult, RUNWAY_WINDOW_MONTHS};
pub use revenue::ScenarioRevenueGenerator;
pub use state::QuarterState;
pub use transfers::{QuarterSummary, QuarterlyTransferEngine, TransferOutcome, DEFAULT_PROFIT_RATE};
