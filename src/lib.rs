//! Cash Flow Forecast - cash position forecasting and liquidity advisory engine
//!
//! This library provides:
//! - Seasonality and baseline revenue derived from invoiced history
//! - Fixed/variable cost modelling with burn rate
//! - Conservative, Moderate and Optimistic revenue scenarios
//! - Month-by-month balances with quarterly intercompany transfers
//! - Investable surplus, runway and KPI advice
//! - Seeded sensitivity analysis around the deterministic forecast

pub mod error;
pub mod calendar;
pub mod history;
pub mod assumptions;
pub mod projection;
pub mod advisory;
pub mod scenario;
pub mod session;
pub mod sensitivity;
pub mod report;

// Re-export commonly used types
pub use error::{ForecastError, ForecastResult};
pub use calendar::{CalendarMonth, YearMonth};
pub use history::{HistoricalDataset, RevenueRecord};
pub use assumptions::{Assumptions, CostModel, ScenarioCatalog, ScenarioConfig, ScenarioName, SeasonalProfile};
pub use projection::{EngineInputs, ForecastEngine, ProjectionConfig, ProjectionResult};
pub use advisory::{InvestmentRecommendation, KpiSnapshot, Runway};
pub use scenario::ScenarioRunner;
pub use session::{DataOrigin, DataSource, SessionConfig};
pub use sensitivity::{run_sensitivity, SensitivityConfig, SensitivitySummary};
pub use report::CashflowReport;
