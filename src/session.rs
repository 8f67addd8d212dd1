//! Session boundary: where the data comes from and what the user picked

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::assumptions::ScenarioName;
use crate::error::{ensure_finite, ForecastError, ForecastResult};
use crate::history::HistoricalDataset;
use crate::projection::ProjectionConfig;

/// Buffer choices offered to the user, in months of burn
pub const BUFFER_MONTH_CHOICES: [u32; 3] = [1, 2, 3];

/// Liquidation lead-time choices, in days
pub const LEAD_DAY_CHOICES: [u32; 3] = [7, 15, 30];

/// Longest projection a session may request
pub const MAX_HORIZON_MONTHS: u32 = 12;

/// Where a loaded dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    Demo,
    Upload,
    /// Records pulled from the accounting ledger
    Ledger,
}

/// Lifecycle of the session's historical data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    #[default]
    Empty,
    AwaitingUpload,
    Loaded {
        origin: DataOrigin,
        dataset: HistoricalDataset,
    },
}

impl DataSource {
    fn state_name(&self) -> &'static str {
        match self {
            DataSource::Empty => "Empty",
            DataSource::AwaitingUpload => "AwaitingUpload",
            DataSource::Loaded { .. } => "Loaded",
        }
    }

    fn transition_error(&self, to: &str) -> ForecastError {
        ForecastError::InvalidTransition {
            from: self.state_name().to_string(),
            to: to.to_string(),
        }
    }

    /// Empty or Loaded -> AwaitingUpload
    pub fn begin_upload(self) -> ForecastResult<Self> {
        match self {
            DataSource::Empty | DataSource::Loaded { .. } => Ok(DataSource::AwaitingUpload),
            DataSource::AwaitingUpload => Err(self.transition_error("AwaitingUpload")),
        }
    }

    /// AwaitingUpload -> Loaded
    pub fn complete_upload(self, origin: DataOrigin, dataset: HistoricalDataset) -> ForecastResult<Self> {
        match self {
            DataSource::AwaitingUpload => {
                info!("{:?} data loaded: {} records", origin, dataset.len());
                Ok(DataSource::Loaded { origin, dataset })
            }
            _ => Err(self.transition_error("Loaded")),
        }
    }

    /// Any state -> Loaded with demo data
    pub fn load_demo(self, dataset: HistoricalDataset) -> Self {
        info!("demo data loaded: {} records", dataset.len());
        DataSource::Loaded {
            origin: DataOrigin::Demo,
            dataset,
        }
    }

    /// Any state -> Empty
    pub fn reset(self) -> Self {
        DataSource::Empty
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, DataSource::Loaded { .. })
    }

    pub fn origin(&self) -> Option<DataOrigin> {
        match self {
            DataSource::Loaded { origin, .. } => Some(*origin),
            _ => None,
        }
    }

    pub fn dataset(&self) -> Option<&HistoricalDataset> {
        match self {
            DataSource::Loaded { dataset, .. } => Some(dataset),
            _ => None,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin() {
            Some(origin) => write!(f, "Loaded ({:?})", origin),
            None => write!(f, "{}", self.state_name()),
        }
    }
}

/// Raw user choices as they arrive from a form or request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub cash_on_hand: f64,
    pub buffer_months: u32,
    pub liquidation_lead_days: u32,
    pub scenario: String,
    pub horizon_months: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cash_on_hand: 0.0,
            buffer_months: 2,
            liquidation_lead_days: 15,
            scenario: ScenarioName::Moderate.to_string(),
            horizon_months: 6,
        }
    }
}

impl SessionConfig {
    /// Check every choice against its allowed set and build a projection config
    pub fn validate(&self) -> ForecastResult<ProjectionConfig> {
        ensure_finite("cash_on_hand", self.cash_on_hand)?;

        if !BUFFER_MONTH_CHOICES.contains(&self.buffer_months) {
            return Err(ForecastError::invalid_input(
                "buffer_months",
                format!("must be one of {:?}, got {}", BUFFER_MONTH_CHOICES, self.buffer_months),
            ));
        }
        if !LEAD_DAY_CHOICES.contains(&self.liquidation_lead_days) {
            return Err(ForecastError::invalid_input(
                "liquidation_lead_days",
                format!("must be one of {:?}, got {}", LEAD_DAY_CHOICES, self.liquidation_lead_days),
            ));
        }
        if !(1..=MAX_HORIZON_MONTHS).contains(&self.horizon_months) {
            return Err(ForecastError::invalid_input(
                "horizon_months",
                format!("must be between 1 and {}, got {}", MAX_HORIZON_MONTHS, self.horizon_months),
            ));
        }

        Ok(ProjectionConfig {
            horizon_months: self.horizon_months,
            scenario: self.scenario.parse()?,
            buffer_months: self.buffer_months,
            liquidation_lead_days: self.liquidation_lead_days,
            ..Default::default()
        })
    }
}
