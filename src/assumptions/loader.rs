//! CSV-based assumption loader
//!
//! Loads cost breakdowns, seasonal overrides, and scenario catalogs from data/assumptions/

use std::fs::File;
use std::path::Path;

use log::debug;

use super::{CostBreakdown, CostCategory, ScenarioCatalog, ScenarioConfig};
use crate::calendar::CalendarMonth;
use crate::error::{ForecastError, ForecastResult};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// Column `index` of a row, or a parse error naming the missing column
fn column<'r>(record: &'r csv::StringRecord, index: usize, name: &str) -> ForecastResult<&'r str> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| ForecastError::Parse(format!("missing column '{}' in row {:?}", name, record)))
}

/// Load the cost breakdown from `cost_breakdown.csv`
///
/// Columns: `category,kind,value` where kind is `fixed` (monthly amount)
/// or `variable_rate` (fraction of revenue).
pub fn load_cost_breakdown(path: &Path) -> ForecastResult<CostBreakdown> {
    let file = File::open(path.join("cost_breakdown.csv"))?;
    read_cost_breakdown(file)
}

/// Parse a cost breakdown from any reader
pub fn read_cost_breakdown<R: std::io::Read>(reader: R) -> ForecastResult<CostBreakdown> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut breakdown = CostBreakdown::default();

    for result in reader.records() {
        let record = result?;
        let name = column(&record, 0, "category")?.to_string();
        let kind = column(&record, 1, "kind")?;
        let value: f64 = column(&record, 2, "value")?
            .parse()
            .map_err(|e| ForecastError::Parse(format!("cost '{}': {}", name, e)))?;

        match kind {
            "fixed" => breakdown.categories.push(CostCategory { name, monthly_amount: value }),
            "variable_rate" => breakdown.variable_rate += value,
            other => {
                return Err(ForecastError::Parse(format!("unknown cost kind: {}", other)));
            }
        }
    }

    debug!(
        "loaded {} fixed cost categories, variable rate {:.4}",
        breakdown.categories.len(),
        breakdown.variable_rate
    );
    Ok(breakdown)
}

/// Load seasonal overrides from `seasonal_overrides.csv` (`month,factor`)
/// Returns an empty list when the file does not exist
pub fn load_seasonal_overrides(path: &Path) -> ForecastResult<Vec<(CalendarMonth, f64)>> {
    let file_path = path.join("seasonal_overrides.csv");
    if !file_path.exists() {
        return Ok(Vec::new());
    }

    read_seasonal_overrides(File::open(file_path)?)
}

/// Parse seasonal overrides from any reader
pub fn read_seasonal_overrides<R: std::io::Read>(reader: R) -> ForecastResult<Vec<(CalendarMonth, f64)>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut overrides = Vec::new();

    for result in reader.records() {
        let record = result?;
        let month: CalendarMonth = column(&record, 0, "month")?.parse()?;
        let factor: f64 = column(&record, 1, "factor")?
            .parse()
            .map_err(|e| ForecastError::Parse(format!("override for {}: {}", month, e)))?;
        overrides.push((month, factor));
    }

    Ok(overrides)
}

/// Load a scenario catalog from `scenarios.csv` (`name,level_multiplier,monthly_growth`)
/// Returns the standard catalog when the file does not exist
pub fn load_scenario_catalog(path: &Path) -> ForecastResult<ScenarioCatalog> {
    let file_path = path.join("scenarios.csv");
    if !file_path.exists() {
        return Ok(ScenarioCatalog::standard());
    }
    read_scenario_catalog(File::open(file_path)?)
}

/// Parse a scenario catalog from any reader
pub fn read_scenario_catalog<R: std::io::Read>(reader: R) -> ForecastResult<ScenarioCatalog> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut configs = Vec::with_capacity(3);

    for result in reader.records() {
        let record = result?;
        let name = column(&record, 0, "name")?.parse()?;
        let level: f64 = column(&record, 1, "level_multiplier")?
            .parse()
            .map_err(|e| ForecastError::Parse(format!("level_multiplier: {}", e)))?;
        let growth: f64 = column(&record, 2, "monthly_growth")?
            .parse()
            .map_err(|e| ForecastError::Parse(format!("monthly_growth: {}", e)))?;
        configs.push(ScenarioConfig::new(name, level, growth));
    }

    configs.sort_by_key(|c| c.name);
    let configs: [ScenarioConfig; 3] = configs.try_into().map_err(|rows: Vec<ScenarioConfig>| {
        ForecastError::invalid_input("scenario_catalog", format!("expected 3 scenarios, found {}", rows.len()))
    })?;

    ScenarioCatalog::new(configs)
}

/// All assumption files from one directory
pub struct LoadedAssumptions {
    pub cost_breakdown: CostBreakdown,
    pub seasonal_overrides: Vec<(CalendarMonth, f64)>,
    pub scenario_catalog: ScenarioCatalog,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> ForecastResult<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> ForecastResult<Self> {
        Ok(Self {
            cost_breakdown: load_cost_breakdown(path)?,
            seasonal_overrides: load_seasonal_overrides(path)?,
            scenario_catalog: load_scenario_catalog(path)?,
        })
    }
}
