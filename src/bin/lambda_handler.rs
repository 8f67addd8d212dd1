//! AWS Lambda handler for cash-flow forecasts
//!
//! Accepts session settings (and optionally uploaded history and costs) as
//! JSON and returns the selected scenario's report plus all three scenario
//! series. Supports Lambda Function URLs for direct HTTP access.

use std::collections::HashMap;
use std::time::Instant;

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use cashflow_forecast::assumptions::{CostBreakdown, CostSanityBand, CostSubstitution, LoadedAssumptions};
use cashflow_forecast::history::load_default_history;
use cashflow_forecast::{
    run_sensitivity, Assumptions, CashflowReport, DataOrigin, DataSource, EngineInputs, ForecastError,
    ForecastResult, HistoricalDataset, KpiSnapshot, RevenueRecord, Runway, ScenarioRunner, SensitivityConfig,
    SensitivitySummary, SessionConfig,
};
use chrono::NaiveDate;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{error, info};
use serde::{Deserialize, Serialize};

/// Input settings for a forecast
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub cash_on_hand: f64,

    /// Months of burn held as reserve (1, 2 or 3)
    #[serde(default = "default_buffer_months")]
    pub buffer_months: u32,

    /// Days to liquidate investments (7, 15 or 30)
    #[serde(default = "default_lead_days")]
    pub liquidation_lead_days: u32,

    #[serde(default = "default_scenario")]
    pub scenario: String,

    #[serde(default = "default_horizon")]
    pub horizon_months: u32,

    /// Forecast date; defaults to today
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    #[serde(default)]
    pub smooth_december: bool,

    #[serde(default = "default_true")]
    pub apply_seasonality: bool,

    /// Uploaded revenue records; the demo history is used when absent
    #[serde(default)]
    pub history: Option<Vec<RevenueRecord>>,

    /// Uploaded cost breakdown; the demo breakdown is used when absent
    #[serde(default)]
    pub cost_breakdown: Option<CostBreakdown>,

    /// KPIs from an earlier run, for percent-change reporting
    #[serde(default)]
    pub previous_kpis: Option<KpiSnapshot>,

    /// Opt-in seeded sensitivity analysis
    #[serde(default)]
    pub sensitivity: Option<SensitivityConfig>,
}

fn default_buffer_months() -> u32 { 2 }
fn default_lead_days() -> u32 { 15 }
fn default_scenario() -> String { "Moderate".to_string() }
fn default_horizon() -> u32 { 6 }
fn default_true() -> bool { true }

/// One scenario's monthly series
#[derive(Debug, Serialize)]
pub struct ScenarioSeries {
    pub scenario: String,
    pub revenue: Vec<f64>,
    pub outflow: Vec<f64>,
    pub net_flow: Vec<f64>,
    pub balance_before_transfer: Vec<f64>,
    pub balance_after_transfer: Vec<f64>,
    pub total_transferred: f64,
    pub final_balance: f64,
    pub runway: Runway,
}

/// Output from the forecast
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub data_source: DataOrigin,
    pub report: CashflowReport,
    pub scenarios: Vec<ScenarioSeries>,
    pub cost_substitutions: Vec<CostSubstitution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivitySummary>,
    pub execution_time_ms: u64,
}

/// Function URL response envelope
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

fn cors_headers() -> HashMap<String, String> {
    HashMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        ("Access-Control-Allow-Methods".to_string(), "POST, OPTIONS".to_string()),
        ("Access-Control-Allow-Headers".to_string(), "Content-Type".to_string()),
    ])
}

fn error_response(status_code: u16, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        headers: cors_headers(),
        body: serde_json::json!({ "error": message }).to_string(),
    }
}

/// Client mistakes are 400, everything else 500
fn status_for(err: &ForecastError) -> u16 {
    match err {
        ForecastError::InvalidScenario(_)
        | ForecastError::InvalidInput { .. }
        | ForecastError::InvalidTransition { .. }
        | ForecastError::Parse(_) => 400,
        ForecastError::Csv(_) | ForecastError::Io(_) | ForecastError::Serialization(_) => 500,
    }
}

fn forecast(request: ForecastRequest) -> ForecastResult<ForecastResponse> {
    let start = Instant::now();

    let session = SessionConfig {
        cash_on_hand: request.cash_on_hand,
        buffer_months: request.buffer_months,
        liquidation_lead_days: request.liquidation_lead_days,
        scenario: request.scenario.clone(),
        horizon_months: request.horizon_months,
    };
    let as_of = request.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut config = session.validate()?.starting_after(as_of);
    config.apply_seasonality = request.apply_seasonality;

    let source = match request.history {
        Some(records) => DataSource::default()
            .begin_upload()?
            .complete_upload(DataOrigin::Upload, HistoricalDataset::new(records))?,
        None => DataSource::default().load_demo(load_default_history()?),
    };
    let (data_source, dataset) = match (source.origin(), source.dataset()) {
        (Some(origin), Some(dataset)) => (origin, dataset),
        _ => {
            return Err(ForecastError::InvalidTransition {
                from: source.to_string(),
                to: "forecast".to_string(),
            })
        }
    };
    let (breakdown, overrides, catalog) = match request.cost_breakdown {
        Some(breakdown) => (breakdown, Vec::new(), None),
        None => {
            let loaded = LoadedAssumptions::load_default()?;
            (loaded.cost_breakdown, loaded.seasonal_overrides, Some(loaded.scenario_catalog))
        }
    };

    let mut assumptions = Assumptions::from_history(dataset, &breakdown, &CostSanityBand::default());
    assumptions.seasonality = assumptions.seasonality.with_overrides(&overrides)?;
    if request.smooth_december {
        assumptions.seasonality = assumptions.seasonality.with_december_smoothing();
    }
    if let Some(catalog) = catalog {
        assumptions.scenarios = catalog;
    }

    let runner = ScenarioRunner::with_assumptions(assumptions.clone());
    let results = runner.run_all(&config, session.cash_on_hand)?;

    let selected = results
        .iter()
        .find(|r| r.scenario.name == config.scenario)
        .ok_or_else(|| ForecastError::InvalidScenario(request.scenario.clone()))?;
    let mut report = CashflowReport::build(as_of, dataset, selected);
    if let Some(previous) = &request.previous_kpis {
        report = report.with_previous(previous);
    }

    let scenarios = results
        .iter()
        .map(|result| ScenarioSeries {
            scenario: result.scenario.name.to_string(),
            revenue: result.points.iter().map(|p| p.revenue).collect(),
            outflow: result.points.iter().map(|p| p.outflow).collect(),
            net_flow: result.points.iter().map(|p| p.net_flow).collect(),
            balance_before_transfer: result.balances.iter().map(|b| b.balance_before_transfer).collect(),
            balance_after_transfer: result
                .transfers
                .balance_timeline
                .iter()
                .map(|b| b.balance_after_transfer)
                .collect(),
            total_transferred: result.transfers.total_transferred,
            final_balance: result.final_balance(),
            runway: result.kpis.runway,
        })
        .collect();

    let cost_substitutions = assumptions.cost_substitutions.clone();
    let sensitivity = match &request.sensitivity {
        Some(sensitivity) => {
            let inputs = EngineInputs::new(assumptions, config, session.cash_on_hand);
            Some(run_sensitivity(&inputs, sensitivity)?)
        }
        None => None,
    };

    Ok(ForecastResponse {
        data_source,
        report,
        scenarios,
        cost_substitutions,
        sensitivity,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<HttpResponse, Error> {
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(HttpResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        });
    }

    if request.is_base64_encoded {
        return Ok(error_response(400, "Binary request bodies are not supported"));
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());
    let forecast_request: ForecastRequest = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(error_response(400, &format!("Invalid JSON: {}", e))),
    };

    info!(
        "forecast request: scenario {}, horizon {}, cash {:.2}",
        forecast_request.scenario, forecast_request.horizon_months, forecast_request.cash_on_hand
    );

    match forecast(forecast_request) {
        Ok(response) => Ok(HttpResponse {
            status_code: 200,
            headers: cors_headers(),
            body: serde_json::to_string(&response)?,
        }),
        Err(e) => {
            error!("forecast failed: {}", e);
            Ok(error_response(status_for(&e), &e.to_string()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
