//! Cash Flow Forecast CLI
//!
//! Loads revenue history and a cost breakdown, forecasts the cash position
//! and prints KPIs, the projection, transfers and investment advice.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cashflow_forecast::assumptions::{loader::DEFAULT_ASSUMPTIONS_PATH, CostSanityBand, LoadedAssumptions};
use cashflow_forecast::history::{load_history, DEFAULT_HISTORY_PATH};
use cashflow_forecast::{
    run_sensitivity, Assumptions, CashflowReport, EngineInputs, ForecastEngine, SensitivityConfig,
    SessionConfig,
};
use chrono::NaiveDate;
use clap::Parser;

/// Forecast cash position and liquidity for a services company
#[derive(Parser, Debug)]
#[command(name = "cashflow_forecast", version, about)]
struct Cli {
    /// Revenue history CSV (date,amount,client_id)
    #[arg(long, default_value = DEFAULT_HISTORY_PATH)]
    history: PathBuf,

    /// Directory holding cost_breakdown.csv and optional overrides
    #[arg(long, default_value = DEFAULT_ASSUMPTIONS_PATH)]
    costs: PathBuf,

    /// Cash on hand today
    #[arg(long, default_value_t = 0.0)]
    cash: f64,

    /// Months of burn held as minimum reserve (1, 2 or 3)
    #[arg(long, default_value_t = 2)]
    buffer_months: u32,

    /// Days needed to liquidate investments (7, 15 or 30)
    #[arg(long, default_value_t = 15)]
    lead_days: u32,

    /// Conservative, Moderate or Optimistic
    #[arg(long, default_value = "Moderate")]
    scenario: String,

    /// Months to project (1-12)
    #[arg(long, default_value_t = 12)]
    horizon: u32,

    /// Forecast date (YYYY-MM-DD); projection starts the following month
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Replace the derived December factor with the smoothed value
    #[arg(long)]
    smooth_december: bool,

    /// Project flat trend revenue without seasonal factors
    #[arg(long)]
    no_seasonality: bool,

    /// Projection CSV output path
    #[arg(long, default_value = "forecast_output.csv")]
    output: PathBuf,

    /// Print the full report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Earlier JSON report to compare KPIs against
    #[arg(long)]
    previous_report: Option<PathBuf>,

    /// Run a seeded sensitivity analysis with this many paths
    #[arg(long)]
    sensitivity_paths: Option<u32>,

    /// Seed for the sensitivity analysis
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let session = SessionConfig {
        cash_on_hand: cli.cash,
        buffer_months: cli.buffer_months,
        liquidation_lead_days: cli.lead_days,
        scenario: cli.scenario.clone(),
        horizon_months: cli.horizon,
    };
    let as_of = cli.as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut config = session.validate().context("Invalid forecast settings")?.starting_after(as_of);
    config.apply_seasonality = !cli.no_seasonality;

    let dataset = load_history(&cli.history)
        .with_context(|| format!("Failed to load history from {}", cli.history.display()))?;
    let loaded = LoadedAssumptions::load_from(&cli.costs)
        .with_context(|| format!("Failed to load assumptions from {}", cli.costs.display()))?;

    let mut assumptions = Assumptions::from_history(&dataset, &loaded.cost_breakdown, &CostSanityBand::default());
    assumptions.seasonality = assumptions.seasonality.with_overrides(&loaded.seasonal_overrides)?;
    if cli.smooth_december {
        assumptions.seasonality = assumptions.seasonality.with_december_smoothing();
    }
    assumptions.scenarios = loaded.scenario_catalog;

    for substitution in &assumptions.cost_substitutions {
        println!(
            "Note: {} of {:.2} outside plausible range, using {:.2}",
            substitution.field, substitution.extracted, substitution.substituted
        );
    }

    let engine = ForecastEngine::new(assumptions.clone(), config.clone());
    let result = engine.project(cli.cash)?;
    let mut report = CashflowReport::build(as_of, &dataset, &result);
    if let Some(path) = &cli.previous_report {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let previous: CashflowReport = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse report {}", path.display()))?;
        report = report.with_previous(&previous.kpis);
    }

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    report
        .write_projection_csv(&cli.output)
        .with_context(|| format!("Unable to write {}", cli.output.display()))?;
    if !cli.json {
        println!("\nProjection written to: {}", cli.output.display());
    }

    if let Some(paths) = cli.sensitivity_paths {
        let inputs = EngineInputs::new(assumptions, config, cli.cash);
        let sensitivity = SensitivityConfig { paths, seed: cli.seed, ..Default::default() };
        let summary = run_sensitivity(&inputs, &sensitivity)?;

        println!("\nSensitivity ({} paths, seed {}):", summary.paths, summary.seed);
        println!("  Final balance P5:  ${:.2}", summary.p5_final_balance);
        println!("  Final balance P50: ${:.2}", summary.p50_final_balance);
        println!("  Final balance P95: ${:.2}", summary.p95_final_balance);
        println!("  P(balance < 0):    {:.1}%", summary.probability_negative_balance * 100.0);
        println!("  Median runway:     {}", summary.median_runway);
    }

    Ok(())
}

fn print_report(report: &CashflowReport) {
    println!("Cash Flow Forecast v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");

    if report.awaiting_data {
        println!("Awaiting data: no revenue history or cost breakdown loaded.");
        return;
    }

    let kpis = &report.kpis;
    println!("Scenario: {}  (as of {})", report.scenario, report.report_date);
    println!("  Cash available:     ${:.2}", kpis.cash_available);
    println!("  Monthly revenue:    ${:.2}", kpis.monthly_revenue);
    println!("  Burn rate:          ${:.2}", kpis.burn_rate);
    println!("  Runway:             {}", kpis.runway);
    println!("  Margin:             {:.1}%", kpis.margin * 100.0);
    println!("  Balance in 3 months: ${:.2}", kpis.projected_three_month_balance);
    println!("  Surplus vs reserve: ${:.2}", kpis.surplus_vs_reserve);
    if let Some(variation) = &report.kpi_variation {
        println!(
            "  Change vs previous: cash {:+.1}%, revenue {:+.1}%, burn {:+.1}%",
            variation.cash_pct, variation.revenue_pct, variation.burn_rate_pct
        );
    }

    println!("\nProjection:");
    println!(
        "{:>9} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Revenue", "Outflow", "Net Flow", "Transfer", "Balance"
    );
    println!("{}", "-".repeat(84));
    for line in &report.projection {
        println!(
            "{:>9} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            line.label, line.revenue, line.outflow, line.net_flow, line.transfer, line.balance_after_transfer
        );
    }

    println!("\nQuarterly transfers:");
    for quarter in &report.quarterly_transfers {
        println!(
            "  Q{} (months {}-{}): revenue ${:.2}, net ${:.2}, retained ${:.2}, transfer ${:.2}",
            quarter.quarter_index,
            quarter.first_month,
            quarter.last_month,
            quarter.revenue,
            quarter.net_flow,
            quarter.required_local_profit,
            quarter.transfer
        );
    }

    if report.recommendations.is_empty() {
        println!("\nNo surplus above the reserve buffer.");
    } else {
        println!("\nInvestment recommendations:");
        for rec in &report.recommendations {
            println!(
                "  Month {:>2}: invest ${:.2}, yield ${:.2}/month, liquidate before month {}",
                rec.month_index, rec.investable_amount, rec.expected_monthly_yield, rec.liquidate_before_month
            );
        }
    }

    if !report.quarterly_history.is_empty() {
        println!("\nQuarterly revenue history:");
        for quarter in &report.quarterly_history {
            println!("  {:<8} ${:.2}", quarter.label, quarter.revenue);
        }
    }

    if !report.top_clients.is_empty() {
        println!("\nTop clients:");
        for client in &report.top_clients {
            println!("  {:<24} ${:.2}", client.client, client.revenue);
        }
    }
}
