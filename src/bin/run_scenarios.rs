//! Run all three scenarios from the shipped data and write one CSV row per
//! (scenario, month)

use std::fs::File;
use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use cashflow_forecast::{ProjectionConfig, ScenarioRunner};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let cash: f64 = match args.get(1) {
        Some(value) => value.parse().context("Cash on hand must be a number")?,
        None => 250_000.0,
    };
    let horizon: u32 = match args.get(2) {
        Some(value) => value.parse().context("Horizon must be a whole number of months")?,
        None => 12,
    };

    let start = Instant::now();
    println!("Loading history and assumptions...");
    let runner = ScenarioRunner::from_csv().context("Failed to load default data")?;
    println!(
        "Baseline revenue ${:.2}, burn rate ${:.2} (loaded in {:?})",
        runner.assumptions().baseline_revenue,
        runner.assumptions().burn_rate(),
        start.elapsed()
    );

    let as_of = chrono::Local::now().date_naive();
    let config = ProjectionConfig { horizon_months: horizon, ..Default::default() }.starting_after(as_of);
    let results = runner.run_all(&config, cash)?;

    let output_path = "scenario_projection_output.csv";
    let mut file = File::create(output_path).context("Failed to create output file")?;
    writeln!(file, "Scenario,Month,CalendarMonth,Revenue,Outflow,NetFlow,BalanceBeforeTransfer,Transfer,BalanceAfterTransfer")?;

    for result in &results {
        for (point, balance) in result.points.iter().zip(&result.transfers.balance_timeline) {
            writeln!(
                file,
                "{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                result.scenario.name,
                point.month_index,
                result.calendar_month(point.month_index),
                point.revenue,
                point.outflow,
                point.net_flow,
                balance.balance_before_transfer,
                balance.transfer_amount,
                balance.balance_after_transfer,
            )?;
        }
    }

    println!("\n{:<14} {:>16} {:>16} {:>14}", "Scenario", "Final Balance", "Transferred", "Runway");
    println!("{}", "-".repeat(64));
    for result in &results {
        println!(
            "{:<14} {:>16.2} {:>16.2} {:>14}",
            result.scenario.name.to_string(),
            result.final_balance(),
            result.transfers.total_transferred,
            result.kpis.runway.to_string()
        );
    }

    println!("\nOutput written to {} in {:?}", output_path, start.elapsed());
    Ok(())
}
