//! Run a Monte Carlo batch for a scenario and write percentile bands to CSV
//!
//! Output format is one row per month with the five net-worth bands, for
//! comparison across volatility assumptions.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use fincast::household::{self, ScenarioInput};
use fincast::{MonteCarloConfig, ScenarioRunner};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let input = match args.get(1) {
        Some(path) => household::load_scenario(&PathBuf::from(path))?,
        None => ScenarioInput::sample(),
    };

    let runner = ScenarioRunner::new();
    let volatilities = [10.0, 15.0, 25.0];

    println!(
        "Simulating {} -> {} across {:?}% volatility...",
        input.start_date, input.end_date, volatilities
    );
    let start = Instant::now();

    let base = MonteCarloConfig {
        trials: 1_000,
        ..Default::default()
    };
    let results = runner.volatility_sweep(&input, &volatilities, base)?;

    println!(
        "Completed {} runs of {} trials in {:?}",
        results.len(),
        base.trials,
        start.elapsed()
    );

    for result in &results {
        println!(
            "  vol {:>5.1}%: success {:>5.1}%, median final ${:.0}",
            result.volatility_pct,
            result.success_rate * 100.0,
            result.median_final_net_worth
        );
    }

    // Write the middle-volatility bands for charting
    let bands = &results[1].bands;
    let mut file = File::create("percentile_bands.csv")?;
    writeln!(file, "date,p10,p25,p50,p75,p90")?;
    for band in bands {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2}",
            band.date, band.p10, band.p25, band.p50, band.p75, band.p90
        )?;
    }
    println!("Wrote {} rows to percentile_bands.csv", bands.len());

    Ok(())
}
