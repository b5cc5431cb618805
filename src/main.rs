//! Fincast CLI
//!
//! Command-line interface for projecting and simulating a household
//! scenario JSON file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fincast::goal::plan_goals;
use fincast::household::{self, ScenarioInput};
use fincast::{MonteCarloConfig, ScenarioRunner};

#[derive(Parser)]
#[command(name = "fincast", version, about = "Household projection and simulation engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the deterministic projection
    Project {
        /// Scenario JSON file; a built-in sample household runs when omitted
        scenario: Option<PathBuf>,

        /// Emit the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run the Monte Carlo simulation
    Simulate {
        /// Scenario JSON file; a built-in sample household runs when omitted
        scenario: Option<PathBuf>,

        #[arg(long, default_value_t = 500)]
        trials: usize,

        /// Annual return volatility in percent
        #[arg(long, default_value_t = 15.0)]
        volatility: f64,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Emit the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Analyze goal funding at the anchor date
    Goals {
        /// Scenario JSON file; a built-in sample household runs when omitted
        scenario: Option<PathBuf>,

        /// Monthly savings capacity to allocate across goals
        #[arg(long, default_value_t = 1_000.0)]
        monthly_capacity: f64,

        /// Annual growth assumption for goal savings (decimal)
        #[arg(long, default_value_t = 0.05)]
        growth: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Project { scenario, json } => {
            let input = load(scenario.as_deref())?;
            let result = ScenarioRunner::new().project(&input)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!("Projection: {} -> {}\n", input.start_date, input.end_date);
            println!(
                "{:<6} {:>14} {:>14} {:>12} {:>12} {:>14}",
                "Year", "Income", "Expenses", "Taxes", "Savings", "Net Worth"
            );
            for row in &result.annual {
                println!(
                    "{:<6} {:>14.2} {:>14.2} {:>12.2} {:>12.2} {:>14.2}",
                    row.year,
                    row.total_income,
                    row.total_expenses,
                    row.taxes,
                    row.net_savings,
                    row.end_net_worth
                );
            }

            let summary = result.summary();
            println!();
            println!("Final net worth:  ${:.2}", summary.final_net_worth);
            println!("Total taxes paid: ${:.2}", summary.total_taxes);
            if !result.excluded_items.is_empty() {
                println!("Excluded items:   {}", result.excluded_items.join(", "));
            }
        }

        Command::Simulate {
            scenario,
            trials,
            volatility,
            seed,
            json,
        } => {
            let input = load(scenario.as_deref())?;
            let config = MonteCarloConfig {
                trials,
                volatility_pct: volatility,
                seed,
            };
            let result = ScenarioRunner::new().simulate(&input, config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!(
                "Simulation: {} trials at {:.1}% volatility\n",
                result.trials, result.volatility_pct
            );
            println!("Success rate:     {:.1}%", result.success_rate * 100.0);
            println!("Median final NW:  ${:.2}", result.median_final_net_worth);
            println!("P10 final NW:     ${:.2}", result.p10_final_net_worth);
            println!("P90 final NW:     ${:.2}", result.p90_final_net_worth);
            for goal in &result.goal_success_rates {
                println!(
                    "Goal '{}':  {:.1}% of trials reach target",
                    goal.name,
                    goal.success_rate * 100.0
                );
            }
        }

        Command::Goals {
            scenario,
            monthly_capacity,
            growth,
        } => {
            let input = load(scenario.as_deref())?;
            let plan = plan_goals(
                input.total_account_value(),
                monthly_capacity,
                growth,
                input.anchor_date,
                &input.goals,
            );

            println!(
                "Goal funding from ${:.2} current savings\n",
                plan.total_allocated
            );
            for goal in &plan.goals {
                println!("{} (share {:.0}%)", goal.name, goal.share * 100.0);
                println!("  allocated:      ${:.2}", goal.allocated);
                match goal.required_monthly_contribution {
                    Some(required) => println!("  required/month: ${required:.2}"),
                    None => println!("  required/month: n/a (no target date)"),
                }
                match goal.projected_completion_months {
                    Some(months) => println!("  completion in:  {months} months"),
                    None => println!("  completion in:  not achievable within 50 years"),
                }
                println!("  on track:       {}", goal.on_track);
            }
        }
    }

    Ok(())
}

fn load(path: Option<&std::path::Path>) -> Result<ScenarioInput> {
    match path {
        Some(p) => Ok(household::load_scenario(p)?),
        None => Ok(ScenarioInput::sample()),
    }
}
