//! Monte Carlo simulation over the deterministic projection engine
//!
//! Runs N independent trials with per-period stochastic account returns
//! while incomes, expenses, loan payments, and taxes stay deterministic.
//! Trials are seeded individually from the base seed, so a fixed config
//! produces identical output whether trials run in parallel or not.

use chrono::NaiveDate;
use log::{debug, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dates::months_between;
use crate::error::EngineError;
use crate::household::ScenarioInput;
use crate::projection::{ProjectionConfig, ProjectionEngine, ReturnModel};
use crate::tax::TaxTables;

pub const MIN_TRIALS: usize = 50;
pub const MAX_TRIALS: usize = 2_000;
pub const MIN_VOLATILITY_PCT: f64 = 1.0;
pub const MAX_VOLATILITY_PCT: f64 = 50.0;

/// Simulation parameters. Out-of-range values are clamped, not rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    pub trials: usize,
    /// Annual return standard deviation in PERCENT (15.0 = 15%)
    pub volatility_pct: f64,
    pub seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 500,
            volatility_pct: 15.0,
            seed: 42,
        }
    }
}

impl MonteCarloConfig {
    /// Clamp parameters into their safe ranges, logging any adjustment
    fn clamped(self) -> Self {
        let trials = self.trials.clamp(MIN_TRIALS, MAX_TRIALS);
        if trials != self.trials {
            warn!(
                "trial count {} clamped to {} (allowed {}..={})",
                self.trials, trials, MIN_TRIALS, MAX_TRIALS
            );
        }
        let volatility_pct = self
            .volatility_pct
            .clamp(MIN_VOLATILITY_PCT, MAX_VOLATILITY_PCT);
        if volatility_pct != self.volatility_pct {
            warn!(
                "volatility {}% clamped to {}% (allowed {}..={}%)",
                self.volatility_pct, volatility_pct, MIN_VOLATILITY_PCT, MAX_VOLATILITY_PCT
            );
        }
        Self {
            trials,
            volatility_pct,
            seed: self.seed,
        }
    }
}

/// Net-worth distribution at one time step across all trials
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PercentileBands {
    pub date: NaiveDate,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
}

/// Fraction of trials in which a goal's target was reached by its date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSuccessRate {
    pub goal_id: u32,
    pub name: String,
    pub success_rate: f64,
}

/// Aggregate simulation output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Parameters actually used, after clamping
    pub trials: usize,
    pub volatility_pct: f64,

    /// Per-step net-worth percentile bands
    pub bands: Vec<PercentileBands>,

    /// Fraction of trials ending with non-negative net worth
    pub success_rate: f64,

    pub goal_success_rates: Vec<GoalSuccessRate>,

    pub median_final_net_worth: f64,
    pub p10_final_net_worth: f64,
    pub p90_final_net_worth: f64,
}

/// Monte Carlo simulation engine
pub struct MonteCarloEngine {
    tables: TaxTables,
    config: MonteCarloConfig,
}

impl MonteCarloEngine {
    /// Create an engine; out-of-range config values are clamped here
    pub fn new(tables: TaxTables, config: MonteCarloConfig) -> Self {
        Self {
            tables,
            config: config.clamped(),
        }
    }

    /// Run all trials and aggregate percentile bands and success rates
    pub fn simulate(&self, input: &ScenarioInput) -> Result<MonteCarloResult, EngineError> {
        if input.total_account_value() <= 0.0 {
            return Err(EngineError::NoAccounts);
        }

        let volatility = self.config.volatility_pct / 100.0;
        debug!(
            "running {} trials at {:.1}% volatility",
            self.config.trials, self.config.volatility_pct
        );

        // Each trial is an independent deterministic run under its own seed
        let trial_series: Vec<Vec<f64>> = (0..self.config.trials)
            .into_par_iter()
            .map(|trial| {
                let config = ProjectionConfig {
                    returns: ReturnModel::Stochastic {
                        volatility,
                        seed: self.config.seed.wrapping_add(trial as u64),
                    },
                };
                let engine = ProjectionEngine::new(self.tables.clone(), config);
                engine
                    .project(input)
                    .map(|r| r.net_worth.iter().map(|p| p.value).collect())
            })
            .collect::<Result<_, _>>()?;

        // All trials share the horizon, so step dates come from any run
        let dates: Vec<NaiveDate> = ProjectionEngine::new(
            self.tables.clone(),
            ProjectionConfig::default(),
        )
        .project(input)?
        .net_worth
        .iter()
        .map(|p| p.date)
        .collect();

        let steps = dates.len();
        let mut bands = Vec::with_capacity(steps);
        let mut step_values = vec![0.0_f64; trial_series.len()];
        for (step, date) in dates.iter().enumerate() {
            for (trial, series) in trial_series.iter().enumerate() {
                step_values[trial] = series[step];
            }
            step_values.sort_by(|a, b| a.total_cmp(b));
            bands.push(PercentileBands {
                date: *date,
                p10: percentile_sorted(&step_values, 10.0),
                p25: percentile_sorted(&step_values, 25.0),
                p50: percentile_sorted(&step_values, 50.0),
                p75: percentile_sorted(&step_values, 75.0),
                p90: percentile_sorted(&step_values, 90.0),
            });
        }

        let mut final_values: Vec<f64> = trial_series
            .iter()
            .map(|s| s.last().copied().unwrap_or(0.0))
            .collect();
        final_values.sort_by(|a, b| a.total_cmp(b));
        let successes = final_values.iter().filter(|v| **v >= 0.0).count();

        let goal_success_rates = self.goal_success_rates(input, &trial_series, &dates);

        Ok(MonteCarloResult {
            trials: self.config.trials,
            volatility_pct: self.config.volatility_pct,
            bands,
            success_rate: successes as f64 / trial_series.len() as f64,
            goal_success_rates,
            median_final_net_worth: percentile_sorted(&final_values, 50.0),
            p10_final_net_worth: percentile_sorted(&final_values, 10.0),
            p90_final_net_worth: percentile_sorted(&final_values, 90.0),
        })
    }

    /// Per-goal success: net worth at the goal's target-date step meets
    /// the target amount. Undated goals and goals before the horizon are
    /// excluded; targets past the horizon are measured at the final step.
    fn goal_success_rates(
        &self,
        input: &ScenarioInput,
        trial_series: &[Vec<f64>],
        dates: &[NaiveDate],
    ) -> Vec<GoalSuccessRate> {
        let last_step = dates.len().saturating_sub(1);
        input
            .goals
            .iter()
            .filter_map(|goal| {
                let target_date = goal.target_date?;
                let offset = months_between(input.start_date, target_date);
                if offset < 0 {
                    warn!(
                        "goal '{}' targets a date before the horizon, excluding",
                        goal.name
                    );
                    return None;
                }
                let step = (offset as usize).min(last_step);
                let hits = trial_series
                    .iter()
                    .filter(|series| series[step] >= goal.target_amount)
                    .count();
                Some(GoalSuccessRate {
                    goal_id: goal.id,
                    name: goal.name.clone(),
                    success_rate: hits as f64 / trial_series.len() as f64,
                })
            })
            .collect()
    }
}

/// Nearest-rank percentile over a pre-sorted slice
fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (pct / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(config: MonteCarloConfig) -> MonteCarloEngine {
        MonteCarloEngine::new(TaxTables::default_2024(), config)
    }

    fn small_config() -> MonteCarloConfig {
        MonteCarloConfig {
            trials: 50,
            volatility_pct: 15.0,
            seed: 42,
        }
    }

    fn short_scenario() -> ScenarioInput {
        let mut input = ScenarioInput::sample();
        input.end_date = chrono::NaiveDate::from_ymd_opt(2029, 12, 31).unwrap();
        input
    }

    #[test]
    fn test_band_ordering_at_every_step() {
        let result = engine_with(small_config())
            .simulate(&short_scenario())
            .unwrap();
        for band in &result.bands {
            assert!(band.p10 <= band.p25);
            assert!(band.p25 <= band.p50);
            assert!(band.p50 <= band.p75);
            assert!(band.p75 <= band.p90);
        }
    }

    #[test]
    fn test_fixed_seed_reproducible() {
        let input = short_scenario();
        let a = engine_with(small_config()).simulate(&input).unwrap();
        let b = engine_with(small_config()).simulate(&input).unwrap();
        assert_eq!(a.median_final_net_worth, b.median_final_net_worth);
        for (ba, bb) in a.bands.iter().zip(&b.bands) {
            assert_eq!(ba.p50, bb.p50);
        }
    }

    #[test]
    fn test_parameters_clamped() {
        let config = MonteCarloConfig {
            trials: 5,
            volatility_pct: 99.0,
            seed: 1,
        };
        let result = engine_with(config).simulate(&short_scenario()).unwrap();
        assert_eq!(result.trials, MIN_TRIALS);
        assert_eq!(result.volatility_pct, MAX_VOLATILITY_PCT);
    }

    #[test]
    fn test_no_accounts_is_typed_failure() {
        let mut input = short_scenario();
        input.accounts.clear();
        assert!(matches!(
            engine_with(small_config()).simulate(&input),
            Err(EngineError::NoAccounts)
        ));
    }

    #[test]
    fn test_goal_success_rates_present_for_dated_goals() {
        let result = engine_with(small_config())
            .simulate(&short_scenario())
            .unwrap();
        // Sample scenario has two dated goals
        assert_eq!(result.goal_success_rates.len(), 2);
        for goal in &result.goal_success_rates {
            assert!((0.0..=1.0).contains(&goal.success_rate));
        }
    }

    #[test]
    fn test_success_rate_high_for_strong_saver() {
        let result = engine_with(small_config())
            .simulate(&short_scenario())
            .unwrap();
        // Positive monthly savings on a large starting balance: ruin
        // within five years should be essentially impossible
        assert!(result.success_rate > 0.9);
    }

    #[test]
    fn test_bands_cover_horizon() {
        let result = engine_with(small_config())
            .simulate(&short_scenario())
            .unwrap();
        assert_eq!(result.bands.len(), 60);
    }

    #[test]
    fn test_percentile_sorted_edges() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&values, 0.0), 1.0);
        assert_eq!(percentile_sorted(&values, 50.0), 3.0);
        assert_eq!(percentile_sorted(&values, 100.0), 5.0);
        assert_eq!(percentile_sorted(&[], 50.0), 0.0);
    }
}
