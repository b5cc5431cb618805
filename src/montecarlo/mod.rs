//! Stochastic (Monte Carlo) simulation over the projection engine

mod engine;

pub use engine::{
    GoalSuccessRate, MonteCarloConfig, MonteCarloEngine, MonteCarloResult, PercentileBands,
    MAX_TRIALS, MAX_VOLATILITY_PCT, MIN_TRIALS, MIN_VOLATILITY_PCT,
};
