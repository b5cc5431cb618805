//! Scenario runner for efficient batch runs
//!
//! Pre-loads tax tables once, then allows running many projections and
//! simulations with different configurations without re-reading assumption
//! files.

use std::path::Path;

use crate::error::EngineError;
use crate::household::ScenarioInput;
use crate::montecarlo::{MonteCarloConfig, MonteCarloEngine, MonteCarloResult};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use crate::tax::TaxTables;

/// Pre-loaded runner for batch projections and simulations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let projection = runner.project(&input)?;
/// for volatility in [10.0, 15.0, 25.0] {
///     let config = MonteCarloConfig { volatility_pct: volatility, ..Default::default() };
///     let result = runner.simulate(&input, config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    tables: TaxTables,
}

impl ScenarioRunner {
    /// Runner with built-in 2024 tax tables
    pub fn new() -> Self {
        Self {
            tables: TaxTables::default_2024(),
        }
    }

    /// Runner with bracket overrides loaded from a CSV directory
    pub fn from_csv_path(path: &Path) -> Result<Self, EngineError> {
        Ok(Self {
            tables: TaxTables::from_csv_path(path)?,
        })
    }

    /// Runner with pre-built tables
    pub fn with_tables(tables: TaxTables) -> Self {
        Self { tables }
    }

    /// Deterministic projection under expected returns
    pub fn project(&self, input: &ScenarioInput) -> Result<ProjectionResult, EngineError> {
        let engine = ProjectionEngine::new(self.tables.clone(), ProjectionConfig::default());
        engine.project(input)
    }

    /// Monte Carlo simulation with the given config
    pub fn simulate(
        &self,
        input: &ScenarioInput,
        config: MonteCarloConfig,
    ) -> Result<MonteCarloResult, EngineError> {
        let engine = MonteCarloEngine::new(self.tables.clone(), config);
        engine.simulate(input)
    }

    /// Run one scenario across several volatility assumptions
    pub fn volatility_sweep(
        &self,
        input: &ScenarioInput,
        volatilities_pct: &[f64],
        base: MonteCarloConfig,
    ) -> Result<Vec<MonteCarloResult>, EngineError> {
        volatilities_pct
            .iter()
            .map(|&volatility_pct| {
                self.simulate(
                    input,
                    MonteCarloConfig {
                        volatility_pct,
                        ..base
                    },
                )
            })
            .collect()
    }

    /// Get reference to the loaded tables for inspection
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runner_projects_and_simulates() {
        let runner = ScenarioRunner::new();
        let mut input = ScenarioInput::sample();
        input.end_date = chrono::NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();

        let projection = runner.project(&input).unwrap();
        assert_eq!(projection.annual.len(), 3);

        let config = MonteCarloConfig {
            trials: 50,
            ..Default::default()
        };
        let simulation = runner.simulate(&input, config).unwrap();
        assert_eq!(simulation.trials, 50);
    }

    #[test]
    fn test_volatility_sweep_ordering() {
        let runner = ScenarioRunner::new();
        let mut input = ScenarioInput::sample();
        input.end_date = chrono::NaiveDate::from_ymd_opt(2027, 12, 31).unwrap();

        let base = MonteCarloConfig {
            trials: 50,
            ..Default::default()
        };
        let results = runner
            .volatility_sweep(&input, &[5.0, 40.0], base)
            .unwrap();
        assert_eq!(results.len(), 2);

        // Wider volatility spreads the band at the final step
        let narrow = &results[0].bands.last().unwrap();
        let wide = &results[1].bands.last().unwrap();
        assert!(wide.p90 - wide.p10 > narrow.p90 - narrow.p10);
    }
}
