//! Fincast - household financial projection and simulation engine
//!
//! This library provides:
//! - Deterministic multi-year cash-flow and net-worth projections
//! - Monte Carlo simulation with percentile bands and success rates
//! - Progressive bracket, payroll, and capital-gains tax estimation
//! - Loan amortization and accelerated-payoff analysis
//! - Priority-weighted goal funding and portfolio drift analysis
//!
//! Every entry point is a pure function of its inputs; randomness is
//! confined to the Monte Carlo engine and fully seedable.

pub mod allocation;
pub mod dates;
pub mod error;
pub mod goal;
pub mod household;
pub mod loan;
pub mod montecarlo;
pub mod projection;
pub mod scenario;
pub mod tax;

// Re-export commonly used types
pub use error::EngineError;
pub use household::{Frequency, ScenarioInput};
pub use montecarlo::{MonteCarloConfig, MonteCarloEngine, MonteCarloResult, PercentileBands};
pub use projection::{AnnualSummaryRow, ProjectionEngine, ProjectionResult, SeriesPoint};
pub use scenario::ScenarioRunner;
pub use tax::TaxTables;
