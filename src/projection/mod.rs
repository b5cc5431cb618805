//! Deterministic projection: monthly state advance rolled into annual
//! summaries and time series

mod engine;
mod output;
mod state;

pub use engine::{ProjectionConfig, ProjectionEngine, ReturnModel};
pub use output::{AnnualSummaryRow, ProjectionResult, ProjectionSummary, SeriesPoint};
pub use state::{AccountPosition, LoanPosition, ProjectionState};
