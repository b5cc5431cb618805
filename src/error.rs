//! Typed errors surfaced at the engine boundary
//!
//! Malformed *items* never produce an error: they are skipped and logged
//! (see the projection engine). These variants cover genuine input defects
//! that make a whole run meaningless.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Projection horizon has zero or negative length
    #[error("projection horizon is empty: start {start} is not before end {end}")]
    EmptyHorizon { start: NaiveDate, end: NaiveDate },

    /// Simulation requested on a scenario with no account to grow
    #[error("scenario has no accounts with a positive balance")]
    NoAccounts,

    /// Bracket table failed validation (unsorted, overlapping, or negative rate)
    #[error("invalid tax bracket table: {0}")]
    InvalidBrackets(String),

    /// Scenario or assumption file could not be read
    #[error("failed to read input file")]
    Io(#[from] std::io::Error),

    /// Scenario JSON did not match the expected shape
    #[error("failed to parse scenario JSON")]
    Json(#[from] serde_json::Error),

    /// Assumption CSV row could not be parsed
    #[error("failed to parse assumption CSV")]
    Csv(#[from] csv::Error),
}
