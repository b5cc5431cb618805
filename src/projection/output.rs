//! Projection output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar year of projection output
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnnualSummaryRow {
    pub year: i32,
    pub total_income: f64,
    pub total_expenses: f64,
    pub taxes: f64,
    pub loan_payments: f64,
    /// income - expenses - loan payments - taxes
    pub net_savings: f64,
    pub start_net_worth: f64,
    pub end_net_worth: f64,
}

/// A dated value in a time series
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Complete result of a deterministic projection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Year-by-year summary rows
    pub annual: Vec<AnnualSummaryRow>,

    /// Month-end net worth (accounts minus loan balances)
    pub net_worth: Vec<SeriesPoint>,

    /// Monthly net cash flow
    pub cash_flow: Vec<SeriesPoint>,

    /// Names of items excluded from the run (missing dates, non-positive
    /// amounts), surfaced for observability
    pub excluded_items: Vec<String>,
}

impl ProjectionResult {
    /// Headline statistics across the whole horizon
    pub fn summary(&self) -> ProjectionSummary {
        let final_net_worth = self.net_worth.last().map(|p| p.value).unwrap_or(0.0);
        let lowest_net_worth = self
            .net_worth
            .iter()
            .map(|p| p.value)
            .fold(f64::INFINITY, f64::min);

        ProjectionSummary {
            years: self.annual.len() as u32,
            total_income: self.annual.iter().map(|r| r.total_income).sum(),
            total_taxes: self.annual.iter().map(|r| r.taxes).sum(),
            total_savings: self.annual.iter().map(|r| r.net_savings).sum(),
            final_net_worth,
            lowest_net_worth: if lowest_net_worth.is_finite() {
                lowest_net_worth
            } else {
                0.0
            },
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub total_income: f64,
    pub total_taxes: f64,
    pub total_savings: f64,
    pub final_net_worth: f64,
    pub lowest_net_worth: f64,
}
