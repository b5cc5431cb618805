//! Cadence normalization for declared income and expense amounts
//!
//! Every component converts declared amounts through these two functions so
//! the multiplier table has exactly one home.

use serde::{Deserialize, Serialize};

/// Cadence at which an income or expense amount is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Monthly,
    Biweekly,
    Weekly,
    Annual,
    /// Occurs once, on the item's start date; never part of a recurring rate
    OneTime,
}

impl Frequency {
    /// Occurrences per year. OneTime is 0: it must never leak into a
    /// recurring monthly or annual rate.
    pub fn multiplier(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::Monthly => 12,
            Frequency::Biweekly => 26,
            Frequency::Weekly => 52,
            Frequency::OneTime => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::Biweekly => "biweekly",
            Frequency::Weekly => "weekly",
            Frequency::Annual => "annual",
            Frequency::OneTime => "one-time",
        }
    }
}

/// Declared amount expressed as an annual recurring total
pub fn annualized(amount: f64, frequency: Frequency) -> f64 {
    amount * frequency.multiplier() as f64
}

/// Declared amount expressed as a monthly recurring rate
pub fn monthly_rate(amount: f64, frequency: Frequency) -> f64 {
    annualized(amount, frequency) / 12.0
}
