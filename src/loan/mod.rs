//! Loan amortization and payoff analysis

mod schedule;

pub use schedule::{
    accelerated_payoff, amortization_schedule, monthly_payment, AmortizationRow,
    PayoffComparison, MAX_PAYOFF_MONTHS,
};
