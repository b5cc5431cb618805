//! Portfolio allocation analysis: asset-class drift against a target
//! risk profile
//!
//! Classification is deliberately coarse: cash-kind accounts are Cash,
//! everything else is Stocks until holding-level bond data exists.
//! Goal-success and rebalancing behavior is tested against this
//! simplification; do not "fix" it silently.

use serde::{Deserialize, Serialize};

use crate::household::{AccountItem, AccountKind};

/// Allocation delta below which no action is suggested, in percentage
/// points
pub const DRIFT_TOLERANCE_PCT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::Cash => "cash",
        }
    }
}

/// Suggested direction to close an allocation gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftAction {
    Buy,
    Sell,
    Hold,
}

/// Target allocation percentages (percentage points, summing to 100)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskProfile {
    pub stocks_pct: f64,
    pub bonds_pct: f64,
    pub cash_pct: f64,
}

impl RiskProfile {
    pub fn conservative() -> Self {
        Self {
            stocks_pct: 40.0,
            bonds_pct: 40.0,
            cash_pct: 20.0,
        }
    }

    pub fn balanced() -> Self {
        Self {
            stocks_pct: 60.0,
            bonds_pct: 30.0,
            cash_pct: 10.0,
        }
    }

    pub fn aggressive() -> Self {
        Self {
            stocks_pct: 85.0,
            bonds_pct: 10.0,
            cash_pct: 5.0,
        }
    }

    fn target_for(&self, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stocks => self.stocks_pct,
            AssetClass::Bonds => self.bonds_pct,
            AssetClass::Cash => self.cash_pct,
        }
    }
}

/// One asset class row in the report
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassAllocation {
    pub class: AssetClass,
    pub current_value: f64,
    /// Current share of the portfolio, percentage points
    pub current_pct: f64,
    pub target_pct: f64,
    /// current - target, percentage points
    pub delta_pct: f64,
    pub action: DriftAction,
}

/// Full allocation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationReport {
    pub classes: Vec<ClassAllocation>,
    pub total_value: f64,
    /// Sum of absolute percentage deltas across classes; one scalar
    /// portfolio-health indicator
    pub drift_score: f64,
}

/// Cash-type accounts are Cash; all others count as Stocks pending
/// holding-level bond data
pub fn classify_account(kind: AccountKind) -> AssetClass {
    if kind.is_cash() {
        AssetClass::Cash
    } else {
        AssetClass::Stocks
    }
}

/// Compare current allocation against a target profile
pub fn analyze_allocation(accounts: &[AccountItem], profile: &RiskProfile) -> AllocationReport {
    let mut by_class = [0.0_f64; 3];
    for account in accounts {
        let idx = match classify_account(account.kind) {
            AssetClass::Stocks => 0,
            AssetClass::Bonds => 1,
            AssetClass::Cash => 2,
        };
        by_class[idx] += account.total_value();
    }
    let total_value: f64 = by_class.iter().sum();

    let classes: Vec<ClassAllocation> = [AssetClass::Stocks, AssetClass::Bonds, AssetClass::Cash]
        .into_iter()
        .zip(by_class)
        .map(|(class, current_value)| {
            let current_pct = if total_value > 0.0 {
                current_value / total_value * 100.0
            } else {
                0.0
            };
            let target_pct = profile.target_for(class);
            let delta_pct = current_pct - target_pct;
            let action = if delta_pct < -DRIFT_TOLERANCE_PCT {
                DriftAction::Buy
            } else if delta_pct > DRIFT_TOLERANCE_PCT {
                DriftAction::Sell
            } else {
                DriftAction::Hold
            };
            ClassAllocation {
                class,
                current_value,
                current_pct,
                target_pct,
                delta_pct,
                action,
            }
        })
        .collect();

    let drift_score = classes.iter().map(|c| c.delta_pct.abs()).sum();

    AllocationReport {
        classes,
        total_value,
        drift_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::ScenarioInput;
    use approx::assert_relative_eq;

    #[test]
    fn test_non_cash_classifies_as_stocks() {
        assert_eq!(classify_account(AccountKind::Taxable), AssetClass::Stocks);
        assert_eq!(classify_account(AccountKind::Traditional), AssetClass::Stocks);
        assert_eq!(classify_account(AccountKind::Roth), AssetClass::Stocks);
        assert_eq!(classify_account(AccountKind::Education), AssetClass::Stocks);
        assert_eq!(classify_account(AccountKind::Cash), AssetClass::Cash);
    }

    #[test]
    fn test_drift_score_sums_absolute_deltas() {
        let input = ScenarioInput::sample();
        let report = analyze_allocation(&input.accounts, &RiskProfile::balanced());
        let manual: f64 = report.classes.iter().map(|c| c.delta_pct.abs()).sum();
        assert_relative_eq!(report.drift_score, manual);
        // Bonds bucket is always empty under the coarse classification,
        // so a balanced target contributes its full 30 points of drift
        let bonds = report
            .classes
            .iter()
            .find(|c| c.class == AssetClass::Bonds)
            .unwrap();
        assert_eq!(bonds.current_value, 0.0);
        assert_relative_eq!(bonds.delta_pct, -30.0);
        assert_eq!(bonds.action, DriftAction::Buy);
    }

    #[test]
    fn test_overweight_stocks_says_sell() {
        let input = ScenarioInput::sample();
        // Sample portfolio is ~92% stocks against a 60% target
        let report = analyze_allocation(&input.accounts, &RiskProfile::balanced());
        let stocks = report
            .classes
            .iter()
            .find(|c| c.class == AssetClass::Stocks)
            .unwrap();
        assert_eq!(stocks.action, DriftAction::Sell);
    }

    #[test]
    fn test_on_target_holds() {
        let mut input = ScenarioInput::sample();
        // Force an exact 85/15 split matching the aggressive profile's
        // stocks target within tolerance
        input.accounts[0].balance = 85_000.0;
        input.accounts[0].holdings.clear();
        input.accounts[1].balance = 0.0;
        input.accounts[2].balance = 15_000.0;
        let report = analyze_allocation(&input.accounts, &RiskProfile::aggressive());
        let stocks = report
            .classes
            .iter()
            .find(|c| c.class == AssetClass::Stocks)
            .unwrap();
        assert_eq!(stocks.action, DriftAction::Hold);
    }

    #[test]
    fn test_empty_portfolio() {
        let report = analyze_allocation(&[], &RiskProfile::balanced());
        assert_eq!(report.total_value, 0.0);
        // All targets unmet: drift is the full 100 points
        assert_relative_eq!(report.drift_score, 100.0);
    }
}
