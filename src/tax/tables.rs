//! Tax assumption tables
//!
//! Built-in 2024 constants plus a CSV override loader for the federal
//! bracket schedule. Bracket bounds and thresholds are dollars; rates are
//! decimals.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::household::FilingStatus;

/// One progressive bracket: [lower, upper) taxed at `rate`.
/// `upper = None` marks the unbounded top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate: f64,
}

/// Payroll tax parameters (employee side)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayrollRates {
    /// Social Security rate, applied up to the wage base
    pub social_security_rate: f64,
    /// Annual Social Security wage base
    pub wage_base: f64,
    /// Medicare rate, applied to all wages
    pub medicare_rate: f64,
    /// Additional Medicare surtax above the filing-status threshold
    pub additional_medicare_rate: f64,
}

impl PayrollRates {
    /// 2024 employee-side rates
    pub fn default_2024() -> Self {
        Self {
            social_security_rate: 0.062,
            wage_base: 168_600.0,
            medicare_rate: 0.0145,
            additional_medicare_rate: 0.009,
        }
    }
}

/// Container for every tax constant the engine consults
#[derive(Debug, Clone)]
pub struct TaxTables {
    pub tax_year: i32,
    pub payroll: PayrollRates,
    /// Net Investment Income surtax rate
    pub niit_rate: f64,
    single: Vec<TaxBracket>,
    married_joint: Vec<TaxBracket>,
    married_separate: Vec<TaxBracket>,
    head_of_household: Vec<TaxBracket>,
}

impl TaxTables {
    /// Built-in 2024 federal schedule
    pub fn default_2024() -> Self {
        Self {
            tax_year: 2024,
            payroll: PayrollRates::default_2024(),
            niit_rate: 0.038,
            single: brackets_from(&[
                (0.0, Some(11_600.0), 0.10),
                (11_600.0, Some(47_150.0), 0.12),
                (47_150.0, Some(100_525.0), 0.22),
                (100_525.0, Some(191_950.0), 0.24),
                (191_950.0, Some(243_725.0), 0.32),
                (243_725.0, Some(609_350.0), 0.35),
                (609_350.0, None, 0.37),
            ]),
            married_joint: brackets_from(&[
                (0.0, Some(23_200.0), 0.10),
                (23_200.0, Some(94_300.0), 0.12),
                (94_300.0, Some(201_050.0), 0.22),
                (201_050.0, Some(383_900.0), 0.24),
                (383_900.0, Some(487_450.0), 0.32),
                (487_450.0, Some(731_200.0), 0.35),
                (731_200.0, None, 0.37),
            ]),
            married_separate: brackets_from(&[
                (0.0, Some(11_600.0), 0.10),
                (11_600.0, Some(47_150.0), 0.12),
                (47_150.0, Some(100_525.0), 0.22),
                (100_525.0, Some(191_950.0), 0.24),
                (191_950.0, Some(243_725.0), 0.32),
                (243_725.0, Some(365_600.0), 0.35),
                (365_600.0, None, 0.37),
            ]),
            head_of_household: brackets_from(&[
                (0.0, Some(16_550.0), 0.10),
                (16_550.0, Some(63_100.0), 0.12),
                (63_100.0, Some(100_500.0), 0.22),
                (100_500.0, Some(191_950.0), 0.24),
                (191_950.0, Some(243_700.0), 0.32),
                (243_700.0, Some(609_350.0), 0.35),
                (609_350.0, None, 0.37),
            ]),
        }
    }

    /// Load a federal bracket override from `federal_brackets.csv` in
    /// `dir`, keeping built-in payroll/gains constants. Columns:
    /// `filing_status,lower,upper,rate` with an empty `upper` for the top
    /// bracket.
    pub fn from_csv_path(dir: &Path) -> Result<Self, EngineError> {
        let file = File::open(dir.join("federal_brackets.csv"))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut tables = Self::default_2024();
        let mut single = Vec::new();
        let mut married_joint = Vec::new();
        let mut married_separate = Vec::new();
        let mut head_of_household = Vec::new();

        for row in reader.deserialize::<CsvBracketRow>() {
            let row = row?;
            let bracket = TaxBracket {
                lower: row.lower,
                upper: row.upper,
                rate: row.rate,
            };
            match row.filing_status.as_str() {
                "single" => single.push(bracket),
                "married_joint" => married_joint.push(bracket),
                "married_separate" => married_separate.push(bracket),
                "head_of_household" => head_of_household.push(bracket),
                other => {
                    return Err(EngineError::InvalidBrackets(format!(
                        "unknown filing status in CSV: {other}"
                    )))
                }
            }
        }

        for schedule in [
            &mut single,
            &mut married_joint,
            &mut married_separate,
            &mut head_of_household,
        ] {
            if !schedule.is_empty() {
                schedule.sort_by(|a, b| a.lower.total_cmp(&b.lower));
                validate_brackets(schedule)?;
            }
        }

        if !single.is_empty() {
            tables.single = single;
        }
        if !married_joint.is_empty() {
            tables.married_joint = married_joint;
        }
        if !married_separate.is_empty() {
            tables.married_separate = married_separate;
        }
        if !head_of_household.is_empty() {
            tables.head_of_household = head_of_household;
        }

        Ok(tables)
    }

    /// Federal ordinary-income schedule for a filing status
    pub fn federal_brackets(&self, filing: FilingStatus) -> &[TaxBracket] {
        match filing {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedJoint => &self.married_joint,
            FilingStatus::MarriedSeparate => &self.married_separate,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }

    /// Long-term capital gains break points: income up to the first is
    /// taxed at 0%, up to the second at 15%, above it at 20%
    pub fn ltcg_breakpoints(&self, filing: FilingStatus) -> (f64, f64) {
        match filing {
            FilingStatus::Single => (47_025.0, 518_900.0),
            FilingStatus::MarriedJoint => (94_050.0, 583_750.0),
            FilingStatus::MarriedSeparate => (47_025.0, 291_850.0),
            FilingStatus::HeadOfHousehold => (63_000.0, 551_350.0),
        }
    }

    /// Income threshold above which the NIIT applies
    pub fn niit_threshold(&self, filing: FilingStatus) -> f64 {
        match filing {
            FilingStatus::Single | FilingStatus::HeadOfHousehold => 200_000.0,
            FilingStatus::MarriedJoint => 250_000.0,
            FilingStatus::MarriedSeparate => 125_000.0,
        }
    }

    /// Wage threshold above which the additional Medicare surtax applies
    pub fn additional_medicare_threshold(&self, filing: FilingStatus) -> f64 {
        match filing {
            FilingStatus::Single | FilingStatus::HeadOfHousehold => 200_000.0,
            FilingStatus::MarriedJoint => 250_000.0,
            FilingStatus::MarriedSeparate => 125_000.0,
        }
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::default_2024()
    }
}

fn brackets_from(rows: &[(f64, Option<f64>, f64)]) -> Vec<TaxBracket> {
    rows.iter()
        .map(|&(lower, upper, rate)| TaxBracket { lower, upper, rate })
        .collect()
}

/// Reject schedules a bracket walk cannot interpret: unsorted, gapped,
/// zero-width, or negative-rate rows, or a bounded final bracket followed
/// by nothing.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), EngineError> {
    if brackets.is_empty() {
        return Err(EngineError::InvalidBrackets("empty schedule".to_string()));
    }
    let mut expected_lower = 0.0;
    for (i, bracket) in brackets.iter().enumerate() {
        if bracket.rate < 0.0 {
            return Err(EngineError::InvalidBrackets(format!(
                "bracket {i} has negative rate {}",
                bracket.rate
            )));
        }
        if (bracket.lower - expected_lower).abs() > 1e-6 {
            return Err(EngineError::InvalidBrackets(format!(
                "bracket {i} starts at {} but the previous ends at {expected_lower}",
                bracket.lower
            )));
        }
        match bracket.upper {
            Some(upper) => {
                if upper <= bracket.lower {
                    return Err(EngineError::InvalidBrackets(format!(
                        "bracket {i} has zero or negative width"
                    )));
                }
                expected_lower = upper;
            }
            None => {
                if i + 1 != brackets.len() {
                    return Err(EngineError::InvalidBrackets(format!(
                        "unbounded bracket {i} is not last"
                    )));
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct CsvBracketRow {
    filing_status: String,
    lower: f64,
    upper: Option<f64>,
    rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedules_validate() {
        let tables = TaxTables::default_2024();
        for filing in [
            FilingStatus::Single,
            FilingStatus::MarriedJoint,
            FilingStatus::MarriedSeparate,
            FilingStatus::HeadOfHousehold,
        ] {
            validate_brackets(tables.federal_brackets(filing)).unwrap();
        }
    }

    #[test]
    fn test_validation_rejects_gap() {
        let brackets = vec![
            TaxBracket { lower: 0.0, upper: Some(10_000.0), rate: 0.10 },
            TaxBracket { lower: 20_000.0, upper: None, rate: 0.20 },
        ];
        assert!(validate_brackets(&brackets).is_err());
    }

    #[test]
    fn test_validation_rejects_unbounded_middle() {
        let brackets = vec![
            TaxBracket { lower: 0.0, upper: None, rate: 0.10 },
            TaxBracket { lower: 0.0, upper: Some(10_000.0), rate: 0.20 },
        ];
        assert!(validate_brackets(&brackets).is_err());
    }

    #[test]
    fn test_niit_thresholds_by_filing() {
        let tables = TaxTables::default_2024();
        assert_eq!(tables.niit_threshold(FilingStatus::Single), 200_000.0);
        assert_eq!(tables.niit_threshold(FilingStatus::MarriedJoint), 250_000.0);
        assert_eq!(tables.niit_threshold(FilingStatus::MarriedSeparate), 125_000.0);
    }
}
