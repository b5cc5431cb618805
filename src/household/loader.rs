//! Load a scenario from a JSON file
//!
//! The surrounding application shapes persisted records into this format;
//! the engine only cares that the JSON matches `ScenarioInput`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::ScenarioInput;
use crate::error::EngineError;

/// Read and parse a `ScenarioInput` from a JSON file
pub fn load_scenario(path: &Path) -> Result<ScenarioInput, EngineError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let input: ScenarioInput = serde_json::from_reader(reader)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_round_trips_through_json() {
        let input = ScenarioInput::sample();
        let json = serde_json::to_string(&input).unwrap();
        let back: ScenarioInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.incomes.len(), input.incomes.len());
        assert_eq!(back.start_date, input.start_date);
        assert!((back.total_account_value() - input.total_account_value()).abs() < 1e-9);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_scenario(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
