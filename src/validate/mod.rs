//! Response validation
//!
//! Every provider reply passes through one of these typed responses before
//! the engine trusts it. Each type states which fields are required, which
//! default when absent, and how values are coerced.

pub mod coerce;

#[cfg(test)]
mod property_tests;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{
    AttributeSnapshot, LifeEvent, DEFAULT_HAPPINESS, DEFAULT_HEALTH, DEFAULT_IQ, DEFAULT_KARMA,
    DEFAULT_WEALTH,
};
use coerce::{coerce_bool, coerce_text, coerce_text_list, i32_or, i64_or, required};

/// Years covered by the bootstrap narrative
pub const BOOTSTRAP_YEARS: u32 = 5;

pub const DEFAULT_LIFE_SCORE: i64 = 0;

/// Why a parsed reply was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("field {field} should be {expected}, got {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("field {0} is blank")]
    Blank(String),
}

impl ValidationError {
    pub fn wrong_type(field: &str, expected: &'static str, found: &Value) -> Self {
        let mut found = found.to_string();
        if found.len() > 60 {
            let mut end = 60;
            while !found.is_char_boundary(end) {
                end -= 1;
            }
            found.truncate(end);
            found.push_str("...");
        }
        ValidationError::WrongType {
            field: field.to_string(),
            expected,
            found,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_object(value: &Value) -> Result<&Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| ValidationError::NotAnObject(json_kind(value)))
}

/// A typed view over a provider reply
pub trait FromProviderValue: Sized {
    fn from_value(value: &Value) -> Result<Self, ValidationError>;
}

/// First five years of narrative, keyed "1".."5"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapNarrative {
    summaries: Vec<String>,
}

impl BootstrapNarrative {
    /// One event per year, in year order
    pub fn events(&self) -> Vec<LifeEvent> {
        self.summaries
            .iter()
            .zip(1..)
            .map(|(summary, year)| LifeEvent::new(year, summary.clone()))
            .collect()
    }

    /// All summaries joined with newlines, as evaluated in the next step
    pub fn full_text(&self) -> String {
        self.summaries.join("\n")
    }
}

impl FromProviderValue for BootstrapNarrative {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = as_object(value)?;
        let mut summaries = Vec::with_capacity(BOOTSTRAP_YEARS as usize);
        for year in 1..=BOOTSTRAP_YEARS {
            let key = year.to_string();
            let text = coerce_text(&key, required(map, &key)?)?;
            if text.trim().is_empty() {
                return Err(ValidationError::Blank(key));
            }
            summaries.push(text);
        }
        Ok(Self { summaries })
    }
}

/// Attribute values and the score earned for the evaluated period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEvaluation {
    pub health: i32,
    pub wealth: i64,
    pub happiness: i32,
    pub karma: i32,
    pub iq: i32,
    pub life_score: i64,
}

impl AttributeEvaluation {
    pub fn snapshot(&self, year: u32) -> AttributeSnapshot {
        AttributeSnapshot {
            year,
            health: self.health,
            wealth: self.wealth,
            happiness: self.happiness,
            karma: self.karma,
            iq: self.iq,
        }
    }
}

impl FromProviderValue for AttributeEvaluation {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = as_object(value)?;
        Ok(Self {
            health: i32_or(map, "health", DEFAULT_HEALTH)?,
            wealth: i64_or(map, "wealth", DEFAULT_WEALTH)?,
            happiness: i32_or(map, "happiness", DEFAULT_HAPPINESS)?,
            karma: i32_or(map, "karma", DEFAULT_KARMA)?,
            iq: i32_or(map, "iq", DEFAULT_IQ)?,
            life_score: i64_or(map, "life_score", DEFAULT_LIFE_SCORE)?,
        })
    }
}

/// Narrative for one advanced year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearNarrative {
    pub summary: String,
    pub is_deceased: bool,
}

impl FromProviderValue for YearNarrative {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = as_object(value)?;
        Ok(Self {
            summary: coerce_text("summary", required(map, "summary")?)?,
            is_deceased: coerce_bool("is_deceased", required(map, "is_deceased")?)?,
        })
    }
}

/// Offers for the next turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnResults {
    pub choices: Vec<String>,
    pub achievements: Vec<String>,
}

impl FromProviderValue for TurnResults {
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let map = as_object(value)?;
        Ok(Self {
            choices: coerce_text_list("choices", required(map, "choices")?)?,
            achievements: coerce_text_list("achievements", required(map, "achievements")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bootstrap_narrative_in_year_order() {
        let value = json!({"3": "c", "1": "a", "5": "e", "2": "b", "4": "d", "6": "ignored"});
        let narrative = BootstrapNarrative::from_value(&value).unwrap();
        let events = narrative.events();

        assert_eq!(events.len(), 5);
        assert_eq!(events[0], LifeEvent::new(1, "a"));
        assert_eq!(events[4], LifeEvent::new(5, "e"));
        assert_eq!(narrative.full_text(), "a\nb\nc\nd\ne");
    }

    #[test]
    fn test_bootstrap_narrative_rejects_gaps_and_blanks() {
        let missing = json!({"1": "a", "2": "b", "3": "c", "4": "d"});
        assert_eq!(
            BootstrapNarrative::from_value(&missing),
            Err(ValidationError::MissingField("5".to_string()))
        );

        let blank = json!({"1": "a", "2": "  ", "3": "c", "4": "d", "5": "e"});
        assert_eq!(
            BootstrapNarrative::from_value(&blank),
            Err(ValidationError::Blank("2".to_string()))
        );

        let numeric = json!({"1": "a", "2": 2, "3": "c", "4": "d", "5": "e"});
        assert!(matches!(
            BootstrapNarrative::from_value(&numeric),
            Err(ValidationError::WrongType { .. })
        ));

        assert_eq!(
            BootstrapNarrative::from_value(&json!(["a", "b"])),
            Err(ValidationError::NotAnObject("array"))
        );
    }

    #[test]
    fn test_attribute_evaluation_full() {
        let value = json!({
            "health": 90, "wealth": 600, "happiness": 80,
            "karma": 5, "iq": 110, "life_score": 40
        });
        let eval = AttributeEvaluation::from_value(&value).unwrap();
        assert_eq!(
            eval,
            AttributeEvaluation { health: 90, wealth: 600, happiness: 80, karma: 5, iq: 110, life_score: 40 }
        );
        assert_eq!(eval.snapshot(5).year, 5);
    }

    #[test]
    fn test_attribute_evaluation_defaults_missing_keys() {
        let eval = AttributeEvaluation::from_value(&json!({"wealth": "1000000"})).unwrap();
        assert_eq!(
            eval,
            AttributeEvaluation { health: 100, wealth: 1_000_000, happiness: 75, karma: 0, iq: 100, life_score: 0 }
        );
    }

    #[test]
    fn test_attribute_evaluation_bad_value_fails_whole_response() {
        let value = json!({"health": 90, "wealth": "a fortune", "life_score": 10});
        assert!(matches!(
            AttributeEvaluation::from_value(&value),
            Err(ValidationError::WrongType { ref field, .. }) if field == "wealth"
        ));
    }

    #[test]
    fn test_year_narrative_requires_both_fields() {
        let ok = YearNarrative::from_value(&json!({"summary": "school", "is_deceased": false})).unwrap();
        assert_eq!(ok.summary, "school");
        assert!(!ok.is_deceased);

        assert_eq!(
            YearNarrative::from_value(&json!({"summary": "school"})),
            Err(ValidationError::MissingField("is_deceased".to_string()))
        );
        assert_eq!(
            YearNarrative::from_value(&json!({"is_deceased": true})),
            Err(ValidationError::MissingField("summary".to_string()))
        );
        assert!(YearNarrative::from_value(&json!({"summary": "x", "is_deceased": "maybe"})).is_err());
    }

    #[test]
    fn test_turn_results_requires_both_lists() {
        let ok = TurnResults::from_value(&json!({"choices": ["x", "y"], "achievements": ["z"]})).unwrap();
        assert_eq!(ok.choices, vec!["x", "y"]);
        assert_eq!(ok.achievements, vec!["z"]);

        assert_eq!(
            TurnResults::from_value(&json!({"choices": ["x"]})),
            Err(ValidationError::MissingField("achievements".to_string()))
        );
    }

    #[test]
    fn test_wrong_type_truncates_long_values() {
        let long = Value::String("é".repeat(100));
        match ValidationError::wrong_type("f", "integer", &long) {
            ValidationError::WrongType { found, .. } => {
                assert!(found.ends_with("..."));
                assert!(found.len() <= 63);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
