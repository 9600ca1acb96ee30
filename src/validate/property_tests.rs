//! Property tests for response validation
//!
//! Absent attribute keys take their defaults, present keys keep their
//! values, and one non-numeric value rejects the whole evaluation.

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::validate::{AttributeEvaluation, FromProviderValue, TurnResults};

const FIELDS: [(&str, i64); 6] = [
    ("health", 100),
    ("wealth", 500),
    ("happiness", 75),
    ("karma", 0),
    ("iq", 100),
    ("life_score", 0),
];

/// For each attribute: absent, or present with a value in a sane range
fn partial_evaluation_strategy() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::of(-300i64..=300), 6)
}

fn build(values: &[Option<i64>]) -> Map<String, Value> {
    let mut map = Map::new();
    for ((name, _), value) in FIELDS.iter().zip(values) {
        if let Some(v) = value {
            map.insert(name.to_string(), Value::from(*v));
        }
    }
    map
}

fn field(eval: &AttributeEvaluation, name: &str) -> i64 {
    match name {
        "health" => eval.health as i64,
        "wealth" => eval.wealth,
        "happiness" => eval.happiness as i64,
        "karma" => eval.karma as i64,
        "iq" => eval.iq as i64,
        _ => eval.life_score,
    }
}

proptest! {
    #[test]
    fn prop_missing_attributes_take_defaults(values in partial_evaluation_strategy()) {
        let mut map = build(&values);
        // A non-empty object is what reaches the validator
        map.insert("note".to_string(), Value::from("extra keys are ignored"));
        let eval = AttributeEvaluation::from_value(&Value::Object(map)).unwrap();

        for ((name, default), value) in FIELDS.iter().zip(&values) {
            prop_assert_eq!(field(&eval, name), value.unwrap_or(*default), "field {}", name);
        }
    }

    #[test]
    fn prop_one_bad_attribute_fails_all(
        values in partial_evaluation_strategy(),
        bad_index in 0usize..6,
        junk in "[a-z ]{1,12}"
    ) {
        let mut map = build(&values);
        map.insert(FIELDS[bad_index].0.to_string(), Value::from(junk));
        prop_assert!(AttributeEvaluation::from_value(&Value::Object(map)).is_err());
    }

    #[test]
    fn prop_turn_results_keep_order(
        choices in prop::collection::vec("[a-z]{1,8}", 0..10),
        achievements in prop::collection::vec("[a-z]{1,8}", 0..10)
    ) {
        let value = serde_json::json!({"choices": choices, "achievements": achievements});
        let results = TurnResults::from_value(&value).unwrap();
        prop_assert_eq!(results.choices, choices);
        prop_assert_eq!(results.achievements, achievements);
    }
}
