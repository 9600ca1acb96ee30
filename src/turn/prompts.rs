//! Request documents for each pipeline step

use serde_json::{json, Value};

use crate::model::{AttributeSnapshot, Character, LifeEvent};
use crate::provider::{RequestSpec, Task};

const EARLY_YEARS_INSTRUCTION: &str = "You are a life simulator AI. Write the first 5 years of a character's \
life, when they are an infant and a toddler. Every event must fit that age (learning to walk, first words, \
favourite toys). Perks show only in small, early ways: a gifted baby notices patterns, it does not solve equations.";

const NEXT_YEAR_INSTRUCTION: &str = "You are a life simulator AI. The summary must be realistic for the \
character's exact age: a 6-year-old starts school, a 90-year-old retires.";

const TURN_RESULTS_INSTRUCTION: &str = "You are a life simulator AI. Every choice and achievement must be \
realistic and suited to the character's exact age.";

pub(crate) fn attributes(snapshot: &AttributeSnapshot) -> Value {
    json!({
        "health": snapshot.health,
        "wealth": snapshot.wealth,
        "happiness": snapshot.happiness,
        "karma": snapshot.karma,
        "iq": snapshot.iq,
    })
}

fn character_with_attributes(character: &Character, snapshot: &AttributeSnapshot) -> Value {
    json!({
        "name": character.name,
        "age": character.age,
        "attributes": attributes(snapshot),
    })
}

/// Years 1 through 5, keyed by year
pub fn early_years(character: &Character) -> RequestSpec {
    RequestSpec::new(
        Task::GenerateInitialNarrative,
        json!({ "1": "Summary for year 1.", "2": "...", "3": "...", "4": "...", "5": "..." }),
    )
    .instruction(EARLY_YEARS_INSTRUCTION)
    .character_details(json!({
        "name": character.name,
        "gender": character.gender,
        "perks": character.perks.as_slice(),
    }))
}

/// Attribute evaluation of a narrative period
///
/// The bootstrap evaluation has no previous attributes to show.
pub fn evaluation(narrative: &str, previous: Option<&AttributeSnapshot>) -> RequestSpec {
    let score_hint = if previous.is_some() {
        "Integer 0-200"
    } else {
        "An integer score from 0-200 for this 5-year period."
    };
    let request = RequestSpec::new(
        Task::EvaluateAttributesAndScore,
        json!({
            "health": "Integer 0-100",
            "wealth": "Integer, can be very large (e.g., 500, 10000, 1000000)",
            "happiness": "Integer 0-100",
            "karma": "Integer -100 to 100",
            "iq": "Integer 0-300",
            "life_score": score_hint,
        }),
    )
    .narrative(narrative);

    match previous {
        Some(snapshot) => request.previous_attributes(attributes(snapshot)),
        None => request,
    }
}

pub fn next_year(
    character: &Character,
    current: &AttributeSnapshot,
    history: Vec<LifeEvent>,
    choices: &[String],
) -> RequestSpec {
    RequestSpec::new(
        Task::AdvanceYearNarrative,
        json!({
            "summary": "A 5-8 sentence summary for the next year.",
            "is_deceased": "A boolean (true/false) indicating if the character died this year.",
        }),
    )
    .instruction(NEXT_YEAR_INSTRUCTION)
    .character_details(character_with_attributes(character, current))
    .life_history(history)
    .player_choices(choices.to_vec())
}

pub fn turn_results(
    character: &Character,
    current: &AttributeSnapshot,
    history: Vec<LifeEvent>,
) -> RequestSpec {
    RequestSpec::new(
        Task::GenerateTurnResults,
        json!({
            "choices": ["List of 10 string choices"],
            "achievements": ["List of string achievements"],
        }),
    )
    .instruction(TURN_RESULTS_INSTRUCTION)
    .character_details(character_with_attributes(character, current))
    .life_history(history)
}
