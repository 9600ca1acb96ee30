//! Structured request document sent to the provider

use serde::Serialize;
use serde_json::Value;

use crate::model::LifeEvent;

/// Task tag identifying which pipeline step a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    GenerateInitialNarrative,
    EvaluateAttributesAndScore,
    AdvanceYearNarrative,
    GenerateTurnResults,
}

impl Task {
    pub fn as_str(self) -> &'static str {
        match self {
            Task::GenerateInitialNarrative => "generate_initial_narrative",
            Task::EvaluateAttributesAndScore => "evaluate_attributes_and_score",
            Task::AdvanceYearNarrative => "advance_year_narrative",
            Task::GenerateTurnResults => "generate_turn_results",
        }
    }
}

/// Request document; absent sections are left out of the encoding
#[derive(Debug, Clone, Serialize)]
pub struct RequestSpec {
    pub task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub life_history: Option<Vec<LifeEvent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_choices: Option<Vec<String>>,
    /// Shape the reply is expected to take
    pub response_schema: Value,
}

impl RequestSpec {
    pub fn new(task: Task, response_schema: Value) -> Self {
        Self {
            task,
            instruction: None,
            character_details: None,
            narrative: None,
            previous_attributes: None,
            life_history: None,
            player_choices: None,
            response_schema,
        }
    }

    pub fn instruction(mut self, text: &str) -> Self {
        self.instruction = Some(text.to_string());
        self
    }

    pub fn character_details(mut self, details: Value) -> Self {
        self.character_details = Some(details);
        self
    }

    pub fn narrative(mut self, text: impl Into<String>) -> Self {
        self.narrative = Some(text.into());
        self
    }

    pub fn previous_attributes(mut self, attributes: Value) -> Self {
        self.previous_attributes = Some(attributes);
        self
    }

    pub fn life_history(mut self, history: Vec<LifeEvent>) -> Self {
        self.life_history = Some(history);
        self
    }

    pub fn player_choices(mut self, choices: Vec<String>) -> Self {
        self.player_choices = Some(choices);
        self
    }
}
