//! Turn engine: bootstrap, yearly advance, end of life, and offer refresh

use ahash::AHashMap;
use parking_lot::Mutex;
use std::sync::Arc;

use super::outcome::{BootstrapOutcome, BootstrapStep, DeathCause, StartOutcome, TurnOutcome};
use super::prompts;
use crate::error::{LifeSimError, Result};
use crate::model::{
    AttributeSnapshot, Character, CharacterId, LifeEvent, LifeStatus, NewCharacter, PlayerId,
};
use crate::provider::{ProviderClient, RequestSpec};
use crate::store::{ChangeSet, LifeStore};
use crate::validate::{
    AttributeEvaluation, BootstrapNarrative, FromProviderValue, TurnResults, YearNarrative,
    BOOTSTRAP_YEARS,
};

pub fn poor_health_summary(name: &str) -> String {
    format!("{}'s journey has come to an end due to poor health.", name)
}

pub fn ended_summary(name: &str, age: u32) -> String {
    format!("{} decided to end their story peacefully at the age of {}.", name, age)
}

/// Drives characters through their lives
///
/// Calls on the same character are serialized; different characters run
/// independently.
pub struct TurnEngine {
    store: Arc<dyn LifeStore>,
    provider: ProviderClient,
    locks: Mutex<AHashMap<CharacterId, Arc<Mutex<()>>>>,
}

impl TurnEngine {
    pub fn new(store: Arc<dyn LifeStore>, provider: ProviderClient) -> Self {
        Self {
            store,
            provider,
            locks: Mutex::new(AHashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<dyn LifeStore> {
        &self.store
    }

    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }

    fn character_lock(&self, id: CharacterId) -> Arc<Mutex<()>> {
        self.locks.lock().entry(id).or_default().clone()
    }

    /// Load a character, checking it belongs to `player_id`
    pub fn owned_character(&self, player_id: PlayerId, id: CharacterId) -> Result<Character> {
        let character = self.store.character(id)?;
        if character.player_id != player_id {
            return Err(LifeSimError::NotOwner {
                character_id: id,
                player_id,
            });
        }
        Ok(character)
    }

    pub fn create_character(&self, new: NewCharacter) -> Result<Character> {
        let character = self.store.create_character(new)?;
        tracing::info!(
            character_id = character.id,
            player_id = character.player_id,
            "character created"
        );
        Ok(character)
    }

    /// Delete a character whose bootstrap failed
    pub fn discard(&self, id: CharacterId) -> Result<()> {
        self.store.delete_character(id)?;
        self.locks.lock().remove(&id);
        tracing::info!(character_id = id, "character discarded");
        Ok(())
    }

    /// Create a character and bootstrap it, deleting the record if any
    /// bootstrap step fails
    pub fn start_life(&self, new: NewCharacter) -> Result<StartOutcome> {
        let character = self.create_character(new)?;
        let id = character.id;

        let result = {
            let lock = self.character_lock(id);
            let _guard = lock.lock();
            self.bootstrap_locked(id)
        };

        match result {
            Ok(bootstrap) if bootstrap.is_success() => Ok(StartOutcome {
                bootstrap,
                discarded: false,
            }),
            Ok(bootstrap) => {
                self.discard(id)?;
                Ok(StartOutcome {
                    bootstrap,
                    discarded: true,
                })
            }
            Err(err) => {
                if let Err(cleanup) = self.discard(id) {
                    tracing::warn!(character_id = id, error = %cleanup, "discard after failed bootstrap");
                }
                Err(err)
            }
        }
    }

    /// Generate the first five years of a `Created` character
    ///
    /// Committed steps stay committed when a later step fails; the caller
    /// decides whether to discard the record.
    pub fn bootstrap(&self, id: CharacterId) -> Result<BootstrapOutcome> {
        let lock = self.character_lock(id);
        let _guard = lock.lock();
        self.bootstrap_locked(id)
    }

    fn bootstrap_locked(&self, id: CharacterId) -> Result<BootstrapOutcome> {
        let mut character = self.store.character(id)?;
        if character.status != LifeStatus::Created {
            return Err(LifeSimError::InvalidTransition {
                status: character.status,
                action: "bootstrap",
            });
        }

        let Some(narrative) = self.request::<BootstrapNarrative>(id, prompts::early_years(&character)) else {
            return Ok(BootstrapOutcome::failed(&character, BootstrapStep::Narrative));
        };
        character.age = BOOTSTRAP_YEARS;
        self.store
            .commit(id, ChangeSet::character(&character).with_events(narrative.events()))?;

        let Some(evaluation) =
            self.request::<AttributeEvaluation>(id, prompts::evaluation(&narrative.full_text(), None))
        else {
            return Ok(BootstrapOutcome::failed(&character, BootstrapStep::Evaluation));
        };
        let snapshot = evaluation.snapshot(character.age);
        self.apply_score(&mut character, evaluation.life_score);
        character.status = LifeStatus::Alive;
        self.store
            .commit(id, ChangeSet::character(&character).with_snapshot(snapshot))?;

        if !self.refresh_with(&character, &snapshot)? {
            return Ok(BootstrapOutcome::failed(&character, BootstrapStep::Refresh));
        }

        tracing::info!(character_id = id, score = character.score, "bootstrap complete");
        Ok(BootstrapOutcome::succeeded(&character))
    }

    /// Advance an `Alive` character by one year
    ///
    /// `choices` go to the provider as given, without checking them against
    /// the current offers.
    pub fn advance_year(&self, id: CharacterId, choices: &[String]) -> Result<TurnOutcome> {
        let lock = self.character_lock(id);
        let _guard = lock.lock();

        let mut character = self.store.character(id)?;
        if character.status != LifeStatus::Alive {
            return Err(LifeSimError::InvalidTransition {
                status: character.status,
                action: "advance",
            });
        }
        let previous = self.store.latest_snapshot(id)?.ok_or_else(|| {
            LifeSimError::Store(format!("character {} is alive without attributes", id))
        })?;

        let mut outcome = TurnOutcome::unchanged(&character);
        let request = prompts::next_year(&character, &previous, self.store.events(id)?, choices);
        let Some(year) = self.request::<YearNarrative>(id, request) else {
            return Ok(outcome);
        };

        character.age += 1;
        outcome.age = character.age;
        let event = LifeEvent::new(character.age, year.summary.as_str());

        if year.is_deceased {
            character.status = LifeStatus::Deceased;
            self.store.commit(
                id,
                ChangeSet::character(&character)
                    .with_event(event)
                    .zeroing_health(),
            )?;
            outcome.narrative_committed = true;
            outcome.death = Some(DeathCause::Narrative);
            tracing::info!(character_id = id, age = character.age, "character died in the narrative");
            return Ok(outcome);
        }

        self.store
            .commit(id, ChangeSet::character(&character).with_event(event))?;
        outcome.narrative_committed = true;

        let mut current = previous;
        let request = prompts::evaluation(&year.summary, Some(&previous));
        match self.request::<AttributeEvaluation>(id, request) {
            Some(evaluation) => {
                current = evaluation.snapshot(character.age);
                outcome.score_delta = self.apply_score(&mut character, evaluation.life_score);
                outcome.score = character.score;
                outcome.attributes_committed = true;

                if current.is_fatal() {
                    character.status = LifeStatus::Deceased;
                    self.store.commit(
                        id,
                        ChangeSet::character(&character)
                            .with_snapshot(current)
                            .with_event(LifeEvent::new(character.age, poor_health_summary(&character.name))),
                    )?;
                    outcome.death = Some(DeathCause::PoorHealth);
                    tracing::info!(character_id = id, age = character.age, "character died of poor health");
                    return Ok(outcome);
                }

                self.store
                    .commit(id, ChangeSet::character(&character).with_snapshot(current))?;
            }
            None => {
                tracing::warn!(character_id = id, age = character.age, "attributes unchanged this year");
            }
        }

        outcome.refresh_committed = self.refresh_with(&character, &current)?;
        Ok(outcome)
    }

    /// End an `Alive` character's life by the player's choice
    pub fn end_life(&self, id: CharacterId) -> Result<Character> {
        let lock = self.character_lock(id);
        let _guard = lock.lock();

        let mut character = self.store.character(id)?;
        if character.status != LifeStatus::Alive {
            return Err(LifeSimError::InvalidTransition {
                status: character.status,
                action: "end",
            });
        }
        character.status = LifeStatus::Ended;
        let event = LifeEvent::new(character.age, ended_summary(&character.name, character.age));
        self.store
            .commit(id, ChangeSet::character(&character).with_event(event))?;
        tracing::info!(character_id = id, age = character.age, "life ended by choice");
        Ok(character)
    }

    /// Request fresh offers for an `Alive` character from its current state
    ///
    /// Returns whether the offer slot was replaced.
    pub fn refresh_offers(&self, id: CharacterId) -> Result<bool> {
        let lock = self.character_lock(id);
        let _guard = lock.lock();

        let character = self.store.character(id)?;
        if character.status != LifeStatus::Alive {
            return Err(LifeSimError::InvalidTransition {
                status: character.status,
                action: "refresh",
            });
        }
        let current = self
            .store
            .latest_snapshot(id)?
            .unwrap_or_else(|| AttributeSnapshot::defaults(character.age));
        self.refresh_with(&character, &current)
    }

    fn refresh_with(&self, character: &Character, current: &AttributeSnapshot) -> Result<bool> {
        let history = self.store.events(character.id)?;
        let request = prompts::turn_results(character, current, history);
        let Some(results) = self.request::<TurnResults>(character.id, request) else {
            return Ok(false);
        };
        let offers = self
            .store
            .replace_offers(character.id, results.choices, results.achievements)?;
        tracing::debug!(
            character_id = character.id,
            version = offers.version,
            choices = offers.choices.len(),
            "offers replaced"
        );
        Ok(true)
    }

    fn apply_score(&self, character: &mut Character, life_score: i64) -> i64 {
        let applied = character.add_score(life_score);
        if applied != life_score {
            tracing::warn!(
                character_id = character.id,
                life_score,
                "negative life score floored at zero"
            );
        }
        applied
    }

    /// One provider call plus validation; any failure is logged and
    /// collapses to `None`.
    fn request<T: FromProviderValue>(&self, id: CharacterId, request: RequestSpec) -> Option<T> {
        let step = request.task.as_str();
        let value = match self.provider.generate(&request) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(character_id = id, step, error = %err, "provider call failed");
                return None;
            }
        };
        match T::from_value(&value) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                tracing::warn!(character_id = id, step, error = %err, "provider reply rejected");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::provider::ScriptedTransport;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    pub(crate) fn engine_with(transport: &Arc<ScriptedTransport>) -> (TurnEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let provider = ProviderClient::new(["k1", "k2"], transport.clone());
        (TurnEngine::new(store.clone(), provider), store)
    }

    pub(crate) fn early_years() -> Value {
        json!({
            "1": "Born in spring.",
            "2": "First steps.",
            "3": "Learned to say cat.",
            "4": "Built a tower of blocks.",
            "5": "Started preschool.",
        })
    }

    pub(crate) fn evaluation(health: i64, life_score: i64) -> Value {
        json!({
            "health": health,
            "wealth": 500,
            "happiness": 70,
            "karma": 5,
            "iq": 110,
            "life_score": life_score,
        })
    }

    pub(crate) fn offers(tag: &str) -> Value {
        json!({
            "choices": [format!("{} choice a", tag), format!("{} choice b", tag)],
            "achievements": [format!("{} achievement", tag)],
        })
    }

    pub(crate) fn script_bootstrap(transport: &ScriptedTransport) {
        transport.push_json(early_years());
        transport.push_json(evaluation(95, 40));
        transport.push_json(offers("initial"));
    }

    fn new_character() -> NewCharacter {
        NewCharacter::new(7, "Ada", "female", ["Quick Wit"])
    }

    fn alive_character(engine: &TurnEngine, transport: &ScriptedTransport) -> CharacterId {
        script_bootstrap(transport);
        let outcome = engine.start_life(new_character()).unwrap();
        assert!(outcome.is_success());
        outcome.bootstrap.character_id
    }

    #[test]
    fn test_bootstrap_success_commits_everything() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        let character = store.character(id).unwrap();
        assert_eq!(character.age, 5);
        assert_eq!(character.score, 40);
        assert_eq!(character.status, LifeStatus::Alive);

        let years: Vec<u32> = store.events(id).unwrap().iter().map(|e| e.year).collect();
        assert_eq!(years, vec![1, 2, 3, 4, 5]);

        let snapshot = store.latest_snapshot(id).unwrap().unwrap();
        assert_eq!(snapshot.year, 5);
        assert_eq!(snapshot.health, 95);

        let offers = store.offers(id).unwrap();
        assert_eq!(offers.version, 1);
        assert_eq!(offers.choices.len(), 2);
    }

    #[test]
    fn test_bootstrap_evaluates_joined_narrative() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, _store) = engine_with(&transport);
        alive_character(&engine, &transport);

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        let evaluation: Value = serde_json::from_str(&calls[1].prompt).unwrap();
        assert_eq!(evaluation["task"], "evaluate_attributes_and_score");
        assert_eq!(
            evaluation["narrative"],
            "Born in spring.\nFirst steps.\nLearned to say cat.\nBuilt a tower of blocks.\nStarted preschool."
        );
    }

    #[test]
    fn test_bootstrap_narrative_failure_commits_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let character = engine.create_character(new_character()).unwrap();

        transport.push_json(json!({"1": "a", "2": "b", "3": "c", "4": "d"}));
        let outcome = engine.bootstrap(character.id).unwrap();
        assert_eq!(outcome.failed_step, Some(BootstrapStep::Narrative));
        assert_eq!(outcome.message(), "Failed to generate life story.");
        assert!(store.events(character.id).unwrap().is_empty());
        assert_eq!(store.character(character.id).unwrap().status, LifeStatus::Created);
    }

    #[test]
    fn test_bootstrap_evaluation_failure_keeps_narrative() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let character = engine.create_character(new_character()).unwrap();

        transport.push_json(early_years());
        transport.push_json(json!({"health": "lots"}));
        let outcome = engine.bootstrap(character.id).unwrap();
        assert_eq!(outcome.message(), "Failed to evaluate attributes.");

        let stored = store.character(character.id).unwrap();
        assert_eq!(stored.age, 5);
        assert_eq!(stored.status, LifeStatus::Created);
        assert_eq!(store.events(character.id).unwrap().len(), 5);
        assert!(store.latest_snapshot(character.id).unwrap().is_none());
    }

    #[test]
    fn test_bootstrap_refresh_failure_reports_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let character = engine.create_character(new_character()).unwrap();

        transport.push_json(early_years());
        transport.push_json(evaluation(90, 10));
        transport.push_failure();
        let outcome = engine.bootstrap(character.id).unwrap();
        assert_eq!(outcome.failed_step, Some(BootstrapStep::Refresh));
        assert_eq!(store.offers(character.id).unwrap().version, 0);
        assert!(store.latest_snapshot(character.id).unwrap().is_some());
    }

    #[test]
    fn test_start_life_discards_on_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        transport.push_failure();

        let outcome = engine.start_life(new_character()).unwrap();
        assert!(outcome.discarded);
        assert_eq!(outcome.character_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_bootstrap_twice_is_invalid() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, _store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        let err = engine.bootstrap(id).unwrap_err();
        assert!(matches!(
            err,
            LifeSimError::InvalidTransition { status: LifeStatus::Alive, .. }
        ));
    }

    #[test]
    fn test_advance_year_full_turn() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        transport.push_json(json!({"summary": "Started school.", "is_deceased": false}));
        transport.push_json(evaluation(88, 12));
        transport.push_json(offers("six"));
        let outcome = engine.advance_year(id, &["Read books".to_string()]).unwrap();

        assert!(outcome.advanced());
        assert!(outcome.attributes_committed);
        assert!(outcome.refresh_committed);
        assert_eq!(outcome.death, None);
        assert_eq!(outcome.age, 6);
        assert_eq!(outcome.score_delta, 12);
        assert_eq!(outcome.score, 52);

        let events = store.events(id).unwrap();
        assert_eq!(events.last().unwrap(), &LifeEvent::new(6, "Started school."));
        assert_eq!(store.latest_snapshot(id).unwrap().unwrap().year, 6);
        assert_eq!(store.offers(id).unwrap().choices[0], "six choice a");
    }

    #[test]
    fn test_advance_year_narrative_failure_changes_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);
        let offers_before = store.offers(id).unwrap();

        transport.push_json(json!({"summary": "Missing flag."}));
        let outcome = engine.advance_year(id, &[]).unwrap();

        assert!(!outcome.advanced());
        assert_eq!(
            outcome.failure_message(),
            Some("The story could not continue. Please try again.")
        );
        assert_eq!(store.character(id).unwrap().age, 5);
        assert_eq!(store.events(id).unwrap().len(), 5);
        assert_eq!(store.offers(id).unwrap(), offers_before);
    }

    #[test]
    fn test_advance_year_partial_commit() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        transport.push_json(json!({"summary": "A quiet year.", "is_deceased": "false"}));
        transport.push_text("not json at all");
        transport.push_json(offers("partial"));
        let outcome = engine.advance_year(id, &[]).unwrap();

        assert!(outcome.is_partial());
        assert!(outcome.refresh_committed);
        assert_eq!(outcome.score_delta, 0);

        let character = store.character(id).unwrap();
        assert_eq!(character.age, 6);
        assert_eq!(character.score, 40);
        let snapshots = store.snapshots(id).unwrap();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].year, 5);

        // Refresh saw the previous snapshot
        let calls = transport.calls();
        let refresh: Value = serde_json::from_str(&calls.last().unwrap().prompt).unwrap();
        assert_eq!(refresh["character_details"]["attributes"]["health"], 95);
        assert_eq!(refresh["character_details"]["age"], 6);
    }

    #[test]
    fn test_narrative_death_zeroes_health_and_stops() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        transport.push_json(json!({"summary": "A tragic accident.", "is_deceased": true}));
        let outcome = engine.advance_year(id, &[]).unwrap();

        assert_eq!(outcome.death, Some(DeathCause::Narrative));
        assert!(!outcome.is_partial());
        assert_eq!(transport.calls().len(), 4);

        let character = store.character(id).unwrap();
        assert_eq!(character.status, LifeStatus::Deceased);
        assert_eq!(character.age, 6);
        let snapshot = store.latest_snapshot(id).unwrap().unwrap();
        assert_eq!(snapshot.year, 5);
        assert_eq!(snapshot.health, 0);

        let err = engine.advance_year(id, &[]).unwrap_err();
        assert!(matches!(err, LifeSimError::InvalidTransition { .. }));
    }

    #[test]
    fn test_poor_health_death() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        transport.push_json(json!({"summary": "Fell very ill.", "is_deceased": false}));
        transport.push_json(evaluation(0, 3));
        let outcome = engine.advance_year(id, &[]).unwrap();

        assert_eq!(outcome.death, Some(DeathCause::PoorHealth));
        assert!(outcome.attributes_committed);
        assert!(!outcome.refresh_committed);
        assert_eq!(transport.pending(), 0);

        let events = store.events(id).unwrap();
        let tail: Vec<&str> = events[5..].iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(
            tail,
            vec!["Fell very ill.", "Ada's journey has come to an end due to poor health."]
        );
        assert!(events[5..].iter().all(|e| e.year == 6));
        assert_eq!(store.character(id).unwrap().status, LifeStatus::Deceased);
    }

    #[test]
    fn test_refresh_failure_keeps_previous_offers() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);
        let before = store.offers(id).unwrap();

        transport.push_json(json!({"summary": "Summer camp.", "is_deceased": false}));
        transport.push_json(evaluation(90, 5));
        transport.push_json(json!({"choices": ["only choices"]}));
        let outcome = engine.advance_year(id, &[]).unwrap();

        assert!(outcome.advanced());
        assert!(!outcome.refresh_committed);
        assert_eq!(store.offers(id).unwrap(), before);
    }

    #[test]
    fn test_refresh_replaces_not_merges() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        transport.push_json(json!({"choices": ["fresh"], "achievements": []}));
        assert!(engine.refresh_offers(id).unwrap());
        let offers = store.offers(id).unwrap();
        assert_eq!(offers.version, 2);
        assert_eq!(offers.choices, vec!["fresh"]);
        assert!(offers.achievements.is_empty());
    }

    #[test]
    fn test_negative_life_score_is_floored() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        transport.push_json(json!({"summary": "Rough year.", "is_deceased": false}));
        transport.push_json(evaluation(60, -25));
        transport.push_json(offers("rough"));
        let outcome = engine.advance_year(id, &[]).unwrap();

        assert_eq!(outcome.score_delta, 0);
        assert_eq!(store.character(id).unwrap().score, 40);
    }

    #[test]
    fn test_end_life() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        let character = engine.end_life(id).unwrap();
        assert_eq!(character.status, LifeStatus::Ended);
        assert_eq!(
            store.events(id).unwrap().last().unwrap().summary,
            "Ada decided to end their story peacefully at the age of 5."
        );
        assert_eq!(transport.calls().len(), 3);

        assert!(engine.end_life(id).is_err());
        assert!(engine.advance_year(id, &[]).is_err());
    }

    #[test]
    fn test_ownership_check() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, _store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        assert!(engine.owned_character(7, id).is_ok());
        let err = engine.owned_character(8, id).unwrap_err();
        assert!(matches!(err, LifeSimError::NotOwner { player_id: 8, .. }));
        assert!(matches!(
            engine.owned_character(7, 999).unwrap_err(),
            LifeSimError::CharacterNotFound(999)
        ));
    }

    #[test]
    fn test_same_character_turns_do_not_interleave() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, store) = engine_with(&transport);
        let id = alive_character(&engine, &transport);

        for _ in 0..2 {
            transport.push_json(json!({"summary": "Busy year.", "is_deceased": false}));
            transport.push_json(evaluation(80, 1));
            transport.push_json(offers("busy"));
        }
        let ages: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..2)
                .map(|_| s.spawn(|| engine.advance_year(id, &[]).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap().age).collect()
        });

        let mut sorted = ages.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![6, 7]);
        assert_eq!(store.snapshots(id).unwrap().len(), 3);
        assert_eq!(store.offers(id).unwrap().version, 3);
    }

    #[test]
    fn test_credentials_rotate_across_steps() {
        let transport = Arc::new(ScriptedTransport::new());
        let (engine, _store) = engine_with(&transport);
        alive_character(&engine, &transport);

        let used: Vec<String> = transport.calls().into_iter().map(|c| c.credential).collect();
        assert_eq!(used, vec!["k1", "k2", "k1"]);
        assert_eq!(engine.provider().rotation_counter(), 3);
    }
}
