//! Turn Controller
//!
//! Drives the simulation one turn at a time: deliver last turn's messages,
//! let each agent decide in persona order, apply and broadcast each outcome,
//! run the end-of-turn systems, then check for a halt.

pub mod observation;
pub mod prompt;

use bevy_ecs::prelude::*;
use society_events::{
    ActionCategory, ActionKind, ActionType, HaltReason, SimulationSummary, TargetingEvent,
    TurnEvent, WorldSnapshot,
};
use thiserror::Error;

use crate::components::agent::{
    AgentBundle, AgentName, Inbox, Persona, RecentActions, ResourceHistory, TurnHistory,
    TurnOrder,
};
use crate::components::social::{EmotionLedger, InterpersonalGoals, RelationshipLedger};
use crate::config::{ConfigError, SimulationConfig, SimulationSettings};
use crate::economy::{resolve_agent_name, sanitize_target, ActionOutcome, WorldEngine};
use crate::events::EventLogger;
use crate::proposer::{ActionProposer, RetryingProposer};
use crate::systems::{
    compose, compute_triggers, get_recommended_targets, get_top_actions,
    record_resource_history, update_interpersonal_goals, EmotionRules, RelationshipRules,
};
use crate::tone::{KeywordToneClassifier, ToneClassifier};

use observation::{
    affordability_table, repetition_warning, resource_trends, summarize_relationships,
    Observation,
};
use prompt::render_prompt;

/// Bias entries surfaced as top actions
pub const TOP_ACTIONS: usize = 5;
/// Consecutive all-pass turns that end the run
pub const ALL_PASS_TURNS: u32 = 2;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("agent entity missing for '{0}'")]
    MissingAgent(String),
}

pub struct TurnController<P, T = KeywordToneClassifier> {
    world: World,
    /// Agent entities sorted by `TurnOrder`
    agents: Vec<Entity>,
    names: Vec<String>,
    proposer: RetryingProposer<P>,
    classifier: T,
    end_of_turn: Schedule,
    relationship_rules: RelationshipRules,
    emotion_rules: EmotionRules,
    settings: SimulationSettings,
    events: Vec<TurnEvent>,
    turns_played: u64,
    all_pass_streak: u32,
}

impl<P: ActionProposer> TurnController<P, KeywordToneClassifier> {
    pub fn new(config: &SimulationConfig, proposer: P) -> Result<Self, SimulationError> {
        Self::with_classifier(config, proposer, KeywordToneClassifier::default())
    }
}

impl<P: ActionProposer, T: ToneClassifier> TurnController<P, T> {
    pub fn with_classifier(
        config: &SimulationConfig,
        proposer: P,
        classifier: T,
    ) -> Result<Self, SimulationError> {
        config.validate()?;

        let logger = match &config.simulation.event_log {
            Some(path) => EventLogger::new(path)?,
            None => EventLogger::null(),
        };

        let mut world = World::new();
        world.insert_resource(WorldEngine::new(
            config.world.initial_state(),
            config.economy.clone(),
        ));
        world.insert_resource(config.goals.clone());
        world.insert_resource(logger);

        for (order, persona) in config.personas.iter().enumerate() {
            world.spawn(AgentBundle::new(persona.name.clone(), persona.to_persona(), order));
        }
        let (agents, names) = decision_order(&mut world);

        let mut end_of_turn = Schedule::default();
        end_of_turn.add_systems((update_interpersonal_goals, record_resource_history).chain());

        tracing::info!(
            agents = names.len(),
            max_turns = config.simulation.max_turns,
            "simulation initialized"
        );

        Ok(Self {
            world,
            agents,
            names,
            proposer: RetryingProposer::new(proposer, config.simulation.proposer_retries),
            classifier,
            end_of_turn,
            relationship_rules: RelationshipRules::default(),
            emotion_rules: EmotionRules::default(),
            settings: config.simulation.clone(),
            events: Vec::new(),
            turns_played: 0,
            all_pass_streak: 0,
        })
    }

    pub fn with_relationship_rules(mut self, rules: RelationshipRules) -> Self {
        self.relationship_rules = rules;
        self
    }

    pub fn with_emotion_rules(mut self, rules: EmotionRules) -> Self {
        self.emotion_rules = rules;
        self
    }

    pub fn engine(&self) -> &WorldEngine {
        self.world.resource::<WorldEngine>()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.engine().observe()
    }

    pub fn agent_names(&self) -> &[String] {
        &self.names
    }

    pub fn events(&self) -> &[TurnEvent] {
        &self.events
    }

    pub fn turns_played(&self) -> u64 {
        self.turns_played
    }

    pub fn proposer(&self) -> &P {
        self.proposer.inner()
    }

    pub fn relationships(&self, name: &str) -> Option<&RelationshipLedger> {
        self.world.get::<RelationshipLedger>(self.entity_of(name)?)
    }

    pub fn emotions(&self, name: &str) -> Option<&EmotionLedger> {
        self.world.get::<EmotionLedger>(self.entity_of(name)?)
    }

    pub fn goals(&self, name: &str) -> Option<&InterpersonalGoals> {
        self.world.get::<InterpersonalGoals>(self.entity_of(name)?)
    }

    fn entity_of(&self, name: &str) -> Option<Entity> {
        let index = self.names.iter().position(|n| n == name)?;
        self.agents.get(index).copied()
    }

    /// Run turns until a halt condition fires
    pub fn run(&mut self) -> Result<SimulationSummary, SimulationError> {
        let halt_reason = loop {
            if let Some(reason) = self.run_turn()? {
                break reason;
            }
            if self.turns_played >= self.settings.max_turns {
                break HaltReason::MaxTurns;
            }
        };

        self.world.resource_mut::<EventLogger>().flush()?;

        let summary = SimulationSummary {
            turns_played: self.turns_played,
            halt_reason,
            final_state: self.snapshot(),
            total_events: self.events.len(),
            failed_actions: self.events.iter().filter(|e| !e.success).count(),
        };
        tracing::info!(
            turns = summary.turns_played,
            reason = %summary.halt_reason,
            "simulation halted"
        );
        Ok(summary)
    }

    /// Play one full turn. Returns the halt reason if the run should stop.
    pub fn run_turn(&mut self) -> Result<Option<HaltReason>, SimulationError> {
        let turn = self.engine().turn();
        tracing::info!(turn = turn + 1, world = %self.snapshot().summary_line(), "turn started");

        self.deliver_messages();

        let mut turn_events = Vec::with_capacity(self.agents.len());
        let mut targeting: Vec<TargetingEvent> = Vec::new();
        let mut passes = 0;

        for index in 0..self.agents.len() {
            let entity = self.agents[index];
            let name = self.names[index].clone();

            let observation = self.observe(entity, &name, &targeting)?;
            tracing::debug!(agent = %name, prompt = %render_prompt(&observation), "observation");

            let mut action = self.proposer.decide(&observation);
            action.target = sanitize_target(&action.target);
            if action.action_type == ActionType::Pass {
                passes += 1;
            }
            if let Some(mut recent) = self.world.get_mut::<RecentActions>(entity) {
                recent.push(action.action_type);
            }

            let result = self
                .world
                .resource_mut::<WorldEngine>()
                .apply_action(&name, &action, &self.names);
            let event_id = self.world.resource_mut::<EventLogger>().next_id();

            let event = match result {
                Ok(outcome) => {
                    tracing::info!(agent = %name, action = %outcome.action_type, "{}", outcome.description);
                    self.broadcast(&outcome);
                    if matches!(
                        outcome.action_type.category(),
                        ActionCategory::Social | ActionCategory::Message
                    ) {
                        targeting.push(TargetingEvent {
                            actor: name.clone(),
                            action_type: outcome.action_type,
                            target: outcome.target.clone(),
                        });
                    }
                    TurnEvent::succeeded(
                        event_id,
                        turn,
                        &name,
                        outcome.action_type,
                        outcome.target,
                        outcome.description,
                    )
                }
                Err(rejection) => {
                    tracing::warn!(
                        agent = %name,
                        action = %action.action_type,
                        target = %action.target,
                        "action rejected: {}",
                        rejection
                    );
                    TurnEvent::failed(
                        event_id,
                        turn,
                        &name,
                        action.action_type,
                        action.target.clone(),
                        rejection.to_string(),
                    )
                }
            };

            self.world.resource_mut::<EventLogger>().log(&event)?;
            turn_events.push(event);
        }

        self.record_history(&turn_events);
        self.events.extend(turn_events);
        self.end_of_turn.run(&mut self.world);
        self.turns_played += 1;

        if passes == self.agents.len() {
            self.all_pass_streak += 1;
        } else {
            self.all_pass_streak = 0;
        }

        if self.all_pass_streak >= ALL_PASS_TURNS {
            return Ok(Some(HaltReason::AllPassed));
        }
        if let Some(reason) = self.engine().check_terminal() {
            tracing::info!(turn = turn + 1, "{}", reason);
            return Ok(Some(HaltReason::Terminal(reason)));
        }

        self.world.resource_mut::<WorldEngine>().advance_turn();
        Ok(None)
    }

    /// Move last turn's queued messages into recipients' inboxes
    fn deliver_messages(&mut self) {
        let messages = self.world.resource_mut::<WorldEngine>().drain_messages();
        for message in messages {
            let Some(recipient) = resolve_agent_name(&message.recipient, &self.names)
                .map(str::to_string)
            else {
                tracing::warn!(
                    sender = %message.sender,
                    recipient = %message.recipient,
                    "dropping undeliverable message"
                );
                continue;
            };
            let Some(entity) = self.entity_of(&recipient) else {
                continue;
            };

            let tone = self.classifier.classify(&message.content);
            if let Some(mut ledger) = self.world.get_mut::<RelationshipLedger>(entity) {
                self.relationship_rules.apply_message(
                    ledger.entry(&message.sender),
                    tone,
                    Some(message.content.as_str()),
                );
            }
            if let Some(mut inbox) = self.world.get_mut::<Inbox>(entity) {
                inbox.deliver(message);
            }
        }
    }

    /// Assemble everything `entity` sees before deciding
    fn observe(
        &mut self,
        entity: Entity,
        name: &str,
        targeting: &[TargetingEvent],
    ) -> Result<Observation, SimulationError> {
        let messages = self
            .world
            .get_mut::<Inbox>(entity)
            .map(|mut inbox| inbox.read_all())
            .ok_or_else(|| SimulationError::MissingAgent(name.to_string()))?;

        let world = &self.world;
        let missing = || SimulationError::MissingAgent(name.to_string());
        let persona = world.get::<Persona>(entity).ok_or_else(missing)?;
        let relationships = world.get::<RelationshipLedger>(entity).ok_or_else(missing)?;
        let emotions = world.get::<EmotionLedger>(entity).ok_or_else(missing)?;
        let goals = world.get::<InterpersonalGoals>(entity).ok_or_else(missing)?;
        let recent = world.get::<RecentActions>(entity).ok_or_else(missing)?;
        let history = world.get::<TurnHistory>(entity).ok_or_else(missing)?;
        let resource_history = world.get::<ResourceHistory>(entity).ok_or_else(missing)?;
        let engine = world.resource::<WorldEngine>();

        let snapshot = engine.observe();
        let mut obs = Observation::new(name, snapshot.clone());
        obs.archetype = persona.archetype.clone();
        obs.description = persona.description.clone();
        obs.persona_goals = persona.goals.clone();
        obs.valid_targets = self.names.iter().filter(|n| *n != name).cloned().collect();
        obs.targeted_by = targeting.iter().filter(|e| e.target == name).cloned().collect();
        obs.triggers = compute_triggers(&snapshot, !obs.targeted_by.is_empty(), !messages.is_empty());
        obs.messages = messages;
        obs.history = history.entries();
        obs.relationships = summarize_relationships(relationships);
        obs.affordability = affordability_table(&snapshot, engine.rules());
        obs.trends = resource_trends(resource_history);
        obs.repetition_warning = repetition_warning(recent);
        obs.modifier = snapshot.modifier_for(name);
        obs.interpersonal_goals = goals.clone();
        obs.last_action = recent.last();
        obs.bias = compose(
            &persona.archetype,
            snapshot.crisis_level,
            relationships.average_score(),
            emotions,
            goals,
            &recent.kinds(),
        );
        obs.top_actions = get_top_actions(&obs.bias, TOP_ACTIONS);
        obs.recommended_targets = get_recommended_targets(relationships);
        Ok(obs)
    }

    /// Every other agent updates its ledgers toward the actor. Kinds with no
    /// table entry leave the ledgers untouched.
    ///
    /// Bystander emotion deltas only fire for kinds an executable action maps
    /// to; the default `consume_resource` entry has no such action, so it
    /// takes effect only through injected `EmotionRules`.
    fn broadcast(&mut self, outcome: &ActionOutcome) {
        let kind = ActionKind::from(outcome.action_type);
        let moves_relationships = self.relationship_rules.action_deltas.contains_key(&kind);
        let emotion_delta = self.emotion_rules.deltas.get(&kind).copied();
        if !moves_relationships && emotion_delta.is_none() {
            return;
        }

        let mut query = self
            .world
            .query::<(&AgentName, &mut RelationshipLedger, &mut EmotionLedger)>();
        for (observer, mut relationships, mut emotions) in query.iter_mut(&mut self.world) {
            if observer.0 == outcome.actor {
                continue;
            }
            if moves_relationships {
                self.relationship_rules.apply(
                    relationships.entry(&outcome.actor),
                    kind,
                    Some(outcome.description.as_str()),
                );
            }
            let is_target = observer.0 == outcome.target;
            if emotion_delta.is_some_and(|d| is_target || d.applies_to_bystanders) {
                self.emotion_rules
                    .apply(emotions.entry(&outcome.actor), kind, is_target);
            }
        }
    }

    /// Each agent remembers this turn's outcomes as one summary
    fn record_history(&mut self, turn_events: &[TurnEvent]) {
        if turn_events.is_empty() {
            return;
        }
        let summary = turn_events
            .iter()
            .map(TurnEvent::history_line)
            .collect::<Vec<_>>()
            .join("\n");
        let depth = self.settings.history_depth;
        let mut query = self.world.query::<&mut TurnHistory>();
        for mut history in query.iter_mut(&mut self.world) {
            history.push(summary.clone(), depth);
        }
    }
}

/// Agent entities and names sorted by `TurnOrder`
fn decision_order(world: &mut World) -> (Vec<Entity>, Vec<String>) {
    let mut query = world.query::<(Entity, &TurnOrder, &AgentName)>();
    let mut ordered: Vec<(TurnOrder, Entity, String)> = query
        .iter(world)
        .map(|(entity, order, name)| (*order, entity, name.0.clone()))
        .collect();
    ordered.sort_by_key(|(order, _, _)| *order);
    ordered
        .into_iter()
        .map(|(_, entity, name)| (entity, name))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersonaConfig;
    use crate::proposer::ScriptedProposer;
    use crate::systems::EmotionDelta;
    use society_events::{Action, CostModifier, ResourceKind};

    fn config(names: &[&str]) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.personas = names
            .iter()
            .map(|name| PersonaConfig {
                name: name.to_string(),
                archetype: "Diplomat".to_string(),
                description: String::new(),
                goals: Vec::new(),
                ambition: 0.0,
            })
            .collect();
        config
    }

    #[test]
    fn test_support_reaches_target_later_in_same_turn() {
        let proposer = ScriptedProposer::new()
            .with("Ada", [Action::support("Bram")])
            .with("Bram", [Action::resource(ActionType::ImproveInfrastructure)]);
        let mut controller = TurnController::new(&config(&["Ada", "Bram"]), proposer).unwrap();

        controller.run_turn().unwrap();

        let observations = controller.proposer().observations();
        assert_eq!(observations.len(), 2);
        assert!(observations[0].targeted_by.is_empty());
        assert_eq!(observations[1].targeted_by.len(), 1);
        assert_eq!(observations[1].modifier, Some(CostModifier::Boosted));

        // 50 + 12 boosted output, then 2 decay
        assert_eq!(controller.snapshot().get(ResourceKind::Infrastructure), 60);
        assert!(controller.snapshot().cost_modifiers.is_empty());
    }

    #[test]
    fn test_broadcast_skips_actor() {
        let proposer = ScriptedProposer::new().with("Ada", [Action::oppose("Bram")]);
        let mut controller =
            TurnController::new(&config(&["Ada", "Bram", "Cato"]), proposer).unwrap();

        controller.run_turn().unwrap();

        assert!(controller.relationships("Ada").unwrap().is_empty());
        let bram = controller.relationships("Bram").unwrap().get("Ada").unwrap();
        assert_eq!((bram.trust, bram.resentment), (-10, 10));
        let cato = controller.relationships("Cato").unwrap().get("Ada").unwrap();
        assert_eq!((cato.trust, cato.resentment), (-10, 10));

        // Emotions only move for the target of oppose
        let bram_fear = controller.emotions("Bram").unwrap().get("Ada").unwrap().fear;
        assert_eq!(bram_fear, 1.0);
        assert!(controller.emotions("Cato").unwrap().get("Ada").is_none());
    }

    #[test]
    fn test_rejection_becomes_failed_event() {
        let proposer = ScriptedProposer::new().with("Ada", [Action::support("Ada")]);
        let mut controller = TurnController::new(&config(&["Ada", "Bram"]), proposer).unwrap();

        controller.run_turn().unwrap();

        let event = &controller.events()[0];
        assert!(!event.success);
        assert_eq!(event.action_type, ActionType::SupportAgent);
        assert_eq!(controller.events().len(), 2);
    }

    #[test]
    fn test_decision_order_follows_turn_order() {
        let mut world = World::new();
        world.spawn(AgentBundle::new("Cato", Persona::default(), 2));
        world.spawn(AgentBundle::new("Ada", Persona::default(), 0));
        world.spawn(AgentBundle::new("Bram", Persona::default(), 1));

        let (agents, names) = decision_order(&mut world);

        assert_eq!(names, vec!["Ada", "Bram", "Cato"]);
        assert_eq!(world.get::<TurnOrder>(agents[2]), Some(&TurnOrder(2)));
    }

    #[test]
    fn test_bystander_emotions_follow_injected_rules() {
        let mut rules = EmotionRules::default();
        rules.deltas.insert(
            ActionKind::BoostMorale,
            EmotionDelta::general(0.0, 0.0, 4.0, 0.0),
        );
        let proposer =
            ScriptedProposer::new().with("Ada", [Action::resource(ActionType::BoostMorale)]);
        let mut controller = TurnController::new(&config(&["Ada", "Bram", "Cato"]), proposer)
            .unwrap()
            .with_emotion_rules(rules);

        controller.run_turn().unwrap();

        for observer in ["Bram", "Cato"] {
            let emotions = controller.emotions(observer).unwrap().get("Ada").unwrap();
            assert_eq!(emotions.admiration, 4.0);
        }
        assert!(controller.emotions("Ada").unwrap().is_empty());
        // No relationship delta for boost_morale
        assert!(controller.relationships("Bram").unwrap().is_empty());
    }

    #[test]
    fn test_history_respects_depth() {
        let mut config = config(&["Ada"]);
        config.simulation.history_depth = 1;
        let mut controller = TurnController::new(&config, ScriptedProposer::new()).unwrap();

        controller.run_turn().unwrap();
        controller.run_turn().ok();

        let observations = controller.proposer().observations();
        assert!(observations[0].history.is_empty());
        assert_eq!(observations[1].history, vec!["Turn 1: Ada passed".to_string()]);
    }
}
