//! Action Proposers
//!
//! The decision seam. A proposer turns an [`Observation`] into an [`Action`];
//! it may fail, and [`RetryingProposer`] turns repeated failure into a pass.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use society_events::{Action, ActionKind, ActionType, WORLD_TARGET};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

use crate::controller::observation::{Observation, Standing};
use crate::economy::sanitize_target;

#[derive(Debug, Error)]
pub enum ProposerError {
    #[error("malformed proposal: {0}")]
    Malformed(String),

    #[error("unknown action type '{0}'")]
    UnknownAction(String),

    #[error("invalid proposal JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("proposer unavailable: {0}")]
    Unavailable(String),
}

pub trait ActionProposer {
    fn propose(&mut self, observation: &Observation) -> Result<Action, ProposerError>;
}

/// Wraps a proposer with a bounded number of attempts
pub struct RetryingProposer<P> {
    inner: P,
    attempts: u32,
}

impl<P: ActionProposer> RetryingProposer<P> {
    pub fn new(inner: P, attempts: u32) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Always yields an action; falls back to pass with a diagnostic reason
    pub fn decide(&mut self, observation: &Observation) -> Action {
        let mut last_error = None;
        for attempt in 1..=self.attempts {
            match self.inner.propose(observation) {
                Ok(action) => return action,
                Err(e) => {
                    tracing::warn!(
                        agent = %observation.agent,
                        attempt,
                        error = %e,
                        "proposer failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let reason = match last_error {
            Some(e) => format!("proposer failed after {} attempts: {}", self.attempts, e),
            None => "proposer produced no action".to_string(),
        };
        Action::pass().with_reason(reason)
    }
}

/// Replays queued actions per agent; agents without a script pass
#[derive(Debug, Default)]
pub struct ScriptedProposer {
    scripts: BTreeMap<String, VecDeque<Action>>,
    observations: Vec<Observation>,
}

impl ScriptedProposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, agent: impl Into<String>, action: Action) -> &mut Self {
        self.scripts.entry(agent.into()).or_default().push_back(action);
        self
    }

    pub fn with(mut self, agent: impl Into<String>, actions: impl IntoIterator<Item = Action>) -> Self {
        self.scripts.entry(agent.into()).or_default().extend(actions);
        self
    }

    /// Every observation seen so far, in call order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }
}

impl ActionProposer for ScriptedProposer {
    fn propose(&mut self, observation: &Observation) -> Result<Action, ProposerError> {
        self.observations.push(observation.clone());
        let action = self
            .scripts
            .get_mut(&observation.agent)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Action::pass().with_reason("no scripted action"));
        Ok(action)
    }
}

/// Picks an executable kind by weighted random choice over the bias table
pub struct WeightedProposer {
    rng: SmallRng,
}

impl WeightedProposer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn candidates(observation: &Observation) -> Vec<(ActionType, f64)> {
        observation
            .bias
            .iter()
            .filter_map(|(kind, weight)| kind.executable().map(|t| (t, *weight)))
            .filter(|(action_type, weight)| *weight > 0.0 && observation.can_afford(*action_type))
            .filter(|(action_type, _)| {
                !action_type.targets_agent() || !observation.valid_targets.is_empty()
            })
            .collect()
    }

    fn pick_target(&mut self, observation: &Observation, preferred: Option<&String>) -> String {
        if let Some(name) = preferred {
            return name.clone();
        }
        let index = self.rng.gen_range(0..observation.valid_targets.len());
        observation.valid_targets[index].clone()
    }

    fn message_for(observation: &Observation, target: &str) -> String {
        match observation.standing_of(target) {
            Standing::Ally => "Thank you for your support, friend. Let's keep working together.",
            Standing::Rival => "Your choices are hurting all of us. Change course.",
            Standing::Neutral => "We should coordinate on the shortages before they get worse.",
        }
        .to_string()
    }
}

/// Weighted random selection; the last candidate absorbs rounding
fn weighted_random_choice<R: Rng>(rng: &mut R, candidates: &[(ActionType, f64)]) -> Option<ActionType> {
    let total_weight: f64 = candidates.iter().map(|(_, w)| w).sum();
    if candidates.is_empty() || total_weight <= 0.0 {
        return None;
    }

    let mut roll = rng.gen::<f64>() * total_weight;
    for (action_type, weight) in candidates {
        if *weight <= 0.0 {
            continue;
        }
        roll -= weight;
        if roll <= 0.0 {
            return Some(*action_type);
        }
    }
    candidates
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0.0)
        .map(|(action_type, _)| *action_type)
}

impl ActionProposer for WeightedProposer {
    fn propose(&mut self, observation: &Observation) -> Result<Action, ProposerError> {
        let candidates = Self::candidates(observation);
        let Some(action_type) = weighted_random_choice(&mut self.rng, &candidates) else {
            return Ok(Action::pass().with_reason("nothing worth doing"));
        };

        let reason = format!("weighted choice ({} candidates)", candidates.len());
        let recommended = &observation.recommended_targets;
        let action = match action_type {
            ActionType::SupportAgent => {
                Action::support(self.pick_target(observation, recommended.support.as_ref()))
            }
            ActionType::OpposeAgent => {
                Action::oppose(self.pick_target(observation, recommended.oppose.as_ref()))
            }
            ActionType::SendMessage => {
                let target = self.pick_target(observation, None);
                let content = Self::message_for(observation, &target);
                Action::message(target, content)
            }
            ActionType::Pass => Action::pass(),
            resource => Action::resource(resource),
        };
        Ok(action.with_reason(reason))
    }
}

/// Raw JSON shape an LLM proposer returns
#[derive(Debug, Deserialize)]
struct RawProposal {
    #[serde(rename = "type", alias = "action", alias = "action_type")]
    action_type: String,
    #[serde(default)]
    target: Option<String>,
    #[serde(default, alias = "message")]
    content: Option<String>,
    #[serde(default, alias = "reasoning")]
    reason: Option<String>,
}

/// Decode an LLM JSON proposal, tolerating prose around the object
pub fn parse_proposal(text: &str) -> Result<Action, ProposerError> {
    let start = text
        .find('{')
        .ok_or_else(|| ProposerError::Malformed("no JSON object found".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| ProposerError::Malformed("unterminated JSON object".to_string()))?;

    let raw: RawProposal = serde_json::from_str(&text[start..=end])?;
    let kind: ActionKind = raw
        .action_type
        .parse()
        .map_err(|_| ProposerError::UnknownAction(raw.action_type.clone()))?;
    let action_type = kind
        .executable()
        .ok_or_else(|| ProposerError::UnknownAction(raw.action_type.clone()))?;

    let target = match raw.target.as_deref().map(sanitize_target) {
        Some(target) if !target.is_empty() => target,
        _ if action_type.is_chargeable() || action_type == ActionType::Pass => {
            WORLD_TARGET.to_string()
        }
        _ => String::new(),
    };

    let mut action = Action::new(action_type, target);
    action.content = raw.content.filter(|c| !c.trim().is_empty());
    action.reason = raw.reason;
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::world::WorldState;
    use crate::controller::observation::affordability_table;
    use crate::economy::EconomyRules;

    struct FailingProposer {
        calls: u32,
    }

    impl ActionProposer for FailingProposer {
        fn propose(&mut self, _observation: &Observation) -> Result<Action, ProposerError> {
            self.calls += 1;
            Err(ProposerError::Unavailable("timeout".to_string()))
        }
    }

    fn observation() -> Observation {
        Observation::new("Mara", WorldState::uniform(50).snapshot())
    }

    #[test]
    fn test_retry_exhaustion_defaults_to_pass() {
        let mut proposer = RetryingProposer::new(FailingProposer { calls: 0 }, 3);
        let action = proposer.decide(&observation());

        assert_eq!(action.action_type, ActionType::Pass);
        assert!(action.reason.unwrap().contains("after 3 attempts"));
        assert_eq!(proposer.inner().calls, 3);
    }

    #[test]
    fn test_scripted_proposer_replays_in_order() {
        let mut proposer = ScriptedProposer::new().with(
            "Mara",
            [Action::support("Tobin"), Action::resource(ActionType::ImproveFood)],
        );
        let obs = observation();

        assert_eq!(proposer.propose(&obs).unwrap(), Action::support("Tobin"));
        assert_eq!(
            proposer.propose(&obs).unwrap().action_type,
            ActionType::ImproveFood
        );
        assert_eq!(proposer.propose(&obs).unwrap().action_type, ActionType::Pass);
        assert_eq!(proposer.observations().len(), 3);
    }

    #[test]
    fn test_weighted_proposer_is_deterministic() {
        let snapshot = WorldState::uniform(50).snapshot();
        let mut obs = Observation::new("Mara", snapshot.clone());
        obs.valid_targets = vec!["Eldric".to_string(), "Tobin".to_string()];
        obs.affordability = affordability_table(&snapshot, &EconomyRules::default());
        obs.bias = crate::systems::bias::compose(
            "Diplomat",
            50,
            0.0,
            &Default::default(),
            &Default::default(),
            &[],
        );

        let mut a = WeightedProposer::new(7);
        let mut b = WeightedProposer::new(7);
        for _ in 0..20 {
            assert_eq!(a.propose(&obs).unwrap(), b.propose(&obs).unwrap());
        }
    }

    #[test]
    fn test_weighted_proposer_skips_unaffordable_and_targetless() {
        let snapshot = WorldState::uniform(0).snapshot();
        let mut obs = Observation::new("Mara", snapshot.clone());
        obs.affordability = affordability_table(&snapshot, &EconomyRules::default());
        obs.bias = [
            (ActionKind::ImproveFood, 5.0),
            (ActionKind::SupportAgent, 5.0),
            (ActionKind::Pass, 0.05),
        ]
        .into_iter()
        .collect();

        let mut proposer = WeightedProposer::new(1);
        for _ in 0..10 {
            assert_eq!(proposer.propose(&obs).unwrap().action_type, ActionType::Pass);
        }
    }

    #[test]
    fn test_weighted_choice_respects_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(3);
        let candidates = [(ActionType::Pass, 0.0), (ActionType::ImproveFood, 1.0)];
        for _ in 0..20 {
            assert_eq!(
                weighted_random_choice(&mut rng, &candidates),
                Some(ActionType::ImproveFood)
            );
        }
        assert_eq!(weighted_random_choice(&mut rng, &[]), None);
    }

    #[test]
    fn test_parse_proposal() {
        let text = r#"Sure! {"type": "send_message", "target": "[Eldric_the_Conservative]", "message": "Let's cooperate", "reasoning": "need allies"}"#;
        let action = parse_proposal(text).unwrap();
        assert_eq!(action.action_type, ActionType::SendMessage);
        assert_eq!(action.target, "Eldric the Conservative");
        assert_eq!(action.content.as_deref(), Some("Let's cooperate"));
        assert_eq!(action.reason.as_deref(), Some("need allies"));
    }

    #[test]
    fn test_parse_proposal_defaults_world_target() {
        let action = parse_proposal(r#"{"type": "Improve Food"}"#).unwrap();
        assert_eq!(action.action_type, ActionType::ImproveFood);
        assert_eq!(action.target, WORLD_TARGET);
    }

    #[test]
    fn test_parse_proposal_errors() {
        assert!(matches!(
            parse_proposal("I will pass this turn"),
            Err(ProposerError::Malformed(_))
        ));
        assert!(matches!(
            parse_proposal(r#"{"type": "sabotage", "target": "Mara"}"#),
            Err(ProposerError::UnknownAction(_))
        ));
        assert!(matches!(
            parse_proposal(r#"{"target": "Mara"}"#),
            Err(ProposerError::Json(_))
        ));
    }
}
