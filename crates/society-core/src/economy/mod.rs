//! World Economy Engine
//!
//! Owns the [`WorldState`], validates and applies actions, detects terminal
//! conditions, and advances turns. Validation happens in full before any
//! mutation, so a rejected action never partially applies.

pub mod rejection;
pub mod rules;
pub mod targets;

use bevy_ecs::prelude::*;
use society_events::{
    Action, ActionCategory, ActionType, CostModifier, Message, ResourceKind, TerminalReason,
    WorldSnapshot, WORLD_TARGET,
};

use crate::components::world::WorldState;

pub use rejection::Rejection;
pub use rules::{EconomyRules, ResourceCost};
pub use targets::{is_malformed_target, is_world_target, resolve_agent_name, sanitize_target};

/// Result of a successfully applied action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub actor: String,
    pub action_type: ActionType,
    /// Resolved agent name, or "world"
    pub target: String,
    pub description: String,
    pub spent: Option<(ResourceKind, u32)>,
    pub gained: Option<(ResourceKind, u32)>,
    /// Modifier consumed by this action, if one was waiting
    pub consumed_modifier: Option<CostModifier>,
}

impl ActionOutcome {
    fn new(actor: &str, action_type: ActionType, target: &str, description: String) -> Self {
        Self {
            actor: actor.to_string(),
            action_type,
            target: target.to_string(),
            description,
            spent: None,
            gained: None,
            consumed_modifier: None,
        }
    }
}

/// Resource: the single authority over world state
#[derive(Resource, Debug, Clone)]
pub struct WorldEngine {
    state: WorldState,
    rules: EconomyRules,
}

impl WorldEngine {
    pub fn new(state: WorldState, rules: EconomyRules) -> Self {
        Self { state, rules }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn rules(&self) -> &EconomyRules {
        &self.rules
    }

    pub fn turn(&self) -> u64 {
        self.state.turn
    }

    /// Immutable copy for observers
    pub fn observe(&self) -> WorldSnapshot {
        self.state.snapshot()
    }

    /// Take every queued message, leaving the queue empty
    pub fn drain_messages(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.state.message_queue)
    }

    /// Validate then apply an action for `actor`.
    pub fn apply_action(
        &mut self,
        actor: &str,
        action: &Action,
        valid_agents: &[String],
    ) -> Result<ActionOutcome, Rejection> {
        let target = self.validate(actor, action, valid_agents)?;
        let action_type = action.action_type;

        let outcome = match action_type.category() {
            ActionCategory::Pass => {
                ActionOutcome::new(actor, action_type, WORLD_TARGET, format!("{} passed", actor))
            }
            ActionCategory::Resource => self.apply_resource_action(actor, action_type),
            ActionCategory::Social => self.apply_social_action(actor, action_type, &target),
            ActionCategory::Message => {
                let content = action.content.as_deref().unwrap_or_default().trim();
                self.state.message_queue.push(Message::new(
                    actor,
                    target.as_str(),
                    content,
                    self.state.turn,
                ));
                ActionOutcome::new(
                    actor,
                    action_type,
                    &target,
                    format!("{} sent a message to {}", actor, target),
                )
            }
        };

        tracing::debug!(
            actor,
            action = %action_type,
            crisis = self.state.crisis_level(),
            "{}",
            outcome.description
        );
        Ok(outcome)
    }

    /// Check an action without mutating anything. Returns the resolved target.
    pub fn validate(
        &self,
        actor: &str,
        action: &Action,
        valid_agents: &[String],
    ) -> Result<String, Rejection> {
        let action_type = action.action_type;
        if action_type == ActionType::Pass {
            return Ok(WORLD_TARGET.to_string());
        }

        if is_malformed_target(&action.target) {
            return Err(Rejection::MalformedTarget {
                target: action.target.clone(),
            });
        }

        if action_type.is_chargeable() {
            if !is_world_target(&action.target) {
                return Err(Rejection::WrongCategory {
                    action_type,
                    target: action.target.clone(),
                    expected: "the world",
                });
            }
            if let Some(cost) = self.rules.cost(action_type) {
                let held = self.state.get(cost.spend);
                if held < cost.cost {
                    return Err(Rejection::InsufficientResource {
                        resource: cost.spend,
                        needed: cost.cost,
                        held,
                    });
                }
            }
            return Ok(WORLD_TARGET.to_string());
        }

        if is_world_target(&action.target) {
            return Err(Rejection::WrongCategory {
                action_type,
                target: action.target.clone(),
                expected: "another agent",
            });
        }

        let resolved = resolve_agent_name(&action.target, valid_agents).ok_or_else(|| {
            Rejection::UnknownTarget {
                target: action.target.clone(),
            }
        })?;

        if resolved == actor {
            return Err(Rejection::SelfTarget { action_type });
        }

        if action_type == ActionType::SendMessage
            && action
                .content
                .as_deref()
                .map_or(true, |c| c.trim().is_empty())
        {
            return Err(Rejection::MissingContent {
                target: resolved.to_string(),
            });
        }

        Ok(resolved.to_string())
    }

    fn apply_resource_action(&mut self, actor: &str, action_type: ActionType) -> ActionOutcome {
        let mut outcome = ActionOutcome::new(actor, action_type, WORLD_TARGET, String::new());
        let Some(cost) = self.rules.cost(action_type).copied() else {
            outcome.description = format!("{} used {}", actor, action_type);
            return outcome;
        };

        let modifier = self.state.cost_modifiers.remove(actor);
        let multiplier = modifier.map_or(1.0, |m| m.multiplier());
        let output = (cost.output as f64 * multiplier).floor() as u32;

        self.state.adjust(cost.spend, -(cost.cost as i64));
        self.state.adjust(cost.gain, output as i64);

        let mut description = format!(
            "{} used {} (-{} {}, +{} {})",
            actor, action_type, cost.cost, cost.spend, output, cost.gain
        );
        match modifier {
            Some(CostModifier::Boosted) => description.push_str(" [boosted by support]"),
            Some(CostModifier::Hindered) => description.push_str(" [hindered by opposition]"),
            None => {}
        }

        outcome.description = description;
        outcome.spent = Some((cost.spend, cost.cost));
        outcome.gained = Some((cost.gain, output));
        outcome.consumed_modifier = modifier;
        outcome
    }

    fn apply_social_action(
        &mut self,
        actor: &str,
        action_type: ActionType,
        target: &str,
    ) -> ActionOutcome {
        let description = match action_type {
            ActionType::SupportAgent => {
                self.state
                    .cost_modifiers
                    .insert(target.to_string(), CostModifier::Boosted);
                let bonus = self.rules.support_morale_bonus;
                self.state.adjust(ResourceKind::Morale, bonus as i64);
                format!("{} supported {} (morale +{})", actor, target, bonus)
            }
            ActionType::OpposeAgent => {
                self.state
                    .cost_modifiers
                    .insert(target.to_string(), CostModifier::Hindered);
                let penalty = self.rules.oppose_morale_penalty;
                self.state.adjust(ResourceKind::Morale, -(penalty as i64));
                format!("{} opposed {} (morale -{})", actor, target, penalty)
            }
            other => format!("{} used {} on {}", actor, other, target),
        };
        ActionOutcome::new(actor, action_type, target, description)
    }

    /// Move to the next turn and apply entropy decay
    pub fn advance_turn(&mut self) {
        self.state.turn += 1;
        let decay = self.rules.entropy_decay as i64;
        for resource in EconomyRules::decaying_resources() {
            self.state.adjust(*resource, -decay);
        }
    }

    /// First matching terminal condition, in precedence order
    pub fn check_terminal(&self) -> Option<TerminalReason> {
        let state = &self.state;
        if state.food == 0 {
            Some(TerminalReason::Starvation)
        } else if state.energy == 0 {
            Some(TerminalReason::EnergyCollapse)
        } else if state.treasury == 0
            && state.infrastructure < rules::terminal::COLLAPSE_INFRASTRUCTURE
        {
            Some(TerminalReason::EconomicCollapse)
        } else if state.morale <= rules::terminal::REVOLT_MORALE {
            Some(TerminalReason::Revolt)
        } else {
            None
        }
    }
}

impl Default for WorldEngine {
    fn default() -> Self {
        Self::new(WorldState::default(), EconomyRules::default())
    }
}
