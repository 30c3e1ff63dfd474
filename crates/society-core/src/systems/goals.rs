//! Interpersonal Goals
//!
//! Threshold rules with hysteresis: a slot is set above a high threshold and
//! cleared only at or below a lower one, and only when it still names the
//! counterpart being evaluated.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::agent::{AgentName, Persona};
use crate::components::social::{EmotionLedger, EmotionVector, GoalSlot, InterpersonalGoals};
use crate::economy::WorldEngine;

/// Resource: set/clear thresholds for each goal slot
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalThresholds {
    pub ally_set: f64,
    pub ally_clear: f64,
    pub undermine_set: f64,
    pub undermine_clear: f64,
    pub approval_set: f64,
    pub approval_clear: f64,
    /// Own ambition must exceed this to seek influence
    pub influence_ambition: f64,
    /// World morale must be below this to seek influence
    pub influence_stability: u32,
}

impl Default for GoalThresholds {
    fn default() -> Self {
        Self {
            ally_set: 15.0,
            ally_clear: 10.0,
            undermine_set: 15.0,
            undermine_clear: 10.0,
            approval_set: 10.0,
            approval_clear: 5.0,
            influence_ambition: 10.0,
            influence_stability: 50,
        }
    }
}

/// A slot that changed during evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalChange {
    Set { slot: GoalSlot, counterpart: String },
    Cleared { slot: GoalSlot, counterpart: String },
}

fn hysteresis(
    goals: &mut InterpersonalGoals,
    slot: GoalSlot,
    counterpart: &str,
    value: f64,
    set_above: f64,
    clear_at: f64,
    changes: &mut Vec<GoalChange>,
) {
    if value > set_above {
        if goals.get(slot) != Some(counterpart) {
            goals.set(slot, counterpart);
            changes.push(GoalChange::Set {
                slot,
                counterpart: counterpart.to_string(),
            });
        }
    } else if value <= clear_at && goals.clear_if(slot, counterpart) {
        changes.push(GoalChange::Cleared {
            slot,
            counterpart: counterpart.to_string(),
        });
    }
}

/// Re-evaluate every slot against one counterpart
pub fn evaluate_goals(
    goals: &mut InterpersonalGoals,
    counterpart: &str,
    emotions: &EmotionVector,
    world_stability: u32,
    ambition: f64,
    thresholds: &GoalThresholds,
) -> Vec<GoalChange> {
    let mut changes = Vec::new();

    hysteresis(
        goals,
        GoalSlot::AllyWith,
        counterpart,
        emotions.trust,
        thresholds.ally_set,
        thresholds.ally_clear,
        &mut changes,
    );
    hysteresis(
        goals,
        GoalSlot::Undermine,
        counterpart,
        emotions.resentment,
        thresholds.undermine_set,
        thresholds.undermine_clear,
        &mut changes,
    );
    hysteresis(
        goals,
        GoalSlot::SeekApprovalFrom,
        counterpart,
        emotions.admiration,
        thresholds.approval_set,
        thresholds.approval_clear,
        &mut changes,
    );

    let seeks_influence =
        ambition > thresholds.influence_ambition && world_stability < thresholds.influence_stability;
    let slot = GoalSlot::GainInfluenceOver;
    if seeks_influence {
        if goals.get(slot) != Some(counterpart) {
            goals.set(slot, counterpart);
            changes.push(GoalChange::Set {
                slot,
                counterpart: counterpart.to_string(),
            });
        }
    } else if goals.clear_if(slot, counterpart) {
        changes.push(GoalChange::Cleared {
            slot,
            counterpart: counterpart.to_string(),
        });
    }

    changes
}

/// System: re-evaluate each agent's goals toward every counterpart it holds
/// emotions for, in lexical counterpart order.
pub fn update_interpersonal_goals(
    engine: Res<WorldEngine>,
    thresholds: Res<GoalThresholds>,
    mut query: Query<(&AgentName, &Persona, &EmotionLedger, &mut InterpersonalGoals)>,
) {
    let stability = engine.state().morale;

    for (name, persona, ledger, mut goals) in query.iter_mut() {
        for (counterpart, emotions) in ledger.iter() {
            let changes = evaluate_goals(
                &mut goals,
                counterpart,
                emotions,
                stability,
                persona.ambition,
                &thresholds,
            );
            for change in changes {
                tracing::debug!(agent = %name.0, ?change, "goal updated");
            }
        }
    }
}
