//! Interaction Triggers
//!
//! Short situational prompts telling an agent why it might want to act socially.

use society_events::WorldSnapshot;

pub mod trigger_thresholds {
    pub const LOW_FOOD: u32 = 30;
    pub const CRISIS: u32 = 60;
    pub const LOW_MORALE: u32 = 40;
}

pub fn compute_triggers(
    snapshot: &WorldSnapshot,
    targeted_this_turn: bool,
    has_messages: bool,
) -> Vec<String> {
    let mut triggers = Vec::new();

    if targeted_this_turn {
        triggers.push("You have been targeted by other agents this turn.".to_string());
    }
    if snapshot.food < trigger_thresholds::LOW_FOOD {
        triggers.push("Food supplies are dwindling.".to_string());
    }
    if snapshot.crisis_level > trigger_thresholds::CRISIS {
        triggers.push("The world is in crisis.".to_string());
    }
    if snapshot.morale < trigger_thresholds::LOW_MORALE {
        triggers.push("Public morale is low; the people are restless.".to_string());
    }
    if has_messages {
        triggers.push("You have received new messages.".to_string());
    }

    triggers
}
