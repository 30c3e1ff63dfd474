//! World State
//!
//! The authoritative pooled-resource state. Only the world engine holds a
//! mutable instance; everything else reads [`WorldSnapshot`]s.

use serde::{Deserialize, Serialize};
use society_events::{CostModifier, Message, ResourceKind, WorldSnapshot};
use std::collections::BTreeMap;

/// Shared economy of the society
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    pub turn: u64,
    pub treasury: u32,
    pub food: u32,
    pub energy: u32,
    pub infrastructure: u32,
    pub morale: u32,
    /// One-shot output modifiers keyed by agent name
    #[serde(default)]
    pub cost_modifiers: BTreeMap<String, CostModifier>,
    /// Messages sent this turn, delivered at the start of the next
    #[serde(default)]
    pub message_queue: Vec<Message>,
}

impl Default for WorldState {
    fn default() -> Self {
        Self::uniform(50)
    }
}

impl WorldState {
    /// All five resources at the same level
    pub fn uniform(level: u32) -> Self {
        Self::with_resources(level, level, level, level, level)
    }

    pub fn with_resources(
        treasury: u32,
        food: u32,
        energy: u32,
        infrastructure: u32,
        morale: u32,
    ) -> Self {
        Self {
            turn: 0,
            treasury,
            food,
            energy,
            infrastructure,
            morale,
            cost_modifiers: BTreeMap::new(),
            message_queue: Vec::new(),
        }
    }

    pub fn get(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Treasury => self.treasury,
            ResourceKind::Food => self.food,
            ResourceKind::Energy => self.energy,
            ResourceKind::Infrastructure => self.infrastructure,
            ResourceKind::Morale => self.morale,
        }
    }

    fn slot_mut(&mut self, resource: ResourceKind) -> &mut u32 {
        match resource {
            ResourceKind::Treasury => &mut self.treasury,
            ResourceKind::Food => &mut self.food,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Infrastructure => &mut self.infrastructure,
            ResourceKind::Morale => &mut self.morale,
        }
    }

    /// Add a signed delta, clamping the result at zero. Returns the new amount.
    pub fn adjust(&mut self, resource: ResourceKind, delta: i64) -> u32 {
        let slot = self.slot_mut(resource);
        let updated = (*slot as i64 + delta).clamp(0, u32::MAX as i64);
        *slot = updated as u32;
        *slot
    }

    /// `max(0, 100 - floor(mean of the five resources))`, derived on every read
    pub fn crisis_level(&self) -> u32 {
        let total: u64 = ResourceKind::all()
            .iter()
            .map(|r| self.get(*r) as u64)
            .sum();
        100u64.saturating_sub(total / 5) as u32
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            turn: self.turn,
            treasury: self.treasury,
            food: self.food,
            energy: self.energy,
            infrastructure: self.infrastructure,
            morale: self.morale,
            crisis_level: self.crisis_level(),
            cost_modifiers: self.cost_modifiers.clone(),
            pending_messages: self.message_queue.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_clamps_at_zero() {
        let mut state = WorldState::uniform(5);
        assert_eq!(state.adjust(ResourceKind::Food, -8), 0);
        assert_eq!(state.adjust(ResourceKind::Food, 3), 3);
        assert_eq!(state.adjust(ResourceKind::Morale, 10), 15);
    }

    #[test]
    fn test_crisis_level() {
        assert_eq!(WorldState::uniform(50).crisis_level(), 50);
        assert_eq!(WorldState::uniform(0).crisis_level(), 100);
        assert_eq!(WorldState::uniform(120).crisis_level(), 0);
        // mean 50.6 floors to 50
        let state = WorldState::with_resources(47, 50, 58, 50, 48);
        assert_eq!(state.crisis_level(), 50);
    }

    #[test]
    fn test_snapshot_copies_state() {
        let mut state = WorldState::with_resources(10, 20, 30, 40, 50);
        state
            .cost_modifiers
            .insert("Mara".to_string(), CostModifier::Boosted);
        state
            .message_queue
            .push(Message::new("Mara", "Eldric", "hi", 0));

        let snapshot = state.snapshot();
        assert_eq!(snapshot.food, 20);
        assert_eq!(snapshot.crisis_level, 70);
        assert_eq!(snapshot.pending_messages, 1);
        assert_eq!(snapshot.modifier_for("Mara"), Some(CostModifier::Boosted));
    }
}
