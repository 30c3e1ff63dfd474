//! Snapshot Types
//!
//! Immutable copies of world state handed to observers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::action::ResourceKind;

/// One-shot multiplier on an agent's next resource action output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModifier {
    /// Set by `support_agent`: next output scaled up by half
    Boosted,
    /// Set by `oppose_agent`: next output scaled down by half
    Hindered,
}

impl CostModifier {
    pub fn multiplier(&self) -> f64 {
        match self {
            CostModifier::Boosted => 1.5,
            CostModifier::Hindered => 0.5,
        }
    }

    /// Short human-readable description for prompts and logs
    pub fn describe(&self) -> &'static str {
        match self {
            CostModifier::Boosted => "SUPPORTED: your next resource action yields 50% more",
            CostModifier::Hindered => "OPPOSED: your next resource action yields 50% less",
        }
    }
}

/// Read-only copy of the world at one moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub turn: u64,
    pub treasury: u32,
    pub food: u32,
    pub energy: u32,
    pub infrastructure: u32,
    pub morale: u32,
    /// 0-100 scarcity indicator derived from the five resources
    pub crisis_level: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cost_modifiers: BTreeMap<String, CostModifier>,
    #[serde(default)]
    pub pending_messages: usize,
}

impl WorldSnapshot {
    /// Amount currently held of a resource
    pub fn get(&self, resource: ResourceKind) -> u32 {
        match resource {
            ResourceKind::Treasury => self.treasury,
            ResourceKind::Food => self.food,
            ResourceKind::Energy => self.energy,
            ResourceKind::Infrastructure => self.infrastructure,
            ResourceKind::Morale => self.morale,
        }
    }

    /// Modifier waiting on an agent's next resource action, if any
    pub fn modifier_for(&self, agent: &str) -> Option<CostModifier> {
        self.cost_modifiers.get(agent).copied()
    }

    /// Compact one-line summary, e.g. for turn logs
    pub fn summary_line(&self) -> String {
        format!(
            "TREASURY={} FOOD={} ENERGY={} INFRA={} MORALE={} CRISIS={}",
            self.treasury, self.food, self.energy, self.infrastructure, self.morale, self.crisis_level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WorldSnapshot {
        WorldSnapshot {
            turn: 3,
            treasury: 10,
            food: 20,
            energy: 30,
            infrastructure: 40,
            morale: 50,
            crisis_level: 70,
            cost_modifiers: BTreeMap::new(),
            pending_messages: 0,
        }
    }

    #[test]
    fn test_get_by_resource() {
        let snapshot = sample();
        assert_eq!(snapshot.get(ResourceKind::Treasury), 10);
        assert_eq!(snapshot.get(ResourceKind::Infrastructure), 40);
        assert_eq!(snapshot.get(ResourceKind::Morale), 50);
    }

    #[test]
    fn test_modifier_multipliers() {
        assert_eq!(CostModifier::Boosted.multiplier(), 1.5);
        assert_eq!(CostModifier::Hindered.multiplier(), 0.5);
    }

    #[test]
    fn test_modifier_lookup() {
        let mut snapshot = sample();
        snapshot
            .cost_modifiers
            .insert("Mara".to_string(), CostModifier::Hindered);

        assert_eq!(snapshot.modifier_for("Mara"), Some(CostModifier::Hindered));
        assert_eq!(snapshot.modifier_for("Eldric"), None);
    }

    #[test]
    fn test_snapshot_json_omits_empty_modifiers() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("cost_modifiers"));
        assert!(json.contains("\"crisis_level\":70"));
    }
}
