//! Economy Rules
//!
//! Cost/yield table and the fixed social and decay constants, injected into
//! the engine at construction so tests can override them.

use serde::{Deserialize, Serialize};
use society_events::{ActionType, ResourceKind};

/// Thresholds for unrecoverable world conditions
pub mod terminal {
    /// Economic collapse needs an empty treasury and infrastructure below this
    pub const COLLAPSE_INFRASTRUCTURE: u32 = 20;
    /// Revolt at or below this morale
    pub const REVOLT_MORALE: u32 = 5;
}

/// What one resource project spends and produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub spend: ResourceKind,
    pub cost: u32,
    pub gain: ResourceKind,
    pub output: u32,
}

impl ResourceCost {
    pub const fn new(spend: ResourceKind, cost: u32, gain: ResourceKind, output: u32) -> Self {
        Self {
            spend,
            cost,
            gain,
            output,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyRules {
    pub improve_food: ResourceCost,
    pub improve_energy: ResourceCost,
    pub improve_infrastructure: ResourceCost,
    pub boost_morale: ResourceCost,
    pub generate_treasury: ResourceCost,
    /// Morale gained when anyone supports another agent
    pub support_morale_bonus: u32,
    /// Morale lost when anyone opposes another agent
    pub oppose_morale_penalty: u32,
    /// Per-turn decay of every resource except morale
    pub entropy_decay: u32,
}

impl Default for EconomyRules {
    fn default() -> Self {
        use ResourceKind::*;
        Self {
            improve_food: ResourceCost::new(Energy, 3, Food, 8),
            improve_energy: ResourceCost::new(Treasury, 3, Energy, 8),
            improve_infrastructure: ResourceCost::new(Treasury, 4, Infrastructure, 8),
            boost_morale: ResourceCost::new(Food, 2, Morale, 8),
            generate_treasury: ResourceCost::new(Energy, 4, Treasury, 3),
            support_morale_bonus: 5,
            oppose_morale_penalty: 3,
            entropy_decay: 2,
        }
    }
}

impl EconomyRules {
    /// Cost entry for a chargeable action; `None` for free actions
    pub fn cost(&self, action_type: ActionType) -> Option<&ResourceCost> {
        match action_type {
            ActionType::ImproveFood => Some(&self.improve_food),
            ActionType::ImproveEnergy => Some(&self.improve_energy),
            ActionType::ImproveInfrastructure => Some(&self.improve_infrastructure),
            ActionType::BoostMorale => Some(&self.boost_morale),
            ActionType::GenerateTreasury => Some(&self.generate_treasury),
            ActionType::SupportAgent
            | ActionType::OpposeAgent
            | ActionType::SendMessage
            | ActionType::Pass => None,
        }
    }

    /// Resources that decay each turn
    pub fn decaying_resources() -> &'static [ResourceKind] {
        &[
            ResourceKind::Treasury,
            ResourceKind::Food,
            ResourceKind::Energy,
            ResourceKind::Infrastructure,
        ]
    }
}
