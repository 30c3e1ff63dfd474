//! Decision Bias
//!
//! Pure composition of persona, world pressure, emotions, goals, and recent
//! repetition into an additive weight per action kind. The weights steer the
//! proposer; the world engine never reads them.

use society_events::ActionKind;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::components::social::{EmotionLedger, GoalSlot, InterpersonalGoals, RelationshipLedger};
use crate::systems::emotion::emotional_bias;

pub type BiasMap = BTreeMap<ActionKind, f64>;

/// Weights and thresholds for bias composition
pub mod bias_weights {
    pub const SOCIAL_BASE: f64 = 0.30;
    pub const RESOURCE_BASE: f64 = 0.15;
    pub const PASS_BASE: f64 = 0.05;
    /// Resource kinds jump to this weight once crisis exceeds the threshold
    pub const CRISIS_RESOURCE_WEIGHT: f64 = 0.80;
    pub const CRISIS_THRESHOLD: u32 = 60;

    pub const WARM_RELATIONS: f64 = 20.0;
    pub const COLD_RELATIONS: f64 = -20.0;

    pub const GOAL_BONUS: f64 = 0.25;

    pub const REPEAT_PENALTY: f64 = 0.30;
    pub const SPAMMABLE_REPEAT_PENALTY: f64 = 0.50;
    /// Extra penalty once the same action was chosen three times running
    pub const LOOP_PENALTY: f64 = 1.0;
    pub const MIN_WEIGHT: f64 = 0.01;

    /// Minimum trust or resentment for a recommended target
    pub const MEANINGFUL_RELATIONSHIP: i32 = 5;
}

/// Fixed offsets per persona archetype keyword
fn archetype_offsets(keyword: &str) -> &'static [(ActionKind, f64)] {
    use ActionKind::*;
    match keyword {
        "guardian" => &[
            (ImproveInfrastructure, 0.20),
            (SupportAgent, 0.10),
            (FormAlliance, 0.10),
            (OfferProtection, 0.10),
            (ProposePolicy, -0.10),
        ],
        "reformer" => &[
            (ProposePolicy, 0.20),
            (ImproveEnergy, 0.10),
            (Negotiate, 0.10),
            (OpposeAgent, 0.05),
        ],
        "opportunist" => &[
            (Trade, 0.20),
            (GenerateTreasury, 0.15),
            (SpreadRumor, 0.10),
            (FormAlliance, -0.05),
        ],
        "conservative" => &[
            (ImproveFood, 0.15),
            (GenerateTreasury, 0.10),
            (OpposeAgent, 0.10),
            (ProposePolicy, -0.15),
        ],
        "populist" => &[
            (BoostMorale, 0.20),
            (SendMessage, 0.10),
            (DenounceAgent, 0.10),
        ],
        "diplomat" => &[
            (Negotiate, 0.20),
            (SendMessage, 0.15),
            (OfferConcession, 0.10),
            (Sabotage, -0.20),
        ],
        _ => &[],
    }
}

/// Action kinds that serve a goal slot
pub fn goal_actions(slot: GoalSlot) -> &'static [ActionKind] {
    use ActionKind::*;
    match slot {
        GoalSlot::AllyWith => &[FormAlliance, SupportAgent, OfferProtection],
        GoalSlot::Undermine => &[OpposeAgent, Sabotage, DenounceAgent, SpreadRumor],
        GoalSlot::SeekApprovalFrom => &[OfferConcession, SupportAgent, SendMessage],
        GoalSlot::GainInfluenceOver => &[ProposePolicy, Negotiate, DemandConcession],
    }
}

fn base_weight(kind: ActionKind, crisis_level: u32) -> f64 {
    if kind == ActionKind::Pass {
        bias_weights::PASS_BASE
    } else if kind.is_resource() {
        if crisis_level > bias_weights::CRISIS_THRESHOLD {
            bias_weights::CRISIS_RESOURCE_WEIGHT
        } else {
            bias_weights::RESOURCE_BASE
        }
    } else if kind == ActionKind::ConsumeResource {
        bias_weights::RESOURCE_BASE
    } else {
        bias_weights::SOCIAL_BASE
    }
}

fn is_spammable(kind: ActionKind) -> bool {
    matches!(kind, ActionKind::SendMessage | ActionKind::ProposePolicy)
}

/// Compose the bias table for one decision.
///
/// `recent_actions` is oldest first.
pub fn compose(
    archetype: &str,
    crisis_level: u32,
    relationship_avg: f64,
    emotions: &EmotionLedger,
    goals: &InterpersonalGoals,
    recent_actions: &[ActionKind],
) -> BiasMap {
    let mut bias: BiasMap = ActionKind::all()
        .iter()
        .map(|kind| (*kind, base_weight(*kind, crisis_level)))
        .collect();
    let bump = |bias: &mut BiasMap, kind: ActionKind, amount: f64| {
        *bias.entry(kind).or_insert(0.0) += amount;
    };

    // Relationship climate
    if relationship_avg > bias_weights::WARM_RELATIONS {
        bump(&mut bias, ActionKind::SupportAgent, 0.10);
        bump(&mut bias, ActionKind::Trade, 0.05);
        bump(&mut bias, ActionKind::SendMessage, 0.05);
    } else if relationship_avg < bias_weights::COLD_RELATIONS {
        bump(&mut bias, ActionKind::OpposeAgent, 0.10);
        bump(&mut bias, ActionKind::Sabotage, 0.05);
    } else {
        bump(&mut bias, ActionKind::Negotiate, 0.10);
    }

    // Archetype
    let lower = archetype.to_lowercase();
    for keyword in lower.split(|c: char| !c.is_alphanumeric()) {
        for (kind, offset) in archetype_offsets(keyword) {
            bump(&mut bias, *kind, *offset);
        }
    }

    // Emotions, averaged over counterparts
    if !emotions.is_empty() {
        let count = emotions.len() as f64;
        let mut totals = BiasMap::new();
        for (_, vector) in emotions.iter() {
            for (kind, term) in emotional_bias(vector) {
                *totals.entry(kind).or_insert(0.0) += term;
            }
        }
        for (kind, total) in totals {
            bump(&mut bias, kind, total / count);
        }
    }

    // Goals
    for (slot, _) in goals.active() {
        for kind in goal_actions(slot) {
            bump(&mut bias, *kind, bias_weights::GOAL_BONUS);
        }
    }

    for weight in bias.values_mut() {
        *weight = weight.max(bias_weights::MIN_WEIGHT);
    }

    // Repetition
    if let Some(&last) = recent_actions.last() {
        let streak = recent_actions
            .iter()
            .rev()
            .take_while(|kind| **kind == last)
            .count();
        let per_repeat = if is_spammable(last) {
            bias_weights::SPAMMABLE_REPEAT_PENALTY
        } else {
            bias_weights::REPEAT_PENALTY
        };
        let mut penalty = per_repeat * streak.min(2) as f64;
        if streak >= 3 {
            penalty += bias_weights::LOOP_PENALTY;
        }
        if let Some(weight) = bias.get_mut(&last) {
            *weight = (*weight - penalty).max(0.0);
        }
    }

    bias
}

/// The `n` heaviest kinds, ties broken by kind name
pub fn get_top_actions(bias: &BiasMap, n: usize) -> Vec<(ActionKind, f64)> {
    let mut ranked: Vec<(ActionKind, f64)> = bias.iter().map(|(k, w)| (*k, *w)).collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.as_str().cmp(b.0.as_str()))
    });
    ranked.truncate(n);
    ranked
}

/// Suggested counterparts for support and opposition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendedTargets {
    /// Highest trust, if meaningful
    pub support: Option<String>,
    /// Highest resentment, if meaningful
    pub oppose: Option<String>,
}

impl RecommendedTargets {
    pub fn is_empty(&self) -> bool {
        self.support.is_none() && self.oppose.is_none()
    }
}

pub fn get_recommended_targets(relationships: &RelationshipLedger) -> RecommendedTargets {
    let mut support: Option<(&String, i32)> = None;
    let mut oppose: Option<(&String, i32)> = None;

    for (name, relationship) in relationships.iter() {
        if relationship.trust >= bias_weights::MEANINGFUL_RELATIONSHIP
            && support.map_or(true, |(_, best)| relationship.trust > best)
        {
            support = Some((name, relationship.trust));
        }
        if relationship.resentment >= bias_weights::MEANINGFUL_RELATIONSHIP
            && oppose.map_or(true, |(_, best)| relationship.resentment > best)
        {
            oppose = Some((name, relationship.resentment));
        }
    }

    RecommendedTargets {
        support: support.map(|(name, _)| name.clone()),
        oppose: oppose.map(|(name, _)| name.clone()),
    }
}
