//! Observation
//!
//! Everything an agent sees before deciding: the world snapshot plus the
//! derived, code-computed context (affordability, trends, standings, bias).

use serde::Serialize;
use society_events::{ActionKind, ActionType, CostModifier, ResourceKind, TargetingEvent, WorldSnapshot};

use crate::components::agent::{RecentActions, ResourceHistory};
use crate::components::social::{InterpersonalGoals, RelationshipLedger};
use crate::economy::EconomyRules;
use crate::systems::bias::{BiasMap, RecommendedTargets};

/// Snapshots considered for trend display
pub const TREND_WINDOW: usize = 3;
/// Relationships below this absolute score are not worth mentioning
pub const MEANINGFUL_SCORE: i32 = 5;
pub const ALLY_SCORE: i32 = 10;
pub const RIVAL_SCORE: i32 = -10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Ally,
    Rival,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipSummary {
    pub name: String,
    pub score: i32,
    pub trust: i32,
    pub resentment: i32,
    pub standing: Standing,
}

/// Relationships with |score| >= 5, strongest first
pub fn summarize_relationships(ledger: &RelationshipLedger) -> Vec<RelationshipSummary> {
    let mut summaries: Vec<RelationshipSummary> = ledger
        .iter()
        .filter(|(_, r)| r.score().abs() >= MEANINGFUL_SCORE)
        .map(|(name, r)| {
            let score = r.score();
            let standing = if score > ALLY_SCORE {
                Standing::Ally
            } else if score < RIVAL_SCORE {
                Standing::Rival
            } else {
                Standing::Neutral
            };
            RelationshipSummary {
                name: name.clone(),
                score,
                trust: r.trust,
                resentment: r.resentment,
                standing,
            }
        })
        .collect();
    summaries.sort_by(|a, b| b.score.abs().cmp(&a.score.abs()).then(a.name.cmp(&b.name)));
    summaries
}

/// Whether one resource action is affordable right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordability {
    pub action_type: ActionType,
    pub resource: ResourceKind,
    pub cost: u32,
    pub held: u32,
    pub affordable: bool,
}

pub fn affordability_table(snapshot: &WorldSnapshot, rules: &EconomyRules) -> Vec<Affordability> {
    ActionType::resource_actions()
        .iter()
        .filter_map(|action_type| {
            let cost = rules.cost(*action_type)?;
            let held = snapshot.get(cost.spend);
            Some(Affordability {
                action_type: *action_type,
                resource: cost.spend,
                cost: cost.cost,
                held,
                affordable: held >= cost.cost,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStatus {
    /// Every step fell by more than 3
    Collapsing,
    Declining,
    /// Every step rose by more than 3
    RisingFast,
    Rising,
    Mixed,
}

impl TrendStatus {
    pub fn from_values(values: &[u32]) -> Self {
        let deltas: Vec<i64> = values
            .windows(2)
            .map(|w| w[1] as i64 - w[0] as i64)
            .collect();
        if deltas.iter().all(|d| *d < -3) {
            TrendStatus::Collapsing
        } else if deltas.iter().all(|d| *d < 0) {
            TrendStatus::Declining
        } else if deltas.iter().all(|d| *d > 3) {
            TrendStatus::RisingFast
        } else if deltas.iter().all(|d| *d > 0) {
            TrendStatus::Rising
        } else {
            TrendStatus::Mixed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrendStatus::Collapsing => "COLLAPSING",
            TrendStatus::Declining => "declining",
            TrendStatus::RisingFast => "rising fast",
            TrendStatus::Rising => "rising",
            TrendStatus::Mixed => "mixed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceTrend {
    pub resource: ResourceKind,
    /// Oldest first
    pub values: Vec<u32>,
    pub status: TrendStatus,
}

/// Trends for the decaying resources; empty until two snapshots exist
pub fn resource_trends(history: &ResourceHistory) -> Vec<ResourceTrend> {
    let recent = history.last(TREND_WINDOW);
    if recent.len() < 2 {
        return Vec::new();
    }
    EconomyRules::decaying_resources()
        .iter()
        .map(|resource| {
            let values: Vec<u32> = recent.iter().map(|s| s.get(*resource)).collect();
            ResourceTrend {
                resource: *resource,
                status: TrendStatus::from_values(&values),
                values,
            }
        })
        .collect()
}

pub fn repetition_warning(recent: &RecentActions) -> Option<String> {
    recent.repeated_three().map(|action_type| {
        format!(
            "You have chosen {} three times in a row. Avoid repeating it this turn unless absolutely necessary.",
            action_type
        )
    })
}

/// Input to one proposer call
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub agent: String,
    pub archetype: String,
    pub description: String,
    pub persona_goals: Vec<String>,
    pub world: WorldSnapshot,
    /// Every other agent
    pub valid_targets: Vec<String>,
    /// Social actions aimed at this agent earlier in the same turn
    pub targeted_by: Vec<TargetingEvent>,
    pub messages: Vec<String>,
    pub history: Vec<String>,
    pub relationships: Vec<RelationshipSummary>,
    pub affordability: Vec<Affordability>,
    pub trends: Vec<ResourceTrend>,
    pub repetition_warning: Option<String>,
    pub modifier: Option<CostModifier>,
    pub triggers: Vec<String>,
    #[serde(skip)]
    pub interpersonal_goals: InterpersonalGoals,
    pub last_action: Option<ActionType>,
    pub bias: BiasMap,
    pub top_actions: Vec<(ActionKind, f64)>,
    #[serde(skip)]
    pub recommended_targets: RecommendedTargets,
}

impl Observation {
    /// Bare observation with no derived context, useful for tests and replays
    pub fn new(agent: impl Into<String>, world: WorldSnapshot) -> Self {
        Self {
            agent: agent.into(),
            archetype: String::new(),
            description: String::new(),
            persona_goals: Vec::new(),
            world,
            valid_targets: Vec::new(),
            targeted_by: Vec::new(),
            messages: Vec::new(),
            history: Vec::new(),
            relationships: Vec::new(),
            affordability: Vec::new(),
            trends: Vec::new(),
            repetition_warning: None,
            modifier: None,
            triggers: Vec::new(),
            interpersonal_goals: InterpersonalGoals::default(),
            last_action: None,
            bias: BiasMap::new(),
            top_actions: Vec::new(),
            recommended_targets: RecommendedTargets::default(),
        }
    }

    pub fn can_afford(&self, action_type: ActionType) -> bool {
        self.affordability
            .iter()
            .find(|a| a.action_type == action_type)
            .map_or(!action_type.is_chargeable(), |a| a.affordable)
    }

    pub fn standing_of(&self, name: &str) -> Standing {
        self.relationships
            .iter()
            .find(|r| r.name == name)
            .map_or(Standing::Neutral, |r| r.standing)
    }
}
