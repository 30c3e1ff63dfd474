//! Social Components
//!
//! Per-agent private ledgers: relationships, emotions, and interpersonal goals.
//! Each ledger is keyed by the counterpart's name and only ever mutated by the
//! owning agent's broadcast step.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Bounds shared by relationship and emotion scalars
pub mod bounds {
    pub const RELATIONSHIP_MIN: i32 = -50;
    pub const RELATIONSHIP_MAX: i32 = 50;
    pub const EMOTION_MIN: f64 = -50.0;
    pub const EMOTION_MAX: f64 = 50.0;
    /// Diagnostic history entries kept per relationship
    pub const HISTORY_LIMIT: usize = 10;
}

/// One observer's view of one subject
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub trust: i32,
    pub resentment: i32,
    #[serde(default)]
    pub history: VecDeque<String>,
}

impl Relationship {
    pub fn new(trust: i32, resentment: i32) -> Self {
        let mut relationship = Self::default();
        relationship.shift(trust, resentment);
        relationship
    }

    /// Overall standing, always recomputed from trust and resentment
    pub fn score(&self) -> i32 {
        self.trust - self.resentment
    }

    /// Add deltas with clamping
    pub fn shift(&mut self, trust_delta: i32, resentment_delta: i32) {
        self.trust = (self.trust + trust_delta)
            .clamp(bounds::RELATIONSHIP_MIN, bounds::RELATIONSHIP_MAX);
        self.resentment = (self.resentment + resentment_delta)
            .clamp(bounds::RELATIONSHIP_MIN, bounds::RELATIONSHIP_MAX);
    }

    /// Append a history entry, trimming the oldest beyond the limit
    pub fn record(&mut self, entry: impl Into<String>) {
        self.history.push_back(entry.into());
        while self.history.len() > bounds::HISTORY_LIMIT {
            self.history.pop_front();
        }
    }
}

/// Component: an agent's relationships toward every other agent it has observed
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipLedger {
    relationships: BTreeMap<String, Relationship>,
}

impl RelationshipLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject: &str) -> Option<&Relationship> {
        self.relationships.get(subject)
    }

    /// Get or create the relationship toward a subject
    pub fn entry(&mut self, subject: &str) -> &mut Relationship {
        self.relationships.entry(subject.to_string()).or_default()
    }

    /// Score toward a subject, 0 when unknown
    pub fn score_of(&self, subject: &str) -> i32 {
        self.get(subject).map_or(0, Relationship::score)
    }

    /// Mean score across all known subjects, 0.0 when empty
    pub fn average_score(&self) -> f64 {
        if self.relationships.is_empty() {
            return 0.0;
        }
        let total: i32 = self.relationships.values().map(Relationship::score).sum();
        total as f64 / self.relationships.len() as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Relationship)> {
        self.relationships.iter()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}

/// Six-dimensional feeling toward one counterpart.
/// Every field is kept within `[-50, 50]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionVector {
    pub trust: f64,
    pub resentment: f64,
    pub admiration: f64,
    pub fear: f64,
    pub ambition: f64,
    pub insecurity: f64,
}

impl EmotionVector {
    /// Clamp every dimension independently
    pub fn clamp(&mut self) {
        for value in [
            &mut self.trust,
            &mut self.resentment,
            &mut self.admiration,
            &mut self.fear,
            &mut self.ambition,
            &mut self.insecurity,
        ] {
            *value = value.clamp(bounds::EMOTION_MIN, bounds::EMOTION_MAX);
        }
    }
}

/// Component: an agent's emotions toward other agents
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmotionLedger {
    emotions: BTreeMap<String, EmotionVector>,
}

impl EmotionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject: &str) -> Option<&EmotionVector> {
        self.emotions.get(subject)
    }

    pub fn entry(&mut self, subject: &str) -> &mut EmotionVector {
        self.emotions.entry(subject.to_string()).or_default()
    }

    /// Counterparts in lexical order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &EmotionVector)> {
        self.emotions.iter()
    }

    pub fn len(&self) -> usize {
        self.emotions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emotions.is_empty()
    }
}

/// The four interpersonal goal slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSlot {
    AllyWith,
    Undermine,
    SeekApprovalFrom,
    GainInfluenceOver,
}

impl GoalSlot {
    pub fn all() -> &'static [GoalSlot] {
        &[
            GoalSlot::AllyWith,
            GoalSlot::Undermine,
            GoalSlot::SeekApprovalFrom,
            GoalSlot::GainInfluenceOver,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalSlot::AllyWith => "ally_with",
            GoalSlot::Undermine => "undermine",
            GoalSlot::SeekApprovalFrom => "seek_approval_from",
            GoalSlot::GainInfluenceOver => "gain_influence_over",
        }
    }
}

/// Component: at most one counterpart per goal slot
#[derive(Component, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpersonalGoals {
    pub ally_with: Option<String>,
    pub undermine: Option<String>,
    pub seek_approval_from: Option<String>,
    pub gain_influence_over: Option<String>,
}

impl InterpersonalGoals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: GoalSlot) -> Option<&str> {
        self.slot_ref(slot).as_deref()
    }

    pub fn set(&mut self, slot: GoalSlot, counterpart: impl Into<String>) {
        *self.slot_mut(slot) = Some(counterpart.into());
    }

    /// Clear a slot only if it currently names `counterpart`
    pub fn clear_if(&mut self, slot: GoalSlot, counterpart: &str) -> bool {
        let current = self.slot_mut(slot);
        if current.as_deref() == Some(counterpart) {
            *current = None;
            true
        } else {
            false
        }
    }

    /// Slots currently holding a counterpart
    pub fn active(&self) -> impl Iterator<Item = (GoalSlot, &str)> {
        GoalSlot::all()
            .iter()
            .filter_map(move |slot| self.get(*slot).map(|name| (*slot, name)))
    }

    fn slot_ref(&self, slot: GoalSlot) -> &Option<String> {
        match slot {
            GoalSlot::AllyWith => &self.ally_with,
            GoalSlot::Undermine => &self.undermine,
            GoalSlot::SeekApprovalFrom => &self.seek_approval_from,
            GoalSlot::GainInfluenceOver => &self.gain_influence_over,
        }
    }

    fn slot_mut(&mut self, slot: GoalSlot) -> &mut Option<String> {
        match slot {
            GoalSlot::AllyWith => &mut self.ally_with,
            GoalSlot::Undermine => &mut self.undermine,
            GoalSlot::SeekApprovalFrom => &mut self.seek_approval_from,
            GoalSlot::GainInfluenceOver => &mut self.gain_influence_over,
        }
    }
}
