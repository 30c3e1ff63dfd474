//! Relationship Updates
//!
//! Fixed trust/resentment deltas keyed by canonical action kind, plus a
//! smaller table for received message tones.

use serde::{Deserialize, Serialize};
use society_events::ActionKind;
use std::collections::BTreeMap;

use crate::components::social::Relationship;
use crate::tone::Tone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDelta {
    pub trust: i32,
    pub resentment: i32,
}

impl RelationshipDelta {
    pub const fn new(trust: i32, resentment: i32) -> Self {
        Self { trust, resentment }
    }
}

/// Delta tables, injected rather than global so tests can override them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRules {
    pub action_deltas: BTreeMap<ActionKind, RelationshipDelta>,
    pub tone_deltas: BTreeMap<Tone, RelationshipDelta>,
}

impl Default for RelationshipRules {
    fn default() -> Self {
        use ActionKind::*;
        let action_deltas = [
            (SupportAgent, RelationshipDelta::new(10, -5)),
            (OpposeAgent, RelationshipDelta::new(-10, 10)),
            (Negotiate, RelationshipDelta::new(5, 0)),
            (RequestHelp, RelationshipDelta::new(10, 0)),
            (Trade, RelationshipDelta::new(7, -3)),
            (Sabotage, RelationshipDelta::new(-25, 20)),
            (FormAlliance, RelationshipDelta::new(15, -5)),
            (DenounceAgent, RelationshipDelta::new(-15, 15)),
            (OfferConcession, RelationshipDelta::new(8, -5)),
            (DemandConcession, RelationshipDelta::new(-5, 8)),
            (AccuseAgent, RelationshipDelta::new(-10, 10)),
            (OfferProtection, RelationshipDelta::new(12, -2)),
            (SpreadRumor, RelationshipDelta::new(-8, 8)),
            (ProposePolicy, RelationshipDelta::new(2, 0)),
            (SendMessage, RelationshipDelta::new(1, 0)),
        ]
        .into_iter()
        .collect();

        let tone_deltas = [
            (Tone::Neutral, RelationshipDelta::new(1, 0)),
            (Tone::Friendly, RelationshipDelta::new(3, -1)),
            (Tone::Hostile, RelationshipDelta::new(-3, 3)),
        ]
        .into_iter()
        .collect();

        Self {
            action_deltas,
            tone_deltas,
        }
    }
}

impl RelationshipRules {
    /// Apply an observed action. Kinds without a table entry change nothing.
    /// Returns whether the relationship changed.
    pub fn apply(
        &self,
        relationship: &mut Relationship,
        kind: ActionKind,
        description: Option<&str>,
    ) -> bool {
        let Some(delta) = self.action_deltas.get(&kind) else {
            return false;
        };
        relationship.shift(delta.trust, delta.resentment);
        if let Some(description) = description {
            relationship.record(description);
        }
        true
    }

    /// Apply a received message of the given tone
    pub fn apply_message(&self, relationship: &mut Relationship, tone: Tone, text: Option<&str>) {
        let delta = self
            .tone_deltas
            .get(&tone)
            .copied()
            .unwrap_or(RelationshipDelta::new(0, 0));
        relationship.shift(delta.trust, delta.resentment);
        let entry = match text {
            Some(text) => format!("Received {} message: '{}'", tone, text),
            None => format!("Received {} message", tone),
        };
        relationship.record(entry);
    }
}
