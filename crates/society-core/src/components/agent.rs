//! Agent Components
//!
//! Identity, persona, and the rolling per-agent memory the turn controller
//! feeds back into each decision.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use society_events::{ActionKind, ActionType, Message, WorldSnapshot};
use std::collections::VecDeque;

use super::social::{EmotionLedger, InterpersonalGoals, RelationshipLedger};

/// Recent actions remembered for repetition detection
pub const RECENT_ACTIONS_LIMIT: usize = 5;
/// Resource snapshots kept for trend display
pub const RESOURCE_HISTORY_LIMIT: usize = 4;

/// Human-readable name for an agent; unique within a simulation
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentName(pub String);

/// Agent persona, fixed at creation
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Persona {
    /// Free-text archetype, e.g. "Guardian of the Realm"
    pub archetype: String,
    pub description: String,
    /// Long-term goals shown in the prompt
    pub goals: Vec<String>,
    /// Drives the gain-influence goal
    pub ambition: f64,
}

/// Position in the strictly sequential per-turn decision order
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TurnOrder(pub usize);

/// Component: the last few actions this agent chose, oldest first
#[derive(Component, Debug, Clone, Default)]
pub struct RecentActions {
    actions: VecDeque<ActionType>,
}

impl RecentActions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action_type: ActionType) {
        self.actions.push_back(action_type);
        while self.actions.len() > RECENT_ACTIONS_LIMIT {
            self.actions.pop_front();
        }
    }

    pub fn last(&self) -> Option<ActionType> {
        self.actions.back().copied()
    }

    /// As canonical kinds, oldest first
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(|a| ActionKind::from(*a)).collect()
    }

    /// The action repeated for the last three choices, if any
    pub fn repeated_three(&self) -> Option<ActionType> {
        if self.actions.len() < 3 {
            return None;
        }
        let last = self.last()?;
        self.actions
            .iter()
            .rev()
            .take(3)
            .all(|a| *a == last)
            .then_some(last)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Component: messages delivered at the start of this turn
#[derive(Component, Debug, Clone, Default)]
pub struct Inbox {
    pub messages: Vec<Message>,
}

impl Inbox {
    pub fn deliver(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Prompt lines for the delivered messages, clearing the inbox
    pub fn read_all(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
            .into_iter()
            .map(|m| format!("From {}: \"{}\"", m.sender, m.content))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Component: summaries of the most recent turns, oldest first
#[derive(Component, Debug, Clone, Default)]
pub struct TurnHistory {
    entries: VecDeque<String>,
}

impl TurnHistory {
    pub fn push(&mut self, summary: impl Into<String>, depth: usize) {
        self.entries.push_back(summary.into());
        while self.entries.len() > depth {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

/// Component: world snapshots observed at the end of recent turns
#[derive(Component, Debug, Clone, Default)]
pub struct ResourceHistory {
    snapshots: VecDeque<WorldSnapshot>,
}

impl ResourceHistory {
    pub fn record(&mut self, snapshot: WorldSnapshot) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > RESOURCE_HISTORY_LIMIT {
            self.snapshots.pop_front();
        }
    }

    /// Up to the last `n` snapshots, oldest first
    pub fn last(&self, n: usize) -> Vec<&WorldSnapshot> {
        let skip = self.snapshots.len().saturating_sub(n);
        self.snapshots.iter().skip(skip).collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Bundle for spawning a complete agent
#[derive(Bundle)]
pub struct AgentBundle {
    pub name: AgentName,
    pub persona: Persona,
    pub order: TurnOrder,
    pub relationships: RelationshipLedger,
    pub emotions: EmotionLedger,
    pub goals: InterpersonalGoals,
    pub recent_actions: RecentActions,
    pub inbox: Inbox,
    pub history: TurnHistory,
    pub resource_history: ResourceHistory,
}

impl AgentBundle {
    pub fn new(name: impl Into<String>, persona: Persona, order: usize) -> Self {
        Self {
            name: AgentName(name.into()),
            persona,
            order: TurnOrder(order),
            relationships: RelationshipLedger::new(),
            emotions: EmotionLedger::new(),
            goals: InterpersonalGoals::new(),
            recent_actions: RecentActions::new(),
            inbox: Inbox::default(),
            history: TurnHistory::default(),
            resource_history: ResourceHistory::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_actions_capped() {
        let mut recent = RecentActions::new();
        for _ in 0..7 {
            recent.push(ActionType::Pass);
        }
        assert_eq!(recent.len(), RECENT_ACTIONS_LIMIT);
    }

    #[test]
    fn test_repeated_three() {
        let mut recent = RecentActions::new();
        recent.push(ActionType::ImproveFood);
        recent.push(ActionType::SendMessage);
        recent.push(ActionType::SendMessage);
        assert_eq!(recent.repeated_three(), None);

        recent.push(ActionType::SendMessage);
        assert_eq!(recent.repeated_three(), Some(ActionType::SendMessage));
        assert_eq!(recent.kinds().last(), Some(&ActionKind::SendMessage));
    }

    #[test]
    fn test_inbox_read_clears() {
        let mut inbox = Inbox::default();
        inbox.deliver(Message::new("Mara", "Eldric", "hello", 0));

        let lines = inbox.read_all();
        assert_eq!(lines, vec!["From Mara: \"hello\"".to_string()]);
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_turn_history_depth() {
        let mut history = TurnHistory::default();
        history.push("one", 2);
        history.push("two", 2);
        history.push("three", 2);
        assert_eq!(history.entries(), vec!["two".to_string(), "three".to_string()]);
    }
}
