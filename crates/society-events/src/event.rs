//! Event Types
//!
//! Per-turn records emitted by the turn controller: action outcomes,
//! messages, same-turn targeting notices, and halt reasons.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::action::{ActionType, WORLD_TARGET};
use crate::snapshot::WorldSnapshot;

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}

/// A message waiting in the world queue for next-turn delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    pub content: String,
    /// Turn the message was sent on
    pub turn: u64,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
        turn: u64,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            turn,
        }
    }
}

/// One action attempt and its human-readable outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub event_id: String,
    pub turn: u64,
    pub actor: String,
    pub action_type: ActionType,
    /// Resolved agent name, or "world"
    pub target: String,
    pub outcome: String,
    pub success: bool,
}

impl TurnEvent {
    pub fn succeeded(
        event_id: impl Into<String>,
        turn: u64,
        actor: impl Into<String>,
        action_type: ActionType,
        target: impl Into<String>,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            turn,
            actor: actor.into(),
            action_type,
            target: target.into(),
            outcome: outcome.into(),
            success: true,
        }
    }

    pub fn failed(
        event_id: impl Into<String>,
        turn: u64,
        actor: impl Into<String>,
        action_type: ActionType,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            turn,
            actor: actor.into(),
            action_type,
            target: target.into(),
            outcome: reason.into(),
            success: false,
        }
    }

    /// Whether this event names an agent rather than the world
    pub fn targets_agent(&self) -> bool {
        self.target != WORLD_TARGET
    }

    /// Line used in the per-turn history fed back to proposers
    pub fn history_line(&self) -> String {
        if self.success {
            format!("Turn {}: {}", self.turn + 1, self.outcome)
        } else {
            format!(
                "Turn {}: {} tried {} but failed: {}",
                self.turn + 1,
                self.actor,
                self.action_type,
                self.outcome
            )
        }
    }

    /// Serializes the event to a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes an event from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// A social action aimed at an agent earlier in the same turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetingEvent {
    pub actor: String,
    pub action_type: ActionType,
    pub target: String,
}

impl TargetingEvent {
    /// Line shown to the targeted agent before it decides
    pub fn describe(&self) -> String {
        match self.action_type {
            ActionType::SupportAgent => format!(
                "{} supported you: your next resource action yields 50% more",
                self.actor
            ),
            ActionType::OpposeAgent => format!(
                "{} opposed you: your next resource action yields 50% less",
                self.actor
            ),
            ActionType::SendMessage => {
                format!("{} sent you a message (arrives next turn)", self.actor)
            }
            other => format!("{} used {} on you", self.actor, other),
        }
    }
}

/// Unrecoverable world conditions, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    /// food <= 0
    Starvation,
    /// energy <= 0
    EnergyCollapse,
    /// treasury <= 0 and infrastructure < 20
    EconomicCollapse,
    /// morale <= 5
    Revolt,
}

impl fmt::Display for TerminalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TerminalReason::Starvation => "GAME OVER: food supplies exhausted, the society starved",
            TerminalReason::EnergyCollapse => "GAME OVER: energy exhausted, the society went dark",
            TerminalReason::EconomicCollapse => {
                "GAME OVER: treasury empty and infrastructure crumbling, the economy collapsed"
            }
            TerminalReason::Revolt => "GAME OVER: morale collapsed, the people revolted",
        };
        f.write_str(text)
    }
}

/// Why a simulation run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum HaltReason {
    MaxTurns,
    /// Every agent passed for two consecutive turns
    AllPassed,
    Terminal(TerminalReason),
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::MaxTurns => write!(f, "reached the turn limit"),
            HaltReason::AllPassed => write!(f, "all agents passed for two consecutive turns"),
            HaltReason::Terminal(reason) => write!(f, "{}", reason),
        }
    }
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub turns_played: u64,
    pub halt_reason: HaltReason,
    pub final_state: WorldSnapshot,
    pub total_events: usize,
    pub failed_actions: usize,
}
