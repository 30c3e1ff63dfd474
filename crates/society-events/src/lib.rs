//! Shared action, event, and snapshot types for the society simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod action;
pub mod event;
pub mod snapshot;

// Re-export action types
pub use action::{
    Action, ActionCategory, ActionKind, ActionType, ParseActionError, ResourceKind, WORLD_TARGET,
};

// Re-export event types
pub use event::{
    generate_event_id, HaltReason, Message, SimulationSummary, TargetingEvent, TerminalReason,
    TurnEvent,
};

// Re-export snapshot types
pub use snapshot::{CostModifier, WorldSnapshot};
