//! Turn economy and social dynamics engine.
//!
//! Agents take turns spending shared resources and acting on each other; each
//! agent keeps private relationship, emotion, and goal state that shapes the
//! bias fed to its next decision.

pub mod components;
pub mod config;
pub mod controller;
pub mod economy;
pub mod events;
pub mod proposer;
pub mod systems;
pub mod tone;

pub use components::*;
pub use config::{ConfigError, SimulationConfig};
pub use controller::{SimulationError, TurnController};
pub use economy::{ActionOutcome, EconomyRules, Rejection, WorldEngine};
pub use events::EventLogger;
pub use proposer::{
    parse_proposal, ActionProposer, ProposerError, RetryingProposer, ScriptedProposer,
    WeightedProposer,
};
pub use tone::{KeywordToneClassifier, Tone, ToneClassifier};
