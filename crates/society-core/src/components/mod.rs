//! ECS Components
//!
//! Agent identity and memory, private social ledgers, and the world state.

pub mod agent;
pub mod social;
pub mod world;

pub use agent::*;
pub use social::*;
pub use world::*;
