//! Systems
//!
//! Social dynamics rules and the end-of-turn ECS systems.

pub mod bias;
pub mod emotion;
pub mod goals;
pub mod history;
pub mod relationship;
pub mod triggers;

pub use bias::{compose, get_recommended_targets, get_top_actions, BiasMap, RecommendedTargets};
pub use emotion::{emotional_bias, EmotionDelta, EmotionRules};
pub use goals::{evaluate_goals, update_interpersonal_goals, GoalChange, GoalThresholds};
pub use history::record_resource_history;
pub use relationship::{RelationshipDelta, RelationshipRules};
pub use triggers::compute_triggers;
