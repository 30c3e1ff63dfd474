//! Action rejections. Every variant is non-fatal and leaves the world untouched.

use society_events::{ActionType, ResourceKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed target '{target}'")]
    MalformedTarget { target: String },

    #[error("{action_type} must target {expected}, not '{target}'")]
    WrongCategory {
        action_type: ActionType,
        target: String,
        expected: &'static str,
    },

    #[error("no agent named '{target}'")]
    UnknownTarget { target: String },

    #[error("cannot use {action_type} on yourself")]
    SelfTarget { action_type: ActionType },

    #[error("message to {target} has no content")]
    MissingContent { target: String },

    #[error("insufficient {resource}: needs {needed}, has {held}")]
    InsufficientResource {
        resource: ResourceKind,
        needed: u32,
        held: u32,
    },
}

impl Rejection {
    /// Whether the action was well-formed but unaffordable
    pub fn is_affordability(&self) -> bool {
        matches!(self, Rejection::InsufficientResource { .. })
    }
}
