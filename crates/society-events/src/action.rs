//! Action Types
//!
//! The executable action set and the wider social vocabulary that ledgers and
//! bias tables speak in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target string naming the shared world rather than an agent
pub const WORLD_TARGET: &str = "world";

/// One of the five pooled world resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Treasury,
    Food,
    Energy,
    Infrastructure,
    Morale,
}

impl ResourceKind {
    /// Returns all resource kinds in display order.
    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Treasury,
            ResourceKind::Food,
            ResourceKind::Energy,
            ResourceKind::Infrastructure,
            ResourceKind::Morale,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Treasury => "treasury",
            ResourceKind::Food => "food",
            ResourceKind::Energy => "energy",
            ResourceKind::Infrastructure => "infrastructure",
            ResourceKind::Morale => "morale",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad category of an executable action, used by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    /// Spends one world resource to grow another; targets the world
    Resource,
    /// Free political move aimed at another agent
    Social,
    /// Queues a message for another agent
    Message,
    /// Does nothing
    Pass,
}

/// Actions the world engine can actually execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ImproveFood,
    ImproveEnergy,
    ImproveInfrastructure,
    BoostMorale,
    GenerateTreasury,
    SupportAgent,
    OpposeAgent,
    SendMessage,
    Pass,
}

impl ActionType {
    /// Returns all executable action types.
    pub fn all() -> &'static [ActionType] {
        &[
            ActionType::ImproveFood,
            ActionType::ImproveEnergy,
            ActionType::ImproveInfrastructure,
            ActionType::BoostMorale,
            ActionType::GenerateTreasury,
            ActionType::SupportAgent,
            ActionType::OpposeAgent,
            ActionType::SendMessage,
            ActionType::Pass,
        ]
    }

    /// Returns the five resource projects.
    pub fn resource_actions() -> &'static [ActionType] {
        &[
            ActionType::ImproveFood,
            ActionType::ImproveEnergy,
            ActionType::ImproveInfrastructure,
            ActionType::BoostMorale,
            ActionType::GenerateTreasury,
        ]
    }

    pub fn category(&self) -> ActionCategory {
        match self {
            ActionType::ImproveFood
            | ActionType::ImproveEnergy
            | ActionType::ImproveInfrastructure
            | ActionType::BoostMorale
            | ActionType::GenerateTreasury => ActionCategory::Resource,
            ActionType::SupportAgent | ActionType::OpposeAgent => ActionCategory::Social,
            ActionType::SendMessage => ActionCategory::Message,
            ActionType::Pass => ActionCategory::Pass,
        }
    }

    /// Whether this action spends a world resource
    pub fn is_chargeable(&self) -> bool {
        self.category() == ActionCategory::Resource
    }

    /// Whether this action must name another agent as its target
    pub fn targets_agent(&self) -> bool {
        matches!(
            self.category(),
            ActionCategory::Social | ActionCategory::Message
        )
    }

    pub fn as_str(&self) -> &'static str {
        ActionKind::from(*self).as_str()
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical social vocabulary.
///
/// A superset of [`ActionType`]: the extra kinds describe interactions the
/// relationship and emotion tables know how to weigh and that the bias
/// composer can recommend, even though the world engine only executes the
/// nine [`ActionType`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ImproveFood,
    ImproveEnergy,
    ImproveInfrastructure,
    BoostMorale,
    GenerateTreasury,
    SupportAgent,
    OpposeAgent,
    SendMessage,
    Pass,
    Negotiate,
    RequestHelp,
    Trade,
    Sabotage,
    FormAlliance,
    DenounceAgent,
    OfferConcession,
    DemandConcession,
    AccuseAgent,
    OfferProtection,
    SpreadRumor,
    ProposePolicy,
    ConsumeResource,
}

impl ActionKind {
    /// Returns every kind in declaration order.
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::ImproveFood,
            ActionKind::ImproveEnergy,
            ActionKind::ImproveInfrastructure,
            ActionKind::BoostMorale,
            ActionKind::GenerateTreasury,
            ActionKind::SupportAgent,
            ActionKind::OpposeAgent,
            ActionKind::SendMessage,
            ActionKind::Pass,
            ActionKind::Negotiate,
            ActionKind::RequestHelp,
            ActionKind::Trade,
            ActionKind::Sabotage,
            ActionKind::FormAlliance,
            ActionKind::DenounceAgent,
            ActionKind::OfferConcession,
            ActionKind::DemandConcession,
            ActionKind::AccuseAgent,
            ActionKind::OfferProtection,
            ActionKind::SpreadRumor,
            ActionKind::ProposePolicy,
            ActionKind::ConsumeResource,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ImproveFood => "improve_food",
            ActionKind::ImproveEnergy => "improve_energy",
            ActionKind::ImproveInfrastructure => "improve_infrastructure",
            ActionKind::BoostMorale => "boost_morale",
            ActionKind::GenerateTreasury => "generate_treasury",
            ActionKind::SupportAgent => "support_agent",
            ActionKind::OpposeAgent => "oppose_agent",
            ActionKind::SendMessage => "send_message",
            ActionKind::Pass => "pass",
            ActionKind::Negotiate => "negotiate",
            ActionKind::RequestHelp => "request_help",
            ActionKind::Trade => "trade",
            ActionKind::Sabotage => "sabotage",
            ActionKind::FormAlliance => "form_alliance",
            ActionKind::DenounceAgent => "denounce_agent",
            ActionKind::OfferConcession => "offer_concession",
            ActionKind::DemandConcession => "demand_concession",
            ActionKind::AccuseAgent => "accuse_agent",
            ActionKind::OfferProtection => "offer_protection",
            ActionKind::SpreadRumor => "spread_rumor",
            ActionKind::ProposePolicy => "propose_policy",
            ActionKind::ConsumeResource => "consume_resource",
        }
    }

    /// The executable action this kind corresponds to, if any
    pub fn executable(&self) -> Option<ActionType> {
        ActionType::all()
            .iter()
            .copied()
            .find(|action_type| ActionKind::from(*action_type) == *self)
    }

    /// Resource projects (the five chargeable world actions)
    pub fn is_resource(&self) -> bool {
        self.executable()
            .map_or(false, |action_type| action_type.is_chargeable())
    }
}

impl From<ActionType> for ActionKind {
    fn from(action_type: ActionType) -> Self {
        match action_type {
            ActionType::ImproveFood => ActionKind::ImproveFood,
            ActionType::ImproveEnergy => ActionKind::ImproveEnergy,
            ActionType::ImproveInfrastructure => ActionKind::ImproveInfrastructure,
            ActionType::BoostMorale => ActionKind::BoostMorale,
            ActionType::GenerateTreasury => ActionKind::GenerateTreasury,
            ActionType::SupportAgent => ActionKind::SupportAgent,
            ActionType::OpposeAgent => ActionKind::OpposeAgent,
            ActionType::SendMessage => ActionKind::SendMessage,
            ActionType::Pass => ActionKind::Pass,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a known action kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError(pub String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown action kind: {}", self.0)
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for ActionKind {
    type Err = ParseActionError;

    /// Case-insensitive; spaces and dashes are read as underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        ActionKind::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

impl FromStr for ActionType {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<ActionKind>()?
            .executable()
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// An action proposed for one agent's turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,
    /// Agent name, or [`WORLD_TARGET`] for resource actions
    pub target: String,
    /// Message body, only meaningful for `send_message`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Diagnostic explanation; never validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Action {
    pub fn new(action_type: ActionType, target: impl Into<String>) -> Self {
        Self {
            action_type,
            target: target.into(),
            content: None,
            reason: None,
        }
    }

    /// Create a resource action aimed at the world
    pub fn resource(action_type: ActionType) -> Self {
        Self::new(action_type, WORLD_TARGET)
    }

    pub fn support(target: impl Into<String>) -> Self {
        Self::new(ActionType::SupportAgent, target)
    }

    pub fn oppose(target: impl Into<String>) -> Self {
        Self::new(ActionType::OpposeAgent, target)
    }

    pub fn message(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(ActionType::SendMessage, target).with_content(content)
    }

    pub fn pass() -> Self {
        Self::new(ActionType::Pass, WORLD_TARGET)
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.action_type.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ActionKind::ImproveInfrastructure).unwrap(),
            r#""improve_infrastructure""#
        );
        assert_eq!(
            serde_json::to_string(&ActionType::SendMessage).unwrap(),
            r#""send_message""#
        );
        assert_eq!(
            serde_json::from_str::<ActionKind>(r#""form_alliance""#).unwrap(),
            ActionKind::FormAlliance
        );
    }

    #[test]
    fn test_as_str_matches_serde_name() {
        for kind in ActionKind::all() {
            let json = serde_json::to_string(kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!("Support Agent".parse::<ActionKind>(), Ok(ActionKind::SupportAgent));
        assert_eq!(" boost-morale ".parse::<ActionKind>(), Ok(ActionKind::BoostMorale));
        assert_eq!("PASS".parse::<ActionType>(), Ok(ActionType::Pass));
        assert!("dance".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_non_executable_kind_does_not_parse_as_type() {
        assert!("sabotage".parse::<ActionKind>().is_ok());
        assert!("sabotage".parse::<ActionType>().is_err());
    }

    #[test]
    fn test_every_type_maps_back() {
        for action_type in ActionType::all() {
            let kind = ActionKind::from(*action_type);
            assert_eq!(kind.executable(), Some(*action_type));
        }
        assert_eq!(ActionKind::Negotiate.executable(), None);
    }

    #[test]
    fn test_categories() {
        assert!(ActionType::GenerateTreasury.is_chargeable());
        assert!(ActionType::OpposeAgent.targets_agent());
        assert!(ActionType::SendMessage.targets_agent());
        assert!(!ActionType::Pass.targets_agent());
        assert!(!ActionType::Pass.is_chargeable());
        assert!(ActionKind::BoostMorale.is_resource());
        assert!(!ActionKind::Trade.is_resource());
        assert_eq!(ActionType::resource_actions().len(), 5);
    }

    #[test]
    fn test_action_constructors() {
        let action = Action::message("Eldric", "Let's cooperate").with_reason("test");
        assert_eq!(action.action_type, ActionType::SendMessage);
        assert_eq!(action.target, "Eldric");
        assert_eq!(action.content.as_deref(), Some("Let's cooperate"));
        assert_eq!(action.kind(), ActionKind::SendMessage);

        let action = Action::resource(ActionType::ImproveFood);
        assert_eq!(action.target, WORLD_TARGET);
        assert!(action.content.is_none());
    }
}
