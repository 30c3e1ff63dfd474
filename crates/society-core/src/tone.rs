//! Message Tone
//!
//! Classifies the tone of agent-to-agent messages. The relationship engine
//! only sees the resulting [`Tone`], so the classifier is swappable.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Friendly,
    Hostile,
    Neutral,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Friendly => "friendly",
            Tone::Hostile => "hostile",
            Tone::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

pub trait ToneClassifier {
    fn classify(&self, text: &str) -> Tone;
}

/// Keyword lists used by [`KeywordToneClassifier::default`]
pub mod keywords {
    pub const HOSTILE: &[&str] = &[
        "betray", "enemy", "attack", "destroy", "fool", "liar", "hate", "stupid", "useless",
        "weak", "threat", "demand", "or else", "crush", "disaster", "hoard", "greed",
        "suffering", "oppress",
    ];

    pub const FRIENDLY: &[&str] = &[
        "friend", "help", "support", "thanks", "thank you", "appreciate", "good", "great",
        "ally", "together", "cooperate", "peace", "love", "please", "kind",
    ];

    /// Messages longer than this are checked for shouting
    pub const SHOUT_MIN_LEN: usize = 5;
    /// Uppercase share above which a message counts as shouting
    pub const SHOUT_RATIO: f64 = 0.5;
}

/// Substring keyword matcher. Shouting and hostile words beat friendly words.
#[derive(Debug, Clone)]
pub struct KeywordToneClassifier {
    hostile: Vec<String>,
    friendly: Vec<String>,
}

impl KeywordToneClassifier {
    pub fn new(hostile: &[&str], friendly: &[&str]) -> Self {
        Self {
            hostile: hostile.iter().map(|w| w.to_lowercase()).collect(),
            friendly: friendly.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    fn is_shouting(text: &str) -> bool {
        let len = text.chars().count();
        if len <= keywords::SHOUT_MIN_LEN {
            return false;
        }
        let upper = text.chars().filter(|c| c.is_uppercase()).count();
        upper as f64 / len as f64 > keywords::SHOUT_RATIO
    }
}

impl Default for KeywordToneClassifier {
    fn default() -> Self {
        Self::new(keywords::HOSTILE, keywords::FRIENDLY)
    }
}

impl ToneClassifier for KeywordToneClassifier {
    fn classify(&self, text: &str) -> Tone {
        if Self::is_shouting(text) {
            return Tone::Hostile;
        }
        let lower = text.to_lowercase();
        if self.hostile.iter().any(|w| lower.contains(w.as_str())) {
            Tone::Hostile
        } else if self.friendly.iter().any(|w| lower.contains(w.as_str())) {
            Tone::Friendly
        } else {
            Tone::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_friendly_message() {
        let classifier = KeywordToneClassifier::default();
        assert_eq!(classifier.classify("Thank you for the help, friend"), Tone::Friendly);
        assert_eq!(classifier.classify("Let's cooperate"), Tone::Friendly);
    }

    #[test]
    fn test_hostile_beats_friendly() {
        let classifier = KeywordToneClassifier::default();
        assert_eq!(
            classifier.classify("Help me or else you will regret it"),
            Tone::Hostile
        );
        assert_eq!(classifier.classify("You are a liar"), Tone::Hostile);
    }

    #[test]
    fn test_shouting_is_hostile() {
        let classifier = KeywordToneClassifier::default();
        assert_eq!(classifier.classify("GIVE US FOOD NOW"), Tone::Hostile);
        // too short to count as shouting
        assert_eq!(classifier.classify("OK"), Tone::Neutral);
    }

    #[test]
    fn test_neutral_message() {
        let classifier = KeywordToneClassifier::default();
        assert_eq!(classifier.classify("The harvest is next week."), Tone::Neutral);
    }
}
