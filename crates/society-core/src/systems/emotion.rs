//! Emotion Updates
//!
//! Per-counterpart emotion deltas and the additive emotional bias terms the
//! decision bias composer consumes.

use society_events::ActionKind;
use std::collections::BTreeMap;

use crate::components::social::EmotionVector;

/// Deltas for trust, resentment, admiration, and fear
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionDelta {
    pub trust: f64,
    pub resentment: f64,
    pub admiration: f64,
    pub fear: f64,
    /// Apply even when the observer was not the target
    pub applies_to_bystanders: bool,
}

impl EmotionDelta {
    pub const fn targeted(trust: f64, resentment: f64, admiration: f64, fear: f64) -> Self {
        Self {
            trust,
            resentment,
            admiration,
            fear,
            applies_to_bystanders: false,
        }
    }

    pub const fn general(trust: f64, resentment: f64, admiration: f64, fear: f64) -> Self {
        Self {
            trust,
            resentment,
            admiration,
            fear,
            applies_to_bystanders: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmotionRules {
    pub deltas: BTreeMap<ActionKind, EmotionDelta>,
}

impl Default for EmotionRules {
    fn default() -> Self {
        use ActionKind::*;
        let deltas = [
            (SupportAgent, EmotionDelta::targeted(5.0, -2.0, 1.0, 0.0)),
            (OpposeAgent, EmotionDelta::targeted(-5.0, 5.0, 0.0, 1.0)),
            (Sabotage, EmotionDelta::targeted(-10.0, 15.0, 0.0, 5.0)),
            (Negotiate, EmotionDelta::targeted(2.0, 0.0, 1.0, 0.0)),
            (DenounceAgent, EmotionDelta::targeted(-5.0, 8.0, 0.0, 0.0)),
            (FormAlliance, EmotionDelta::targeted(10.0, 0.0, 2.0, 0.0)),
            (OfferConcession, EmotionDelta::targeted(5.0, -5.0, 0.0, 0.0)),
            (DemandConcession, EmotionDelta::targeted(0.0, 5.0, 0.0, 2.0)),
            (AccuseAgent, EmotionDelta::targeted(-3.0, 6.0, 0.0, 0.0)),
            (OfferProtection, EmotionDelta::targeted(8.0, 0.0, 3.0, 0.0)),
            (SpreadRumor, EmotionDelta::targeted(-4.0, 4.0, 0.0, 0.0)),
            (ConsumeResource, EmotionDelta::general(0.0, 1.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();
        Self { deltas }
    }
}

impl EmotionRules {
    /// Update `emotions` after observing `kind`. Returns whether anything changed.
    pub fn apply(&self, emotions: &mut EmotionVector, kind: ActionKind, is_target: bool) -> bool {
        let Some(delta) = self.deltas.get(&kind) else {
            return false;
        };
        if !is_target && !delta.applies_to_bystanders {
            return false;
        }
        emotions.trust += delta.trust;
        emotions.resentment += delta.resentment;
        emotions.admiration += delta.admiration;
        emotions.fear += delta.fear;
        emotions.clamp();
        true
    }
}

/// Additive bias terms derived from one emotion vector
pub fn emotional_bias(emotions: &EmotionVector) -> BTreeMap<ActionKind, f64> {
    use ActionKind::*;
    let EmotionVector {
        trust,
        resentment,
        admiration,
        fear,
        insecurity,
        ..
    } = *emotions;

    BTreeMap::from([
        (SupportAgent, (trust + admiration) / 100.0),
        (FormAlliance, (trust + admiration) / 80.0),
        (OfferProtection, (trust + admiration) / 90.0),
        (OfferConcession, (trust - resentment) / 100.0),
        (Negotiate, (trust + admiration - fear) / 100.0),
        (OpposeAgent, (resentment - trust) / 100.0),
        (Sabotage, (resentment - trust) / 80.0),
        (DenounceAgent, (resentment - trust) / 90.0),
        (AccuseAgent, (resentment - trust) / 90.0),
        (DemandConcession, (resentment + fear) / 100.0),
        (SpreadRumor, (resentment + insecurity) / 100.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_only_deltas() {
        let rules = EmotionRules::default();
        let mut emotions = EmotionVector::default();

        assert!(!rules.apply(&mut emotions, ActionKind::OpposeAgent, false));
        assert_eq!(emotions, EmotionVector::default());

        assert!(rules.apply(&mut emotions, ActionKind::OpposeAgent, true));
        assert_eq!(emotions.trust, -5.0);
        assert_eq!(emotions.resentment, 5.0);
        assert_eq!(emotions.fear, 1.0);
    }

    #[test]
    fn test_consume_resource_irritates_bystanders() {
        let rules = EmotionRules::default();
        let mut emotions = EmotionVector::default();
        assert!(rules.apply(&mut emotions, ActionKind::ConsumeResource, false));
        assert_eq!(emotions.resentment, 1.0);
    }

    #[test]
    fn test_emotions_clamp() {
        let rules = EmotionRules::default();
        let mut emotions = EmotionVector::default();
        for _ in 0..10 {
            rules.apply(&mut emotions, ActionKind::Sabotage, true);
        }
        assert_eq!(emotions.trust, -50.0);
        assert_eq!(emotions.resentment, 50.0);
        assert_eq!(emotions.fear, 50.0);
    }

    #[test]
    fn test_ambition_untouched_by_actions() {
        let rules = EmotionRules::default();
        let mut emotions = EmotionVector {
            ambition: 12.0,
            ..Default::default()
        };
        for kind in ActionKind::all() {
            rules.apply(&mut emotions, *kind, true);
        }
        assert_eq!(emotions.ambition, 12.0);
        assert_eq!(emotions.insecurity, 0.0);
    }

    #[test]
    fn test_emotional_bias_terms() {
        let emotions = EmotionVector {
            trust: 20.0,
            admiration: 10.0,
            resentment: 5.0,
            fear: 10.0,
            insecurity: 15.0,
            ..Default::default()
        };
        let bias = emotional_bias(&emotions);
        assert_eq!(bias[&ActionKind::SupportAgent], 0.3);
        assert_eq!(bias[&ActionKind::OpposeAgent], -0.15);
        assert_eq!(bias[&ActionKind::Negotiate], 0.2);
        assert_eq!(bias[&ActionKind::SpreadRumor], 0.2);
        assert!(!bias.contains_key(&ActionKind::ImproveFood));
    }
}
