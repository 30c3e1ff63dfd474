//! Prompt Rendering
//!
//! Turns an [`Observation`] into the text an LLM-backed proposer reads.
//! Arithmetic, trends, and patterns are computed here; the model only
//! chooses strategy.

use std::fmt::Write;

use society_events::ActionType;

use super::observation::{Observation, Standing};
use crate::components::social::GoalSlot;

const RESPONSE_SCHEMA: &str = r#"Respond with a single JSON object:
{
  "type": "<action type>",
  "target": "<agent name, or \"world\" for resource actions>",
  "content": "<message text, only for send_message>",
  "reasoning": "<one or two sentences>"
}"#;

pub fn render_prompt(observation: &Observation) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_prompt(&mut out, observation);
    out
}

fn write_prompt(out: &mut String, obs: &Observation) -> std::fmt::Result {
    let world = &obs.world;

    writeln!(out, "You are {}, {}.", obs.agent, obs.archetype)?;
    if !obs.description.is_empty() {
        writeln!(out, "{}", obs.description)?;
    }
    if !obs.persona_goals.is_empty() {
        writeln!(out, "\n=== YOUR GOALS ===")?;
        for goal in &obs.persona_goals {
            writeln!(out, "- {}", goal)?;
        }
    }

    writeln!(out, "\n=== WORLD (turn {}) ===", world.turn + 1)?;
    writeln!(out, "{}", world.summary_line())?;
    if let Some(modifier) = obs.modifier {
        writeln!(out, "*** {} ***", modifier.describe())?;
    }

    if !obs.targeted_by.is_empty() {
        writeln!(out, "\n=== WHAT JUST HAPPENED TO YOU THIS TURN ===")?;
        for event in &obs.targeted_by {
            writeln!(out, "- {}", event.describe())?;
        }
    }

    if !obs.messages.is_empty() {
        writeln!(out, "\n=== MESSAGES RECEIVED ===")?;
        for message in &obs.messages {
            writeln!(out, "{}", message)?;
        }
    }

    writeln!(out, "\n=== WHAT YOU CAN AFFORD THIS TURN ===")?;
    for action_type in [
        ActionType::SupportAgent,
        ActionType::OpposeAgent,
        ActionType::SendMessage,
        ActionType::Pass,
    ] {
        writeln!(out, "[ok] {} - FREE", action_type)?;
    }
    for row in &obs.affordability {
        if row.affordable {
            writeln!(
                out,
                "[ok] {} - costs {} {} (you have {})",
                row.action_type, row.cost, row.resource, row.held
            )?;
        } else {
            writeln!(
                out,
                "[NO] {} - costs {} {} (you only have {})",
                row.action_type, row.cost, row.resource, row.held
            )?;
        }
    }

    if !obs.trends.is_empty() {
        writeln!(out, "\n=== RESOURCE TRENDS ===")?;
        for trend in &obs.trends {
            let values: Vec<String> = trend.values.iter().map(u32::to_string).collect();
            writeln!(
                out,
                "{}: {} {}",
                trend.resource.as_str().to_uppercase(),
                values.join(" -> "),
                trend.status.label()
            )?;
        }
    }

    if !obs.relationships.is_empty() {
        writeln!(out, "\n=== RELATIONSHIPS ===")?;
        for r in &obs.relationships {
            let label = match r.standing {
                Standing::Ally => "ally",
                Standing::Rival => "rival",
                Standing::Neutral => "neutral",
            };
            writeln!(out, "{}: {:+} ({})", r.name, r.score, label)?;
        }
    }

    let goals: Vec<_> = obs.interpersonal_goals.active().collect();
    if !goals.is_empty() {
        writeln!(out, "\n=== INTERPERSONAL GOALS ===")?;
        for (slot, name) in goals {
            let verb = match slot {
                GoalSlot::AllyWith => "Ally with",
                GoalSlot::Undermine => "Undermine",
                GoalSlot::SeekApprovalFrom => "Seek approval from",
                GoalSlot::GainInfluenceOver => "Gain influence over",
            };
            writeln!(out, "- {} {}", verb, name)?;
        }
    }

    if !obs.triggers.is_empty() {
        writeln!(out, "\nInteraction Triggers:")?;
        for trigger in &obs.triggers {
            writeln!(out, "- {}", trigger)?;
        }
    }

    if !obs.top_actions.is_empty() {
        writeln!(out, "\nAction Biases (pre-computed, highest first):")?;
        for (kind, weight) in &obs.top_actions {
            writeln!(out, "- {}: {:.2}", kind, weight)?;
        }
    }
    let recommended = &obs.recommended_targets;
    if let Some(name) = &recommended.support {
        writeln!(out, "Recommended support target: {}", name)?;
    }
    if let Some(name) = &recommended.oppose {
        writeln!(out, "Recommended oppose target: {}", name)?;
    }

    if let Some(warning) = &obs.repetition_warning {
        writeln!(out, "\nWARNING: {}", warning)?;
    }
    if obs.last_action == Some(ActionType::SendMessage) {
        writeln!(
            out,
            "TIP: You just sent a message. Back your words with a concrete action unless a deal is still open."
        )?;
    }

    writeln!(out, "\n=== RECENT HISTORY ===")?;
    if obs.history.is_empty() {
        writeln!(out, "No history yet.")?;
    } else {
        for entry in &obs.history {
            writeln!(out, "{}", entry)?;
        }
    }

    writeln!(out, "\nValid targets: {}", obs.valid_targets.join(", "))?;
    let actions: Vec<&str> = ActionType::all().iter().map(|a| a.as_str()).collect();
    writeln!(out, "Valid action types: {}", actions.join(", "))?;
    writeln!(out, "\n{}", RESPONSE_SCHEMA)?;
    Ok(())
}
