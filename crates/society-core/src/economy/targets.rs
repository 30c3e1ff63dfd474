//! Target Normalization
//!
//! Proposers produce free text, so agent names are matched leniently here
//! and nowhere else.

/// Placeholder targets that never name a real agent
const MALFORMED_TARGETS: &[&str] = &["", "everyone", "anyone", "all", "none", "null", "nobody"];

/// Whether a target is empty or a placeholder
pub fn is_malformed_target(target: &str) -> bool {
    let normalized = target.trim().to_lowercase();
    MALFORMED_TARGETS.contains(&normalized.as_str())
}

/// Whether a target names the shared world
pub fn is_world_target(target: &str) -> bool {
    target.trim().eq_ignore_ascii_case(society_events::WORLD_TARGET)
}

/// Lowercased first whitespace-separated token
pub fn first_token(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Resolve a free-text target against known agent names.
///
/// Exact match wins, then case-insensitive full match, then first-token
/// match, so "eldric" resolves to "Eldric the Conservative".
pub fn resolve_agent_name<'a>(target: &str, names: &'a [String]) -> Option<&'a str> {
    let target = target.trim();
    if let Some(name) = names.iter().find(|n| n.as_str() == target) {
        return Some(name.as_str());
    }
    if let Some(name) = names.iter().find(|n| n.eq_ignore_ascii_case(target)) {
        return Some(name.as_str());
    }
    let token = first_token(target);
    if token.is_empty() {
        return None;
    }
    names
        .iter()
        .find(|n| first_token(n) == token)
        .map(String::as_str)
}

/// Strip brackets and turn underscores into spaces
pub fn sanitize_target(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '[' | ']'))
        .map(|c| if c == '_' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
