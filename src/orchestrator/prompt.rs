//! Prompts and final-answer parsing.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{Itinerary, TravelerPrefs};
use crate::error::TravelError;
use crate::types::ModelMessage;

pub const SYSTEM_PROMPT: &str = "You are a senior travel-planning orchestrator. \
Plan minimal tool calls, prefer parallelizable requests, and return a cohesive itinerary. \
When making a plan: summarize, list chosen flight/hotel, include weather overview, key events, \
and a day-by-day schedule. Keep budgets in the user's currency.";

pub const REPAIR_PROMPT: &str = "Please output valid JSON strictly matching the Itinerary schema.";

const NOTES: &str = "Use tools to fetch facts; then produce a final structured itinerary JSON \
matching the Itinerary schema.";

const NO_BOOKING_NOTE: &str = "Booking is not authorized for this request; do not attempt to book.";

/// Opening conversation: system prompt plus the goal and defaults as JSON.
pub fn initial_messages(
    goal: &str,
    prefs: &TravelerPrefs,
    allow_booking: bool,
) -> Result<Vec<ModelMessage>, TravelError> {
    let mut payload = serde_json::json!({
        "goal": goal,
        "defaults": prefs,
        "notes": NOTES,
        "itinerary_schema": Itinerary::schema_hint(),
    });
    if !allow_booking {
        payload["booking"] = NO_BOOKING_NOTE.into();
    }

    Ok(vec![
        ModelMessage::system(SYSTEM_PROMPT),
        ModelMessage::user(serde_json::to_string(&payload)?),
    ])
}

/// Parse the model's final answer as an [`Itinerary`].
///
/// Markdown fences are stripped, and surrounding prose is tolerated: the
/// first `{` from which an itinerary object parses wins.
pub fn parse_itinerary(text: &str) -> Result<Itinerary, TravelError> {
    let candidate = strip_code_fences(text);
    if candidate.is_empty() {
        return Err(TravelError::InvalidItinerary("empty response".into()));
    }

    match serde_json::from_str::<Itinerary>(&candidate) {
        Ok(itinerary) => Ok(itinerary),
        Err(first) => embedded_itinerary(&candidate)
            .ok_or_else(|| TravelError::InvalidItinerary(first.to_string())),
    }
}

/// Try each `{` in turn, reading one JSON value and ignoring what follows.
fn embedded_itinerary(text: &str) -> Option<Itinerary> {
    text.match_indices('{').find_map(|(i, _)| {
        serde_json::Deserializer::from_str(&text[i..])
            .into_iter::<Itinerary>()
            .next()?
            .ok()
    })
}

fn code_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_-]*\s*(.*?)\s*(?:```)?$").expect("valid regex")
    })
}

/// Strip markdown code fences (any language tag, any case) from a JSON response.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    match code_fence_regex().captures(trimmed).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    const MINIMAL: &str = r#"{"summary":"s","flights":[],"hotel":null,"weather":null,"est_total_currency":"USD","est_total_amount":1.5}"#;

    #[test]
    fn strips_json_fence() {
        let input = format!("```json\n{MINIMAL}\n```");
        assert_eq!(strip_code_fences(&input), MINIMAL);
        assert_eq!(strip_code_fences(&format!("```\n{MINIMAL}\n```")), MINIMAL);
    }

    #[test]
    fn parses_fenced_itinerary() {
        let itinerary = parse_itinerary(&format!("```json\n{MINIMAL}\n```")).unwrap();
        assert_eq!(itinerary.est_total_amount, 1.5);
    }

    #[test]
    fn parses_itinerary_wrapped_in_prose() {
        let itinerary = parse_itinerary(&format!("Here is your plan:\n{MINIMAL}\nEnjoy!")).unwrap();
        assert_eq!(itinerary.summary, "s");
    }

    #[test]
    fn fence_language_tag_is_case_insensitive() {
        assert_eq!(strip_code_fences(&format!("```JSON\n{MINIMAL}\n```")), MINIMAL);
        assert!(parse_itinerary(&format!("```Json\n{MINIMAL}\n```")).is_ok());
    }

    #[test]
    fn skips_braces_in_surrounding_prose() {
        let text = format!("Options {{A/B}}: I picked A.\n{MINIMAL}\nSee {{notes}} below.");
        let itinerary = parse_itinerary(&text).unwrap();
        assert_eq!(itinerary.summary, "s");
    }

    #[test]
    fn rejects_prose_and_empty_answers() {
        assert!(matches!(
            parse_itinerary("I'd suggest visiting Stanley Park."),
            Err(TravelError::InvalidItinerary(_))
        ));
        assert!(matches!(parse_itinerary("   "), Err(TravelError::InvalidItinerary(_))));
    }

    #[test]
    fn initial_messages_embed_goal_and_booking_note() {
        let prefs = TravelerPrefs::new("SFO", "Vancouver", "2025-10-10");
        let messages = initial_messages("Weekend away", &prefs, false).unwrap();

        assert_eq!(messages[0].role, Role::System);
        let payload: serde_json::Value = serde_json::from_str(&messages[1].text()).unwrap();
        assert_eq!(payload["goal"], "Weekend away");
        assert_eq!(payload["defaults"]["destination"], "Vancouver");
        assert!(payload["booking"].is_string());

        let messages = initial_messages("Weekend away", &prefs, true).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&messages[1].text()).unwrap();
        assert!(payload.get("booking").is_none());
    }
}
