//! Embedded conversation prompts
//!
//! The system prompt is compiled into the binary and rendered with the
//! current trip as Handlebars context before every turn.

use handlebars::Handlebars;
use serde_json::json;

use crate::domain::Trip;

use super::ChatError;

/// System prompt for the itinerary conversation engine
pub const ITINERARY_SYSTEM: &str = r#"You are a travel planning assistant that maintains a structured trip itinerary.

Reply with a single JSON object and nothing else:
{
  "message": "conversational text for the traveler",
  "trip": { ...complete trip... },        // only when proposing a full itinerary
  "tripUpdate": { ...partial trip... },   // only when changing part of it
  "suggestion": "optional follow-up the traveler might tap"
}

Rules:
- A trip has: destination, startDate, endDate, days. Each day has a date,
  a location label, and an ordered items list.
- Each item has: title, description, type (sight|food|museum|hike|experience|transport|rest),
  and optionally startTime/endTime (24-hour HH:MM), duration, notes, cost, costCategory.
- Preserve the id of any item you keep; omit ids for items you add.
- Keep every day's items in chronological order.
- Use "tripUpdate" with a "days" field for structural edits; omit "days"
  for pure metadata edits such as renaming the trip.
{{#if trip}}
Current trip:
{{{trip_json}}}
{{else}}
There is no trip yet. Propose a complete one when the traveler is ready.
{{/if}}
"#;

/// Render the system prompt with the current trip as context
pub fn render_system_prompt(trip: Option<&Trip>) -> Result<String, ChatError> {
    let handlebars = Handlebars::new();
    let trip_json = match trip {
        Some(t) => serde_json::to_string_pretty(t)?,
        None => String::new(),
    };
    let context = json!({
        "trip": trip.is_some(),
        "trip_json": trip_json,
    });
    handlebars
        .render_template(ITINERARY_SYSTEM, &context)
        .map_err(|e| ChatError::Template(e.to_string()))
}
