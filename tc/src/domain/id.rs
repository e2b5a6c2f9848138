//! Itinerary id generation
//!
//! Ids use the format `{8-char-hex}-{slug}`, e.g. `0194f2aa-eiffel-tower`.
//! They are opaque and stable: generated once at creation and never
//! rewritten by any mutation.

use super::Trip;

/// Generate an item id from its title
pub fn generate_item_id(title: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.simple().to_string()[..8];
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{}-item", hex_prefix)
    } else {
        format!("{}-{}", hex_prefix, slug)
    }
}

/// Generate a trip id from its destination
pub fn generate_trip_id(destination: &str) -> String {
    let uuid = uuid::Uuid::now_v7();
    let hex_prefix = &uuid.simple().to_string()[..8];
    let slug = slugify(destination);
    if slug.is_empty() {
        format!("{}-trip", hex_prefix)
    } else {
        format!("{}-trip-{}", hex_prefix, slug)
    }
}

/// Slugify a title for use in ids
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .take(6)
        .collect::<Vec<_>>()
        .join("-")
}

/// Mint ids for items that arrived without one.
///
/// Conversation replies are schema-shaped but not trusted to carry ids: the
/// core generates them on receipt. Ids already present are kept so change
/// detection can match items across conversation turns. Returns the number
/// of ids assigned.
pub fn ensure_item_ids(trip: &mut Trip) -> usize {
    let mut assigned = 0;
    for day in &mut trip.days {
        for item in &mut day.items {
            if item.id.trim().is_empty() {
                item.id = generate_item_id(&item.title);
                assigned += 1;
            }
        }
    }
    if trip.id.trim().is_empty() {
        trip.id = generate_trip_id(&trip.destination);
    }
    assigned
}
