//! Pure structural mutations
//!
//! Every operation is a copy-on-write transition `(trip, args) -> Option<Trip>`:
//! the input snapshot is never touched, and `None` means the day/item
//! reference did not resolve. Callers treat `None` as a silent no-op; these
//! operations are invoked from UI affordances that already constrain valid
//! targets, so an unresolved reference is stale state, not an error.

use crate::domain::{generate_item_id, ItemPatch, ItineraryItem, Trip};

/// Append an item to the end of a day's list
pub fn add_item(trip: &Trip, day_index: usize, item: ItineraryItem) -> Option<Trip> {
    let mut next = trip.clone();
    let day = next.days.get_mut(day_index)?;
    day.items.push(item);
    Some(next)
}

/// Substitute an item in place, located by id within a day
pub fn replace_item(trip: &Trip, day_index: usize, item: ItineraryItem) -> Option<Trip> {
    let mut next = trip.clone();
    let day = next.days.get_mut(day_index)?;
    let slot = day.items.iter_mut().find(|existing| existing.id == item.id)?;
    *slot = item;
    Some(next)
}

/// Remove an item from a day by id
pub fn remove_item(trip: &Trip, day_index: usize, item_id: &str) -> Option<Trip> {
    let mut next = trip.clone();
    let day = next.days.get_mut(day_index)?;
    let before = day.items.len();
    day.items.retain(|item| item.id != item_id);
    if day.items.len() == before {
        return None;
    }
    Some(next)
}

/// Shallow-merge a partial update into an item at its current index
pub fn update_item(trip: &Trip, day_index: usize, item_id: &str, patch: &ItemPatch) -> Option<Trip> {
    let mut next = trip.clone();
    let day = next.days.get_mut(day_index)?;
    let item = day.items.iter_mut().find(|item| item.id == item_id)?;
    patch.apply_to(item);
    Some(next)
}

/// Move an item within a day from one index to another.
///
/// Array-move semantics, not a swap: the item is removed and re-inserted,
/// shifting everything between the two indices by one.
pub fn reorder_items(trip: &Trip, day_index: usize, start_index: usize, end_index: usize) -> Option<Trip> {
    let mut next = trip.clone();
    let day = next.days.get_mut(day_index)?;
    if start_index >= day.items.len() || end_index >= day.items.len() {
        return None;
    }
    let item = day.items.remove(start_index);
    day.items.insert(end_index, item);
    Some(next)
}

/// Move an item from one day to a position in another.
///
/// The whole operation no-ops if the item id is missing from the source
/// day or either day does not exist. The insertion index is clamped to the
/// destination's length.
pub fn move_item(
    trip: &Trip,
    from_day: usize,
    to_day: usize,
    item_id: &str,
    insert_index: usize,
) -> Option<Trip> {
    if from_day >= trip.days.len() || to_day >= trip.days.len() {
        return None;
    }

    let mut next = trip.clone();
    let source = &mut next.days[from_day];
    let position = source.items.iter().position(|item| item.id == item_id)?;
    let item = source.items.remove(position);

    let destination = &mut next.days[to_day];
    let index = insert_index.min(destination.items.len());
    destination.items.insert(index, item);
    Some(next)
}

/// Duplicate a day immediately after the original.
///
/// Every copied item gets a freshly generated id: duplicates are
/// independent entities, never aliases of the originals.
pub fn duplicate_day(trip: &Trip, day_index: usize) -> Option<Trip> {
    let mut next = trip.clone();
    let original = next.days.get(day_index)?;

    let mut copy = original.clone();
    for item in &mut copy.items {
        item.id = generate_item_id(&item.title);
    }
    next.days.insert(day_index + 1, copy);
    Some(next)
}
