//! Change detection between trip snapshots
//!
//! Computes the set of item ids considered newly added or modified, used
//! to highlight what a conversation turn touched. Pure over two snapshots.

use std::collections::{HashMap, HashSet};

use crate::domain::Trip;

/// Diff two itinerary snapshots into the changed-item id set.
///
/// With no prior trip (first load) nothing is highlighted. Otherwise an id
/// present only in `new` is "new"; one whose tracked content differs is
/// "modified". Removed items simply disappear and are never flagged.
pub fn detect_changes(old: Option<&Trip>, new: &Trip) -> HashSet<String> {
    let Some(old) = old else {
        return HashSet::new();
    };

    let old_index: HashMap<&str, &crate::domain::ItineraryItem> =
        old.items().map(|item| (item.id.as_str(), item)).collect();

    let mut changed = HashSet::new();
    for item in new.items() {
        match old_index.get(item.id.as_str()) {
            None => {
                changed.insert(item.id.clone());
            }
            Some(previous) => {
                if previous.content_differs(item) {
                    changed.insert(item.id.clone());
                }
            }
        }
    }
    changed
}
