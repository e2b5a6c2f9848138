//! The itinerary editor state object
//!
//! `Editor` owns the live trip document and reconciles its two producers
//! of change: conversation output (whole-trip replace / partial update,
//! forward-only) and direct user edits (structural operations, undoable).
//! All structural operations are pure copy-on-write transitions in
//! [`ops`]; the editor wraps them with history, change detection, and the
//! unsaved flag.

mod diff;
mod history;
pub mod ops;

pub use diff::detect_changes;
pub use history::History;

use std::collections::HashSet;

use tracing::debug;

use crate::booking;
use crate::domain::{FlightBooking, ItemPatch, ItineraryItem, Trip, TripPatch};

/// Editor state: the live trip plus its reconciliation bookkeeping
#[derive(Debug, Default)]
pub struct Editor {
    trip: Option<Trip>,
    history: History,
    /// Item ids added or modified since the user last viewed the itinerary
    changed: HashSet<String>,
    unsaved: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing trip (e.g. loaded from the backend)
    pub fn with_trip(trip: Trip) -> Self {
        Self {
            trip: Some(trip),
            ..Self::default()
        }
    }

    pub fn trip(&self) -> Option<&Trip> {
        self.trip.as_ref()
    }

    /// Item ids to highlight as new/modified
    pub fn changed_items(&self) -> &HashSet<String> {
        &self.changed
    }

    /// The user viewed the itinerary; nothing is highlighted anymore
    pub fn clear_changed(&mut self) {
        self.changed.clear();
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// A save completed; the in-memory copy matches the backend
    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // === Conversation-driven mutations (forward-only, never undoable) ===

    /// Install a complete replacement trip from the conversation engine.
    ///
    /// Runs change detection against the previous trip so the UI can
    /// highlight what the turn touched. History is untouched: AI-driven
    /// changes are a forward-only narrative.
    pub fn set_trip(&mut self, trip: Trip) {
        self.changed = detect_changes(self.trip.as_ref(), &trip);
        debug!(
            trip_id = %trip.id,
            days = trip.days.len(),
            changed = self.changed.len(),
            "editor: trip replaced"
        );
        self.trip = Some(trip);
        self.unsaved = true;
    }

    /// Shallow-merge a partial trip update from the conversation engine.
    ///
    /// Change detection runs only when the patch carries `days`; a pure
    /// metadata edit (rename, cover photo) leaves the highlight set alone.
    /// No-op when no trip is loaded.
    pub fn update_trip(&mut self, patch: TripPatch) {
        let Some(current) = self.trip.as_ref() else {
            debug!("editor: update_trip with no trip loaded, ignoring");
            return;
        };

        let touches_days = patch.touches_days();
        let mut next = current.clone();
        patch.apply_to(&mut next);

        if touches_days {
            self.changed = detect_changes(Some(current), &next);
        }
        debug!(touches_days, changed = self.changed.len(), "editor: trip patched");
        self.trip = Some(next);
        self.unsaved = true;
    }

    // === User edits (undoable structural operations) ===

    /// Append an item to a day. Returns false on an unresolved reference.
    pub fn add_item(&mut self, day_index: usize, item: ItineraryItem) -> bool {
        self.apply_user_edit("add_item", |trip| ops::add_item(trip, day_index, item))
    }

    /// Replace an item in a day, matched by id, index preserved
    pub fn replace_item(&mut self, day_index: usize, item: ItineraryItem) -> bool {
        self.apply_user_edit("replace_item", |trip| ops::replace_item(trip, day_index, item))
    }

    /// Remove an item from a day by id
    pub fn remove_item(&mut self, day_index: usize, item_id: &str) -> bool {
        self.apply_user_edit("remove_item", |trip| ops::remove_item(trip, day_index, item_id))
    }

    /// Shallow-merge a field patch into an item
    pub fn update_item(&mut self, day_index: usize, item_id: &str, patch: &ItemPatch) -> bool {
        self.apply_user_edit("update_item", |trip| ops::update_item(trip, day_index, item_id, patch))
    }

    /// Reorder items within a day (array-move semantics)
    pub fn reorder_items(&mut self, day_index: usize, start_index: usize, end_index: usize) -> bool {
        self.apply_user_edit("reorder_items", |trip| {
            ops::reorder_items(trip, day_index, start_index, end_index)
        })
    }

    /// Move an item between days, inserting at the given index
    pub fn move_item(&mut self, from_day: usize, to_day: usize, item_id: &str, insert_index: usize) -> bool {
        self.apply_user_edit("move_item", |trip| {
            ops::move_item(trip, from_day, to_day, item_id, insert_index)
        })
    }

    /// Duplicate a day in place; copies get fresh item ids
    pub fn duplicate_day(&mut self, day_index: usize) -> bool {
        self.apply_user_edit("duplicate_day", |trip| ops::duplicate_day(trip, day_index))
    }

    /// Restore the snapshot prior to the last user edit.
    ///
    /// Replays through history and bypasses diff/merge entirely: the
    /// highlight set is left as-is.
    pub fn undo(&mut self) -> bool {
        let Some(current) = self.trip.as_ref() else {
            return false;
        };
        match self.history.undo(current) {
            Some(restored) => {
                self.trip = Some(restored);
                self.unsaved = true;
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone edit
    pub fn redo(&mut self) -> bool {
        let Some(current) = self.trip.as_ref() else {
            return false;
        };
        match self.history.redo(current) {
            Some(restored) => {
                self.trip = Some(restored);
                self.unsaved = true;
                true
            }
            None => false,
        }
    }

    // === External bookings ===

    /// Fold a flight booking into the trip.
    ///
    /// Bookings are external forward-only input like conversation output:
    /// not undoable, but the inserted items do highlight. Returns the index
    /// of the day that received the outbound leg, or `None` when no trip is
    /// loaded.
    pub fn merge_booking(&mut self, flight: &FlightBooking) -> Option<usize> {
        let current = self.trip.as_ref()?;
        let (merged, outbound_day) = booking::merge_booking(current, flight);
        self.changed = detect_changes(Some(current), &merged);
        debug!(
            outbound_day,
            changed = self.changed.len(),
            "editor: booking merged"
        );
        self.trip = Some(merged);
        self.unsaved = true;
        Some(outbound_day)
    }

    /// Validate, push the pre-mutation snapshot, install the result.
    ///
    /// An operation returning `None` leaves state and history untouched.
    fn apply_user_edit<F>(&mut self, name: &str, op: F) -> bool
    where
        F: FnOnce(&Trip) -> Option<Trip>,
    {
        let Some(current) = self.trip.as_ref() else {
            debug!(op = name, "editor: no trip loaded, ignoring");
            return false;
        };
        let Some(next) = op(current) else {
            debug!(op = name, "editor: reference not found, ignoring");
            return false;
        };
        self.history.push(current);
        self.trip = Some(next);
        self.unsaved = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Day, ItemKind};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    fn loaded_editor() -> Editor {
        let mut day = Day::new(date(1), "Tokyo");
        day.items.push(ItineraryItem::new("Senso-ji", ItemKind::Sight));
        day.items.push(ItineraryItem::new("Ramen lunch", ItemKind::Food));
        Editor::with_trip(Trip::new("Tokyo").with_day(day))
    }

    #[test]
    fn test_ops_noop_without_trip() {
        let mut editor = Editor::new();
        assert!(!editor.add_item(0, ItineraryItem::new("X", ItemKind::Rest)));
        assert!(!editor.undo());
        assert!(editor.merge_booking(&FlightBooking::one_way("A", "B", date(1))).is_none());
        assert!(editor.trip().is_none());
    }

    #[test]
    fn test_user_edit_pushes_history_and_marks_unsaved() {
        let mut editor = loaded_editor();
        assert!(!editor.has_unsaved_changes());
        assert!(!editor.can_undo());

        assert!(editor.add_item(0, ItineraryItem::new("Onsen", ItemKind::Rest)));
        assert!(editor.has_unsaved_changes());
        assert!(editor.can_undo());
    }

    #[test]
    fn test_failed_edit_leaves_history_untouched() {
        let mut editor = loaded_editor();
        assert!(!editor.remove_item(0, "no-such-id"));
        assert!(!editor.can_undo());
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut editor = loaded_editor();
        let before = editor.trip().unwrap().clone();

        editor.add_item(0, ItineraryItem::new("Onsen", ItemKind::Rest));
        let after = editor.trip().unwrap().clone();

        assert!(editor.undo());
        assert_eq!(editor.trip().unwrap(), &before);
        assert!(editor.redo());
        assert_eq!(editor.trip().unwrap(), &after);
    }

    #[test]
    fn test_set_trip_highlights_without_history() {
        let mut editor = loaded_editor();
        let mut replacement = editor.trip().unwrap().clone();
        replacement.days[0].items[0].title = "Senso-ji at dawn".to_string();
        let new_item = ItineraryItem::new("Kabuki show", ItemKind::Experience);
        replacement.days[0].items.push(new_item.clone());
        let modified_id = replacement.days[0].items[0].id.clone();

        editor.set_trip(replacement);

        let changed = editor.changed_items();
        assert_eq!(changed.len(), 2);
        assert!(changed.contains(&modified_id));
        assert!(changed.contains(&new_item.id));
        // AI-driven replacement is not undoable
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_update_trip_metadata_keeps_highlights() {
        let mut editor = loaded_editor();
        let mut replacement = editor.trip().unwrap().clone();
        replacement.days[0].items[0].title = "Changed".to_string();
        editor.set_trip(replacement);
        let highlights = editor.changed_items().clone();
        assert!(!highlights.is_empty());

        editor.update_trip(TripPatch {
            destination: Some("Tokyo & Nikko".to_string()),
            ..Default::default()
        });

        assert_eq!(editor.changed_items(), &highlights);
        assert_eq!(editor.trip().unwrap().destination, "Tokyo & Nikko");
    }

    #[test]
    fn test_update_trip_with_days_recomputes_highlights() {
        let mut editor = loaded_editor();
        let mut days = editor.trip().unwrap().days.clone();
        let added = ItineraryItem::new("Evening stroll", ItemKind::Rest);
        days[0].items.push(added.clone());

        editor.update_trip(TripPatch {
            days: Some(days),
            ..Default::default()
        });

        assert_eq!(editor.changed_items().len(), 1);
        assert!(editor.changed_items().contains(&added.id));
    }

    #[test]
    fn test_clear_changed() {
        let mut editor = loaded_editor();
        let mut replacement = editor.trip().unwrap().clone();
        replacement.days[0].items[0].title = "Changed".to_string();
        editor.set_trip(replacement);
        assert!(!editor.changed_items().is_empty());

        editor.clear_changed();
        assert!(editor.changed_items().is_empty());
    }

    #[test]
    fn test_redo_unreachable_after_new_edit() {
        let mut editor = loaded_editor();
        editor.add_item(0, ItineraryItem::new("A", ItemKind::Rest));
        editor.undo();
        assert!(editor.can_redo());

        editor.add_item(0, ItineraryItem::new("B", ItemKind::Rest));
        assert!(!editor.can_redo());
        assert!(!editor.redo());
    }

    #[test]
    fn test_merge_booking_highlights_flight_items() {
        let mut editor = loaded_editor();
        let booking = FlightBooking::one_way("NRT", "KIX", date(1));

        let day = editor.merge_booking(&booking).unwrap();
        assert_eq!(day, 0);
        assert_eq!(editor.changed_items().len(), 1);
        assert!(editor.has_unsaved_changes());
        assert!(!editor.can_undo());
    }
}
