//! Itinerary domain model
//!
//! The `Trip`/`Day`/`ItineraryItem` document shapes, patch types for
//! shallow merges, id generation, and external booking records. Everything
//! here is plain serializable data; the mutation rules live in [`crate::editor`].

mod booking;
mod id;
mod item;
mod trip;

pub use booking::FlightBooking;
pub use id::{ensure_item_ids, generate_item_id, generate_trip_id};
pub use item::{CostCategory, ItemKind, ItemLocation, ItemPatch, ItineraryItem};
pub use trip::{CoverPhoto, Day, Trip, TripPatch};
