//! Tripcraft - AI-assisted travel itinerary editor core
//!
//! Tripcraft maintains a mutable, versioned trip document (destination,
//! date range, per-day activity lists) driven by two independent producers
//! of change: a conversation engine that proposes whole-trip or partial
//! updates, and direct user edits (reorder, move, duplicate, field edits)
//! with bounded undo/redo.
//!
//! # Core Concepts
//!
//! - **Two producers, one document**: conversation output is forward-only
//!   and highlighted; user edits are locally reversible.
//! - **Copy-on-write mutations**: every structural edit is a pure
//!   `(trip, args) -> trip` transition, so history snapshots never alias
//!   the live document.
//! - **Deterministic booking merge**: external flight bookings land in the
//!   chronologically correct day and only ever widen the trip's bounds.
//! - **Fire-and-forget persistence**: saves are debounced and retried
//!   silently; the in-memory trip stays authoritative for the session.
//!
//! # Modules
//!
//! - [`domain`] - Trip/Day/Item shapes, patches, ids, bookings
//! - [`editor`] - mutation engine, change detection, undo/redo history
//! - [`booking`] - the booking merge engine
//! - [`chat`] - conversation engine boundary
//! - [`geocode`] - geocoding boundary and enrichment
//! - [`persist`] - persistence boundary and debounced autosave
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod booking;
pub mod chat;
pub mod cli;
pub mod config;
pub mod domain;
pub mod editor;
pub mod geocode;
pub mod persist;

// Re-export commonly used types
pub use chat::{ChatError, ChatMessage, ChatReply, ChatRequest, ChatRole, ConversationClient, HttpConversationClient};
pub use config::{ApiConfig, AutosaveConfig, Config, GeocodeConfig, LlmConfig};
pub use domain::{
    CostCategory, CoverPhoto, Day, FlightBooking, ItemKind, ItemLocation, ItemPatch, ItineraryItem, Trip, TripPatch,
};
pub use editor::{detect_changes, Editor, History};
pub use geocode::{enrich_trip, GeocodeError, Geocoder, HttpGeocoder};
pub use persist::{Autosaver, AutosavePolicy, HttpTripStore, StoreError, TripSnapshot, TripStore};
