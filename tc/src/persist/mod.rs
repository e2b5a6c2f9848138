//! Persistence boundary and autosave
//!
//! The backend REST API owns durability and retries live nowhere: a save
//! is fire-and-forget from the editor's perspective, debounced by the
//! [`Autosaver`] actor.

mod autosave;
mod store;

pub use autosave::{Autosaver, AutosavePolicy};
pub use store::{HttpTripStore, StoreError, TripSnapshot, TripStore};
