//! Debounced fire-and-forget autosave
//!
//! An actor owning the debounce window: bursts of edits collapse into one
//! save after a quiet period, a failed save is logged and retried on the
//! next window, and a newer snapshot simply supersedes an older pending
//! one. The core never blocks on a save; the in-memory trip stays
//! authoritative for the session.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::chat::ChatMessage;
use crate::domain::Trip;

use super::store::TripStore;

/// Injectable debounce policy so tests can drive the window deterministically
#[derive(Debug, Clone)]
pub struct AutosavePolicy {
    /// Quiet period before a pending snapshot is written
    pub debounce: Duration,
}

impl Default for AutosavePolicy {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(2),
        }
    }
}

/// Snapshot queued for the next save window
#[derive(Debug, Clone)]
struct PendingSave {
    trip: Trip,
    messages: Vec<ChatMessage>,
}

enum SaveCommand {
    Dirty(Box<PendingSave>),
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Handle to the autosave actor
#[derive(Clone)]
pub struct Autosaver {
    tx: mpsc::Sender<SaveCommand>,
}

impl Autosaver {
    /// Spawn the actor
    pub fn spawn(store: Arc<dyn TripStore>, policy: AutosavePolicy) -> Self {
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(autosave_loop(store, policy, rx));
        Self { tx }
    }

    /// Queue the current state for saving after the quiet period.
    ///
    /// Each call replaces any pending snapshot and re-arms the window, so
    /// the write always serializes what was current at the last edit.
    pub async fn mark_dirty(&self, trip: Trip, messages: Vec<ChatMessage>) {
        let pending = PendingSave { trip, messages };
        if self.tx.send(SaveCommand::Dirty(Box::new(pending))).await.is_err() {
            warn!("autosave: actor gone, edit not queued");
        }
    }

    /// Force an immediate save of any pending snapshot and wait for it
    pub async fn flush(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(SaveCommand::Flush(reply_tx)).await.is_ok() {
            let _ = reply_rx.await;
        }
    }

    /// Stop the actor, flushing any pending snapshot first
    pub async fn shutdown(&self) {
        let _ = self.tx.send(SaveCommand::Shutdown).await;
    }
}

/// The actor loop that owns the pending snapshot and the saved-trip id
async fn autosave_loop(store: Arc<dyn TripStore>, policy: AutosavePolicy, mut rx: mpsc::Receiver<SaveCommand>) {
    let mut pending: Option<PendingSave> = None;
    let mut saved_id: Option<String> = None;

    loop {
        let command = if pending.is_some() {
            match tokio::time::timeout(policy.debounce, rx.recv()).await {
                Ok(Some(command)) => Some(command),
                Ok(None) => break,
                // Quiet period elapsed
                Err(_) => None,
            }
        } else {
            match rx.recv().await {
                Some(command) => Some(command),
                None => break,
            }
        };

        match command {
            None => {
                if let Some(snapshot) = pending.take() {
                    if !save(store.as_ref(), &mut saved_id, &snapshot).await {
                        // Keep the snapshot; the window re-arms and retries
                        pending = Some(snapshot);
                    }
                }
            }
            Some(SaveCommand::Dirty(snapshot)) => {
                pending = Some(*snapshot);
            }
            Some(SaveCommand::Flush(reply)) => {
                if let Some(snapshot) = pending.take() {
                    if !save(store.as_ref(), &mut saved_id, &snapshot).await {
                        pending = Some(snapshot);
                    }
                }
                let _ = reply.send(());
            }
            Some(SaveCommand::Shutdown) => {
                if let Some(snapshot) = pending.take() {
                    save(store.as_ref(), &mut saved_id, &snapshot).await;
                }
                break;
            }
        }
    }

    debug!("autosave: actor stopped");
}

/// Write one snapshot: create on first save, update thereafter
async fn save(store: &dyn TripStore, saved_id: &mut Option<String>, snapshot: &PendingSave) -> bool {
    let result = match saved_id.as_deref() {
        Some(id) => store.update_trip(id, &snapshot.trip, &snapshot.messages).await,
        None => match store.create_trip(&snapshot.trip, &snapshot.messages).await {
            Ok(id) => {
                debug!(%id, "autosave: trip created");
                *saved_id = Some(id);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => {
            debug!(trip_id = ?saved_id, "autosave: saved");
            true
        }
        Err(e) => {
            warn!(error = %e, "autosave: save failed, will retry on next window");
            false
        }
    }
}
