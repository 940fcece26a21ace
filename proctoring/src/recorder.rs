//! Provider side of the event log: records browser focus / visibility /
//! screen-share transitions and keeps the per-interview log persisted.
//!
//! DESIGN
//! ======
//! The log is append-only and re-saved in full after each append under
//! `proctoring_events_<interviewId>`. Timestamps are clamped so the log stays
//! non-decreasing even if the host clock steps backwards. Loading is
//! fail-soft: unreadable JSON yields an empty log and individual malformed
//! entries are dropped.

#[cfg(test)]
#[path = "recorder_test.rs"]
mod recorder_test;

use serde_json::{Map, Value};
use storage::{KeyValueStore, StorageError, proctoring_events_key, save_json};
use tracing::{debug, warn};

use crate::{EventType, ProctoringEvent, ProctoringSummary, aggregate};

/// Decode a stored event log, dropping entries that are not valid events.
#[must_use]
pub fn parse_event_log(raw: &str) -> Vec<ProctoringEvent> {
    let entries = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "unreadable proctoring event log; starting empty");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ProctoringEvent>(entry) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!(error = %e, "dropping malformed proctoring event");
                None
            }
        })
        .collect()
}

/// Load the event log for `interview_id`. Missing or corrupt logs are empty.
#[must_use]
pub fn load_events(store: &impl KeyValueStore, interview_id: &str) -> Vec<ProctoringEvent> {
    store
        .get(&proctoring_events_key(interview_id))
        .map(|raw| parse_event_log(&raw))
        .unwrap_or_default()
}

/// Append-only recorder for one interview's event log.
pub struct EventRecorder<S: KeyValueStore> {
    store: S,
    interview_id: String,
    events: Vec<ProctoringEvent>,
    screen_sharing: bool,
}

impl<S: KeyValueStore> EventRecorder<S> {
    /// Open the log for `interview_id`, resuming any events already stored.
    pub fn open(store: S, interview_id: impl Into<String>) -> Self {
        let interview_id = interview_id.into();
        let events = load_events(&store, &interview_id);
        let screen_sharing = events
            .iter()
            .rev()
            .find_map(|e| match e.kind {
                EventType::ScreenShareStart => Some(true),
                EventType::ScreenShareStop => Some(false),
                _ => None,
            })
            .unwrap_or(false);
        debug!(%interview_id, count = events.len(), "opened proctoring log");

        Self { store, interview_id, events, screen_sharing }
    }

    #[must_use]
    pub fn interview_id(&self) -> &str {
        &self.interview_id
    }

    #[must_use]
    pub fn events(&self) -> &[ProctoringEvent] {
        &self.events
    }

    #[must_use]
    pub fn is_screen_sharing(&self) -> bool {
        self.screen_sharing
    }

    /// Append an event and persist the log.
    ///
    /// The event is kept in memory even when the save fails.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting the log fails.
    pub fn record(&mut self, kind: EventType, timestamp: i64) -> Result<(), StorageError> {
        self.push(ProctoringEvent::new(kind, timestamp))
    }

    /// Append an event carrying extra context and persist the log.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting the log fails.
    pub fn record_with_details(
        &mut self,
        kind: EventType,
        timestamp: i64,
        details: Map<String, Value>,
    ) -> Result<(), StorageError> {
        self.push(ProctoringEvent::new(kind, timestamp).with_details(details))
    }

    /// Page visibility changed (`document.hidden`).
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting the log fails.
    pub fn visibility_changed(&mut self, hidden: bool, timestamp: i64) -> Result<(), StorageError> {
        let kind = if hidden { EventType::TabBlur } else { EventType::TabFocus };
        self.record(kind, timestamp)
    }

    /// Window gained or lost focus.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting the log fails.
    pub fn window_focus_changed(&mut self, focused: bool, timestamp: i64) -> Result<(), StorageError> {
        let kind = if focused { EventType::WindowFocus } else { EventType::WindowBlur };
        self.record(kind, timestamp)
    }

    /// Screen sharing started or stopped. Repeated reports of the current
    /// state are ignored; returns whether an event was recorded.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting the log fails.
    pub fn screen_share_changed(&mut self, active: bool, timestamp: i64) -> Result<bool, StorageError> {
        if active == self.screen_sharing {
            return Ok(false);
        }
        self.screen_sharing = active;
        let kind = if active { EventType::ScreenShareStart } else { EventType::ScreenShareStop };
        self.record(kind, timestamp)?;
        Ok(true)
    }

    /// Aggregate the current log against `now`.
    #[must_use]
    pub fn summary(&self, now: i64) -> ProctoringSummary {
        aggregate(&self.events, now)
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn push(&mut self, mut event: ProctoringEvent) -> Result<(), StorageError> {
        if let Some(last) = self.events.last()
            && event.timestamp < last.timestamp
        {
            debug!(
                given = event.timestamp,
                last = last.timestamp,
                "clamping out-of-order proctoring timestamp"
            );
            event.timestamp = last.timestamp;
        }
        self.events.push(event);
        save_json(&mut self.store, &proctoring_events_key(&self.interview_id), &self.events)
    }
}
