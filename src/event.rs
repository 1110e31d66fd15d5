//! Lifecycle signals and the sink they are delivered to.
//!
//! The controller's only outputs are [`TypeaheadEvent`] values pushed into an
//! injected [`EventSink`]; state mutation is fully decoupled from rendering.
//! The embedding layer maps events to whatever its UI needs (spinner classes,
//! DOM updates, "no results" styling).

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::normalize::QueryKey;
use crate::view::ResultView;

// ─── Events ─────────────────────────────────────────────────────────────────

/// A signal emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum TypeaheadEvent {
    /// The fetch-queue counter went 0 → 1: show the loading indicator.
    LoadingStarted,
    /// The fetch-queue counter returned to 0: hide the loading indicator.
    LoadingFinished,
    /// The displayed view was recomputed; render it.
    ViewChanged {
        /// The new render model.
        view: ResultView,
    },
    /// An authoritative (fetched) answer for the active key has zero items.
    NoResults {
        /// The key that resolved empty.
        key: QueryKey,
    },
    /// The active query is empty and empty-query fetching is disabled.
    EmptyQuery,
    /// A fetch settled with an error; the cache was left untouched.
    FetchFailed {
        /// The key the failed fetch was for.
        key: QueryKey,
        /// Stringified transport error.
        error: String,
    },
}

// ─── Sink ───────────────────────────────────────────────────────────────────

/// Consumer of controller signals.
///
/// The controller is single-threaded and cooperative, so sinks need no
/// synchronization; [`VecSink`] clones share a buffer through `Rc`.
pub trait EventSink {
    /// Deliver one event.
    fn emit(&mut self, event: &TypeaheadEvent);
}

/// Sink that drops every event. The default when none is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&mut self, _event: &TypeaheadEvent) {}
}

/// In-memory sink for tests and diagnostics.
///
/// Cloning yields a handle onto the same buffer, so a test can hand one
/// clone to the controller and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Rc<RefCell<Vec<TypeaheadEvent>>>,
}

impl VecSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<TypeaheadEvent> {
        self.events.borrow().clone()
    }

    /// Number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Count events matching a predicate.
    #[must_use]
    pub fn count_where(&self, predicate: impl Fn(&TypeaheadEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }

    /// Export all events as JSONL (one JSON object per line).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut output = String::new();
        for event in self.events.borrow().iter() {
            output.push_str(&serde_json::to_string(event)?);
            output.push('\n');
        }
        Ok(output)
    }
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &TypeaheadEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_collects_in_order() {
        let sink = VecSink::new();
        let mut handle = sink.clone();
        handle.emit(&TypeaheadEvent::LoadingStarted);
        handle.emit(&TypeaheadEvent::LoadingFinished);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TypeaheadEvent::LoadingStarted);
        assert_eq!(events[1], TypeaheadEvent::LoadingFinished);
    }

    #[test]
    fn count_where_filters() {
        let sink = VecSink::new();
        let mut handle = sink.clone();
        handle.emit(&TypeaheadEvent::LoadingStarted);
        handle.emit(&TypeaheadEvent::EmptyQuery);
        handle.emit(&TypeaheadEvent::LoadingStarted);
        assert_eq!(
            sink.count_where(|e| *e == TypeaheadEvent::LoadingStarted),
            2
        );
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.emit(&TypeaheadEvent::EmptyQuery);
        sink.emit(&TypeaheadEvent::LoadingStarted);
    }

    #[test]
    fn event_serde_uses_snake_case_tags() {
        let json = serde_json::to_string(&TypeaheadEvent::LoadingStarted).unwrap();
        assert!(json.contains("loading_started"));

        let json = serde_json::to_string(&TypeaheadEvent::NoResults {
            key: QueryKey::new("xyz"),
        })
        .unwrap();
        assert!(json.contains("no_results"));
        assert!(json.contains("xyz"));
    }

    #[test]
    fn to_jsonl_emits_one_line_per_event() {
        let sink = VecSink::new();
        let mut handle = sink.clone();
        handle.emit(&TypeaheadEvent::LoadingStarted);
        handle.emit(&TypeaheadEvent::EmptyQuery);

        let jsonl = sink.to_jsonl().unwrap();
        assert_eq!(jsonl.lines().count(), 2);
        for line in jsonl.lines() {
            let decoded: TypeaheadEvent = serde_json::from_str(line).unwrap();
            let _ = decoded;
        }
    }

    #[test]
    fn event_serde_roundtrip() {
        let event = TypeaheadEvent::FetchFailed {
            key: QueryKey::new("al"),
            error: "transport error: 503".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let decoded: TypeaheadEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
