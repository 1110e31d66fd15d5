//! Debounced, predictive-caching incremental search controller.
//!
//! `typeahead` is the engine behind a search-as-you-type box: feed it raw
//! keystrokes and it keeps an ordered, optionally grouped result view up to
//! date with minimal visible latency and minimal redundant network traffic.
//! It owns the hard part only: deciding, per keystroke, whether to serve a
//! cached answer, synthesize a provisional one by locally re-filtering a
//! cached answer for a shorter prefix, or schedule a debounced remote fetch,
//! while superseding stale in-flight work and keeping the loading indicator
//! honest. Transport, rendering, and key bindings stay with the embedding
//! application, injected as capabilities.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  Embedding application                           │
//! │  └─ input events, transport, rendering           │
//! ├──────────────────────────────────────────────────┤
//! │  typeahead (this crate)                          │
//! │  ├─ controller: dispatch state machine           │
//! │  ├─ normalize:  raw input → QueryKey             │
//! │  ├─ cache:      exact key → immutable results    │
//! │  ├─ predict:    longest-cached-prefix filtering  │
//! │  ├─ view:       grouped render model, selection  │
//! │  ├─ event:      lifecycle signals + sinks        │
//! │  ├─ fetch:      injected remote-lookup seam      │
//! │  └─ clock:      injectable time (test-friendly)  │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use typeahead::{FetchTicket, Fetcher, QueryKey, SearchController};
//!
//! // The embedding provides transport; this one answers inline.
//! struct StaticFetcher;
//! impl Fetcher for StaticFetcher {
//!     fn dispatch(&mut self, _ticket: FetchTicket, _key: &QueryKey) {}
//! }
//!
//! let mut controller = SearchController::builder()
//!     .fetcher(StaticFetcher)
//!     .build()
//!     .unwrap();
//!
//! controller.submit_query("al");
//! // ... later, once the transport answers:
//! // controller.resolve_fetch(ticket, FetchReply::Final(Ok(results)));
//! ```
//!
//! The controller is single-threaded and cooperative: all transitions happen
//! on the caller's thread, timers are driven by [`SearchController::poll`]
//! against the injected [`Clock`], and fetch settlements arrive through
//! [`SearchController::resolve_fetch`]. This keeps every code path, debounce
//! included, deterministic under test.

#![forbid(unsafe_code)]

pub mod cache;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod fetch;
pub mod normalize;
pub mod predict;
pub mod suggestion;
pub mod telemetry;
pub mod view;

// ─── Re-exports ─────────────────────────────────────────────────────────────

pub use cache::ResultCache;
pub use clock::{Clock, ManualClock, WallClock};
pub use config::{TypeaheadConfig, DEFAULT_DEBOUNCE_MS};
pub use controller::{DispatchPhase, SearchController, SearchControllerBuilder};
pub use error::{TypeaheadError, TypeaheadResult};
pub use event::{EventSink, NoopSink, TypeaheadEvent, VecSink};
pub use fetch::{FetchError, FetchReply, FetchTicket, Fetcher, NullFetcher};
pub use normalize::{DefaultNormalizer, QueryKey, QueryNormalizer};
pub use predict::predict;
pub use suggestion::{FieldGroupBy, GroupBy, Matcher, Suggestion, TokenSubstringMatcher};
pub use view::{ResultView, ViewRow, ViewSource};
