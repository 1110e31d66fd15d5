//! The query-dispatch and predictive-caching state machine.
//!
//! [`SearchController`] owns every collaborator (normalizer, matcher,
//! grouping, cache, clock, fetcher, event sink), assembled per instance by
//! [`SearchControllerBuilder`]. All transitions run on the caller's thread;
//! the only asynchronous boundary is the injected [`Fetcher`], whose
//! settlements the embedding delivers back through
//! [`resolve_fetch`](SearchController::resolve_fetch).
//!
//! # Dispatch life cycle
//!
//! ```text
//!                submit_query(raw)
//!                       │ normalize → key
//!          ┌────────────┼──────────────────────┐
//!          │ cache hit  │ needs fetch          │ empty key
//!          ▼            ▼                      ▼
//!        Idle       Scheduled ── poll() ──▶ InFlight ── resolve_fetch ──▶ Idle
//!                       │                      │
//!                       │ superseded:          │ superseded: settles later,
//!                       │ timer canceled,      │ counter released, display
//!                       │ counter released     │ untouched
//! ```
//!
//! Every state change that can affect what the user sees rebuilds the view
//! immediately (exact cache hit, or predictive filtering of the longest
//! cached prefix); the user never waits on the debounce timer to see *some*
//! view.
//!
//! # Counter symmetry
//!
//! The fetch-queue counter drives the loading indicator and nothing else.
//! One unit is acquired when a fetch is scheduled and released exactly once:
//! either when the schedule is canceled by a newer query, or when the
//! dispatched ticket settles with its final reply. Underflow is structurally
//! impossible; a debug assertion documents the invariant.

use std::collections::HashMap;
use std::mem;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::cache::ResultCache;
use crate::clock::{Clock, WallClock};
use crate::config::TypeaheadConfig;
use crate::error::TypeaheadResult;
use crate::event::{EventSink, NoopSink, TypeaheadEvent};
use crate::fetch::{FetchReply, FetchTicket, Fetcher, NullFetcher};
use crate::normalize::{DefaultNormalizer, QueryKey, QueryNormalizer};
use crate::predict::predict;
use crate::suggestion::{FieldGroupBy, GroupBy, Matcher, Suggestion, TokenSubstringMatcher};
use crate::view::{ResultView, ViewSource};

// ─── State ──────────────────────────────────────────────────────────────────

/// Internal dispatch state.
#[derive(Debug)]
enum DispatchState {
    /// Nothing scheduled or logically in flight.
    Idle,
    /// A fetch for `key` fires once the deadline passes.
    Scheduled { key: QueryKey, deadline: Instant },
    /// A fetch for `key` was dispatched and has not settled.
    InFlight { key: QueryKey, ticket: FetchTicket },
}

/// Externally observable dispatch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    /// No pending work.
    Idle,
    /// A debounce timer is armed.
    Scheduled,
    /// A fetch is logically in flight.
    InFlight,
}

// ─── Builder ────────────────────────────────────────────────────────────────

/// Assembles a [`SearchController`] with its collaborators.
///
/// Every collaborator has a default (wall clock, default normalizer and
/// matcher, no-op sink, null fetcher), so the minimal setup is just a
/// fetcher:
///
/// ```
/// use typeahead::{NullFetcher, SearchController};
///
/// let controller = SearchController::builder()
///     .fetcher(NullFetcher)
///     .build()
///     .expect("default config is valid");
/// assert!(controller.view().is_empty());
/// ```
pub struct SearchControllerBuilder {
    config: TypeaheadConfig,
    normalizer: Box<dyn QueryNormalizer>,
    matcher: Box<dyn Matcher>,
    group_by: Box<dyn GroupBy>,
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
    fetcher: Box<dyn Fetcher>,
}

impl SearchControllerBuilder {
    fn new() -> Self {
        Self {
            config: TypeaheadConfig::default(),
            normalizer: Box::new(DefaultNormalizer),
            matcher: Box::new(TokenSubstringMatcher),
            group_by: Box::new(FieldGroupBy),
            clock: Box::new(WallClock),
            sink: Box::new(NoopSink),
            fetcher: Box::new(NullFetcher),
        }
    }

    /// Set the configuration.
    #[must_use]
    pub fn config(mut self, config: TypeaheadConfig) -> Self {
        self.config = config;
        self
    }

    /// Substitute the query normalizer.
    #[must_use]
    pub fn normalizer(mut self, normalizer: impl QueryNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Substitute the predictive-filter match predicate.
    #[must_use]
    pub fn matcher(mut self, matcher: impl Matcher + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Substitute the grouping function.
    #[must_use]
    pub fn group_by(mut self, group_by: impl GroupBy + 'static) -> Self {
        self.group_by = Box::new(group_by);
        self
    }

    /// Substitute the time source.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Set the event sink signals are delivered to.
    #[must_use]
    pub fn sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Set the remote-fetch capability.
    #[must_use]
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Validate the configuration and construct the controller.
    ///
    /// # Errors
    ///
    /// Returns [`TypeaheadError::InvalidConfig`](crate::TypeaheadError) if
    /// the configuration fails validation.
    pub fn build(self) -> TypeaheadResult<SearchController> {
        self.config.validate()?;
        Ok(SearchController {
            config: self.config,
            normalizer: self.normalizer,
            matcher: self.matcher,
            group_by: self.group_by,
            clock: self.clock,
            sink: self.sink,
            fetcher: self.fetcher,
            cache: ResultCache::new(),
            state: DispatchState::Idle,
            outstanding: HashMap::new(),
            fetch_queue: 0,
            next_ticket: 0,
            last_key: None,
            view: ResultView::unresolved(QueryKey::new("")),
        })
    }
}

// ─── Controller ─────────────────────────────────────────────────────────────

/// Incremental-search controller: one instance per UI surface, living for
/// the surface's lifetime.
pub struct SearchController {
    config: TypeaheadConfig,
    normalizer: Box<dyn QueryNormalizer>,
    matcher: Box<dyn Matcher>,
    group_by: Box<dyn GroupBy>,
    clock: Box<dyn Clock>,
    sink: Box<dyn EventSink>,
    fetcher: Box<dyn Fetcher>,

    cache: ResultCache,
    state: DispatchState,
    /// Dispatched-but-unsettled tickets, including superseded ones. Each
    /// entry holds exactly one fetch-queue counter unit.
    outstanding: HashMap<FetchTicket, QueryKey>,
    /// Counter behind the loading indicator. Never negative.
    fetch_queue: usize,
    next_ticket: u64,
    /// Idempotent-resubmission guard: the last *submitted* key.
    last_key: Option<QueryKey>,
    view: ResultView,
}

impl SearchController {
    /// Start assembling a controller.
    #[must_use]
    pub fn builder() -> SearchControllerBuilder {
        SearchControllerBuilder::new()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Feed the current contents of the input field.
    ///
    /// Normalizes `raw`, short-circuits if the key is unchanged, reschedules
    /// or cancels the debounced fetch as needed, and immediately recomputes
    /// the displayed view from the cache or the predictive filter.
    pub fn submit_query(&mut self, raw: &str) {
        let key = self.normalizer.normalize(raw);
        if self.last_key.as_ref() == Some(&key) {
            trace!(query_len = key.char_len(), "resubmission of active key ignored");
            return;
        }
        self.last_key = Some(key.clone());

        // A timer armed for the previous key never fires.
        if matches!(self.state, DispatchState::Scheduled { .. }) {
            self.state = DispatchState::Idle;
            self.release_counter_unit();
        }

        let cache_hit = self.config.cache_enabled && self.cache.contains(&key);
        if cache_hit {
            debug!(query_len = key.char_len(), "exact cache hit");
            self.state = DispatchState::Idle;
        } else if !key.is_empty() || self.config.fetch_empty_query {
            self.acquire_counter_unit();
            let deadline = self.clock.now() + self.config.debounce;
            debug!(
                query_len = key.char_len(),
                debounce_ms = self.config.debounce.as_millis() as u64,
                "fetch scheduled"
            );
            self.state = DispatchState::Scheduled {
                key: key.clone(),
                deadline,
            };
            if self.config.debounce.is_zero() {
                self.fire_scheduled();
            }
        } else {
            self.state = DispatchState::Idle;
            self.emit(TypeaheadEvent::EmptyQuery);
        }

        self.rebuild_view();
        self.debug_check_counter();
    }

    /// Drive the debounce timer.
    ///
    /// Call whenever the embedding's event loop ticks (or once after
    /// [`time_until_fire`](Self::time_until_fire) elapses). Dispatches the
    /// scheduled fetch if its quiet period has passed; returns whether a
    /// fetch was dispatched.
    pub fn poll(&mut self) -> bool {
        let due = match &self.state {
            DispatchState::Scheduled { deadline, .. } => self.clock.now() >= *deadline,
            _ => false,
        };
        if due {
            self.fire_scheduled();
        }
        due
    }

    /// Deliver the settlement of a dispatched fetch.
    ///
    /// Results are always cached under the *fetch's own* key, so a stale
    /// settlement is still a valid cache write; it releases its counter unit
    /// and the view is recomputed from the active key, which a stale key can
    /// never overwrite. Unknown or already-settled tickets are ignored.
    pub fn resolve_fetch(&mut self, ticket: FetchTicket, reply: FetchReply) {
        let Some(key) = self.outstanding.get(&ticket).cloned() else {
            debug!(ticket = ticket.value(), "settlement for unknown ticket ignored");
            return;
        };
        match reply {
            FetchReply::Provisional(results) => {
                debug!(
                    ticket = ticket.value(),
                    result_count = results.len(),
                    "provisional results"
                );
                self.cache.put(key, results);
                self.rebuild_view();
            }
            FetchReply::Final(outcome) => {
                self.outstanding.remove(&ticket);
                if matches!(&self.state, DispatchState::InFlight { ticket: t, .. } if *t == ticket)
                {
                    self.state = DispatchState::Idle;
                }
                match outcome {
                    Ok(results) => {
                        debug!(
                            ticket = ticket.value(),
                            result_count = results.len(),
                            "fetch completed"
                        );
                        self.cache.put(key, results);
                    }
                    Err(error) => {
                        warn!(ticket = ticket.value(), %error, "fetch failed");
                        self.emit(TypeaheadEvent::FetchFailed {
                            key,
                            error: error.to_string(),
                        });
                    }
                }
                self.release_counter_unit();
                self.rebuild_view();
            }
        }
        self.debug_check_counter();
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Move the selection one visible item down (clamps at the end).
    pub fn select_next(&mut self) {
        if self.view.select_next() {
            let view = self.view.clone();
            self.emit(TypeaheadEvent::ViewChanged { view });
        }
    }

    /// Move the selection one visible item up (clamps at the start).
    pub fn select_prev(&mut self) {
        if self.view.select_prev() {
            let view = self.view.clone();
            self.emit(TypeaheadEvent::ViewChanged { view });
        }
    }

    /// The currently selected suggestion, if the view has one.
    #[must_use]
    pub fn confirm(&self) -> Option<&Suggestion> {
        self.view.selected_suggestion()
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The currently displayed view.
    #[must_use]
    pub fn view(&self) -> &ResultView {
        &self.view
    }

    /// Current dispatch phase.
    #[must_use]
    pub fn phase(&self) -> DispatchPhase {
        match self.state {
            DispatchState::Idle => DispatchPhase::Idle,
            DispatchState::Scheduled { .. } => DispatchPhase::Scheduled,
            DispatchState::InFlight { .. } => DispatchPhase::InFlight,
        }
    }

    /// Number of logically outstanding fetches (scheduled or unsettled).
    #[must_use]
    pub fn pending_fetches(&self) -> usize {
        self.fetch_queue
    }

    /// Whether the loading indicator should currently show.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.fetch_queue > 0
    }

    /// Time remaining until the armed debounce timer fires, if one is armed.
    /// Zero means the next [`poll`](Self::poll) dispatches.
    #[must_use]
    pub fn time_until_fire(&self) -> Option<Duration> {
        match &self.state {
            DispatchState::Scheduled { deadline, .. } => {
                Some(deadline.saturating_duration_since(self.clock.now()))
            }
            _ => None,
        }
    }

    /// The result cache (diagnostics and tests).
    #[must_use]
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn fire_scheduled(&mut self) {
        let key = match mem::replace(&mut self.state, DispatchState::Idle) {
            DispatchState::Scheduled { key, .. } => key,
            other => {
                self.state = other;
                return;
            }
        };
        let ticket = FetchTicket::new(self.next_ticket);
        self.next_ticket += 1;
        self.outstanding.insert(ticket, key.clone());
        self.state = DispatchState::InFlight {
            key: key.clone(),
            ticket,
        };
        debug!(
            ticket = ticket.value(),
            query_len = key.char_len(),
            "fetch dispatched"
        );
        self.fetcher.dispatch(ticket, &key);
    }

    /// Recompute the displayed view for the active key and emit it.
    fn rebuild_view(&mut self) {
        let Some(key) = self.last_key.clone() else {
            return;
        };
        let cached = if self.config.cache_enabled {
            self.cache.get(&key)
        } else {
            None
        };
        let view = if let Some(results) = cached {
            ResultView::build(
                key,
                ViewSource::Authoritative,
                &results,
                self.group_by.as_ref(),
                self.config.limit,
                self.config.auto_select_index,
            )
        } else if self.config.cache_enabled {
            match predict(&self.cache, self.matcher.as_ref(), &key) {
                Some(predicted) => ResultView::build(
                    key,
                    ViewSource::Predicted,
                    &predicted,
                    self.group_by.as_ref(),
                    self.config.limit,
                    self.config.auto_select_index,
                ),
                None => ResultView::unresolved(key),
            }
        } else {
            ResultView::unresolved(key)
        };

        let authoritative_empty =
            view.source == ViewSource::Authoritative && view.is_empty();
        let key = view.key.clone();
        self.view = view.clone();
        self.emit(TypeaheadEvent::ViewChanged { view });
        if authoritative_empty {
            self.emit(TypeaheadEvent::NoResults { key });
        }
    }

    fn acquire_counter_unit(&mut self) {
        self.fetch_queue += 1;
        if self.fetch_queue == 1 {
            self.emit(TypeaheadEvent::LoadingStarted);
        }
    }

    fn release_counter_unit(&mut self) {
        debug_assert!(self.fetch_queue > 0, "fetch-queue counter underflow");
        self.fetch_queue = self.fetch_queue.saturating_sub(1);
        if self.fetch_queue == 0 {
            self.emit(TypeaheadEvent::LoadingFinished);
        }
    }

    fn emit(&mut self, event: TypeaheadEvent) {
        self.sink.emit(&event);
    }

    fn debug_check_counter(&self) {
        let scheduled = usize::from(matches!(self.state, DispatchState::Scheduled { .. }));
        debug_assert_eq!(
            self.fetch_queue,
            self.outstanding.len() + scheduled,
            "every counter unit must be held by a schedule or an unsettled ticket"
        );
    }
}
