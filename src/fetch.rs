//! The injected remote-lookup capability.
//!
//! The controller never performs transport itself. When the debounce window
//! closes it hands the injected [`Fetcher`] a [`FetchTicket`] and the target
//! key; the embedding performs the lookup however it likes (HTTP, IPC, a
//! local index) and delivers the outcome back through
//! [`SearchController::resolve_fetch`](crate::SearchController::resolve_fetch)
//! with the same ticket. Tickets let the controller neutralize settlements
//! that arrive after a newer query has taken over.

use serde::{Deserialize, Serialize};

use crate::normalize::QueryKey;
use crate::suggestion::Suggestion;

// ─── Ticket ─────────────────────────────────────────────────────────────────

/// Identity of one dispatched fetch, monotonically increasing per controller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw ticket number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

// ─── Errors & replies ───────────────────────────────────────────────────────

/// Why a fetch settled without results.
///
/// Reported through the event channel, never thrown; the cache is left
/// untouched for the failed key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The transport itself failed (connection refused, 5xx, ...).
    #[error("transport error: {0}")]
    Transport(String),
    /// The transport gave up waiting.
    #[error("fetch timed out after {elapsed_ms}ms")]
    Timeout {
        /// How long the transport waited.
        elapsed_ms: u64,
    },
    /// The remote answered with something that could not be decoded.
    #[error("malformed payload: {detail}")]
    MalformedPayload {
        /// What was wrong with it.
        detail: String,
    },
}

/// One settlement of a dispatched fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchReply {
    /// A streaming partial answer. Updates the cache and the view but keeps
    /// the loading indicator on; a `Final` reply must follow.
    Provisional(Vec<Suggestion>),
    /// The terminal answer. Releases the ticket's loading-counter unit
    /// exactly once; later replies for the same ticket are ignored.
    Final(Result<Vec<Suggestion>, FetchError>),
}

// ─── Fetcher ────────────────────────────────────────────────────────────────

/// Capability that starts a remote lookup.
///
/// Implementations must not block: record or begin the request and return.
/// The controller guarantees at most one *logical* fetch at a time, but a
/// superseded request may still be unsettled when the next one is dispatched;
/// each settles independently via its ticket.
pub trait Fetcher {
    /// Begin a lookup for `key` identified by `ticket`.
    fn dispatch(&mut self, ticket: FetchTicket, key: &QueryKey);
}

/// Fetcher that drops every request.
///
/// Useful for purely local setups and tests that drive settlement by hand.
/// Note that a dropped request never settles, so the loading indicator stays
/// on until the embedding resolves the ticket itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFetcher;

impl Fetcher for NullFetcher {
    fn dispatch(&mut self, _ticket: FetchTicket, _key: &QueryKey) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_are_ordered_by_value() {
        let a = FetchTicket::new(1);
        let b = FetchTicket::new(2);
        assert!(a < b);
        assert_eq!(a.value(), 1);
    }

    #[test]
    fn fetch_error_messages_carry_detail() {
        assert_eq!(
            FetchError::Transport("503".into()).to_string(),
            "transport error: 503"
        );
        assert!(
            FetchError::Timeout { elapsed_ms: 800 }
                .to_string()
                .contains("800")
        );
        assert!(
            FetchError::MalformedPayload {
                detail: "not json".into()
            }
            .to_string()
            .contains("not json")
        );
    }

    #[test]
    fn null_fetcher_accepts_dispatches() {
        let mut fetcher = NullFetcher;
        fetcher.dispatch(FetchTicket::new(0), &QueryKey::new("a"));
    }
}
