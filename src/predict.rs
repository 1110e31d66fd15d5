//! Predictive prefix filtering.
//!
//! While the authoritative fetch for a key is pending, the controller can
//! often show a good provisional answer: find the longest strict prefix of
//! the key that has a cached result set, and re-filter that set locally with
//! the injected [`Matcher`]. Typing "albe" after "al" has resolved shows the
//! "al" results narrowed to those matching "albe", instantly.
//!
//! The output is best-effort only. It is never treated as authoritative and
//! is fully superseded once the exact fetch completes.

use tracing::trace;

use crate::cache::ResultCache;
use crate::normalize::QueryKey;
use crate::suggestion::{Matcher, Suggestion};

/// Provisional result set for `key`, synthesized from the longest cached
/// strict prefix.
///
/// Prefixes are scanned by character count, from `len - 1` down to 1; the
/// empty prefix is never consulted (filtering "everything" predicts nothing
/// useful). The scan stops at the *first* cached prefix: if filtering that
/// set leaves nothing, the answer is `None` rather than a shorter prefix's
/// guess. An empty provisional subset means "no usable prediction", never
/// "zero results" (only an authoritative fetch may assert zero).
///
/// Relative order and group labels of the cached set are preserved.
#[must_use]
pub fn predict(
    cache: &ResultCache,
    matcher: &dyn Matcher,
    key: &QueryKey,
) -> Option<Vec<Suggestion>> {
    let text = key.as_str();
    // Byte offset where each character starts; boundaries[n] is the end of
    // the n-character prefix.
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    for chars_kept in (1..boundaries.len()).rev() {
        let prefix = &text[..boundaries[chars_kept]];
        let Some(cached) = cache.get_str(prefix) else {
            continue;
        };
        let filtered: Vec<Suggestion> = cached
            .iter()
            .filter(|s| matcher.matches(key, s))
            .cloned()
            .collect();
        trace!(
            prefix_len = chars_kept,
            cached = cached.len(),
            filtered = filtered.len(),
            "predictive filter hit"
        );
        return if filtered.is_empty() {
            None
        } else {
            Some(filtered)
        };
    }
    None
}
