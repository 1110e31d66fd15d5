//! Query canonicalization.
//!
//! Raw keystrokes become a [`QueryKey`] before anything else looks at them:
//! the cache is keyed by it, the idempotent-resubmission guard compares it,
//! and the predictive filter walks its prefixes. The controller assumes only
//! that normalization is deterministic and idempotent, so embedding
//! applications may substitute their own [`QueryNormalizer`] (abbreviation
//! expansion, diacritic folding, ...) without touching anything else.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

// ─── Query Key ──────────────────────────────────────────────────────────────

/// Canonical form of a user-entered search string.
///
/// Produced by a [`QueryNormalizer`]; treat the inner string as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Wrap an already-normalized string.
    ///
    /// Callers outside a normalizer should prefer
    /// [`QueryNormalizer::normalize`].
    #[must_use]
    pub fn new(normalized: impl Into<String>) -> Self {
        Self(normalized.into())
    }

    /// The normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is the empty query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters (prefix scanning works in characters, not bytes).
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl Borrow<str> for QueryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Normalizer ─────────────────────────────────────────────────────────────

/// Trait for turning raw input into a [`QueryKey`].
///
/// # Contract
///
/// Total (never fails, any string input), deterministic, and idempotent:
/// `normalize(normalize(s)) == normalize(s)`.
pub trait QueryNormalizer {
    /// Canonicalize raw user input.
    fn normalize(&self, raw: &str) -> QueryKey;
}

/// Default normalization pipeline.
///
/// 1. NFC Unicode normalization,
/// 2. lowercasing,
/// 3. collapsing every whitespace run to a single ASCII space,
/// 4. trimming leading/trailing whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNormalizer;

impl QueryNormalizer for DefaultNormalizer {
    fn normalize(&self, raw: &str) -> QueryKey {
        let lowered = raw.nfc().collect::<String>().to_lowercase();
        let mut out = String::with_capacity(lowered.len());
        let mut pending_space = false;
        for ch in lowered.chars() {
            if ch.is_whitespace() {
                // Runs collapse to one space; leading runs drop entirely.
                pending_space = !out.is_empty();
            } else {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(ch);
            }
        }
        QueryKey(out)
    }
}
