//! Result items and the injectable matching/grouping seams.
//!
//! A [`Suggestion`] is opaque to the dispatch machinery; only the injected
//! [`Matcher`] and [`GroupBy`] implementations interpret its fields. The
//! defaults cover the common case: token-wise substring matching over the
//! textual fields, grouping by the `group` field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalize::QueryKey;

// ─── Suggestion ─────────────────────────────────────────────────────────────

/// One result item returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Unique identifier (caller-defined).
    pub id: String,
    /// Primary display text.
    pub title: String,
    /// Optional secondary display text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Optional group label; items sharing a label render under one heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Extensible key-value metadata, matched against by the default matcher.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl Suggestion {
    /// Create a suggestion with the required fields.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            group: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the secondary text.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Set the group label.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Add a metadata key-value pair.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ─── Matcher ────────────────────────────────────────────────────────────────

/// Predicate deciding whether a cached suggestion still matches a longer
/// query.
///
/// Used only by the predictive filter; override it to mirror the remote
/// service's own matching logic as closely as possible.
pub trait Matcher {
    /// Whether `suggestion` should appear in a provisional view for `key`.
    fn matches(&self, key: &QueryKey, suggestion: &Suggestion) -> bool;
}

/// Default matcher: case-insensitive, whitespace-tokenized substring
/// containment. Every token of the key must occur in at least one textual
/// field (title, subtitle, or a metadata value).
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSubstringMatcher;

impl Matcher for TokenSubstringMatcher {
    fn matches(&self, key: &QueryKey, suggestion: &Suggestion) -> bool {
        let title = suggestion.title.to_lowercase();
        let subtitle = suggestion.subtitle.as_deref().map(str::to_lowercase);
        key.as_str().split_whitespace().all(|token| {
            title.contains(token)
                || subtitle.as_deref().is_some_and(|s| s.contains(token))
                || suggestion
                    .metadata
                    .values()
                    .any(|v| v.to_lowercase().contains(token))
        })
    }
}

// ─── Grouping ───────────────────────────────────────────────────────────────

/// Maps a suggestion to its group heading, if any.
pub trait GroupBy {
    /// The group label `suggestion` renders under; `None` renders flat.
    fn group_of(&self, suggestion: &Suggestion) -> Option<String>;
}

/// Default grouping: read the suggestion's own `group` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldGroupBy;

impl GroupBy for FieldGroupBy {
    fn group_of(&self, suggestion: &Suggestion) -> Option<String> {
        suggestion.group.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{DefaultNormalizer, QueryNormalizer};

    fn key(s: &str) -> QueryKey {
        DefaultNormalizer.normalize(s)
    }

    #[test]
    fn every_token_must_match_somewhere() {
        let matcher = TokenSubstringMatcher;
        let alex = Suggestion::new("1", "Alex");
        let bret = Suggestion::new("2", "Bret");
        let albert = Suggestion::new("3", "Albert");

        assert!(matcher.matches(&key("a"), &alex));
        assert!(!matcher.matches(&key("b"), &alex));
        assert!(!matcher.matches(&key("a b"), &alex));

        assert!(!matcher.matches(&key("a"), &bret));
        assert!(matcher.matches(&key("b"), &bret));
        assert!(!matcher.matches(&key("a b"), &bret));

        assert!(matcher.matches(&key("a"), &albert));
        assert!(matcher.matches(&key("b"), &albert));
        assert!(matcher.matches(&key("a b"), &albert));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let matcher = TokenSubstringMatcher;
        let hit = Suggestion::new("1", "ALEX");
        assert!(matcher.matches(&key("alex"), &hit));
    }

    #[test]
    fn subtitle_and_metadata_are_searched() {
        let matcher = TokenSubstringMatcher;
        let hit = Suggestion::new("1", "Profile")
            .with_subtitle("Alex Johnson")
            .with_metadata("team", "Platform");
        assert!(matcher.matches(&key("johnson"), &hit));
        assert!(matcher.matches(&key("platform"), &hit));
        assert!(!matcher.matches(&key("zebra"), &hit));
    }

    #[test]
    fn empty_key_matches_everything() {
        let matcher = TokenSubstringMatcher;
        let hit = Suggestion::new("1", "anything");
        assert!(matcher.matches(&key(""), &hit));
    }

    #[test]
    fn field_group_by_reads_group_field() {
        let grouper = FieldGroupBy;
        let grouped = Suggestion::new("1", "a").with_group("People");
        let flat = Suggestion::new("2", "b");
        assert_eq!(grouper.group_of(&grouped), Some("People".into()));
        assert_eq!(grouper.group_of(&flat), None);
    }

    #[test]
    fn suggestion_serde_roundtrip() {
        let hit = Suggestion::new("42", "Alex")
            .with_subtitle("Engineer")
            .with_group("People")
            .with_metadata("team", "Search");
        let json = serde_json::to_string(&hit).unwrap();
        let decoded: Suggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, hit);
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&Suggestion::new("1", "Alex")).unwrap();
        assert!(!json.contains("subtitle"));
        assert!(!json.contains("group"));
        assert!(!json.contains("metadata"));
    }
}
