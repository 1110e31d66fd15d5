//! Render model: the ordered, optionally grouped view handed to the
//! embedding's render sink, plus selection movement over it.
//!
//! A view is rebuilt from scratch after every state change that can affect
//! what the user sees; the selection index is re-derived on each rebuild and
//! never persisted across rebuilds.

use serde::{Deserialize, Serialize};

use crate::normalize::QueryKey;
use crate::suggestion::{GroupBy, Suggestion};

// ─── Rows ───────────────────────────────────────────────────────────────────

/// One rendered line of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "row")]
pub enum ViewRow {
    /// A group heading. Not selectable.
    Label {
        /// Heading text.
        text: String,
    },
    /// A selectable result item.
    Item {
        /// The suggestion to render.
        suggestion: Suggestion,
    },
}

/// Where the view's items came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSource {
    /// Exact cache entry written by a completed fetch. An authoritative view
    /// with zero items genuinely means "no results".
    Authoritative,
    /// Synthesized by the predictive filter; best-effort, superseded by the
    /// next authoritative rebuild.
    Predicted,
    /// Nothing usable yet (no cache entry, no viable prediction).
    Unresolved,
}

// ─── Result View ────────────────────────────────────────────────────────────

/// The complete render model for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultView {
    /// The query this view answers.
    pub key: QueryKey,
    /// Provenance of the items.
    pub source: ViewSource,
    /// Ordered rows: flat items first, then each group heading followed by
    /// its members, all preserving the input order.
    pub rows: Vec<ViewRow>,
    /// Selection index over the selectable items (labels excluded), or
    /// `None` when the view has no items.
    pub selected: Option<usize>,
    /// Whether a non-zero `limit` cut items off.
    pub truncated: bool,
}

impl ResultView {
    /// An empty view for `key` with nothing usable to show.
    #[must_use]
    pub fn unresolved(key: QueryKey) -> Self {
        Self {
            key,
            source: ViewSource::Unresolved,
            rows: Vec::new(),
            selected: None,
            truncated: false,
        }
    }

    /// Build a view from an ordered result set.
    ///
    /// Ungrouped items render flat and first; grouped items follow under
    /// their headings in first-appearance order. `limit` bounds the item
    /// count (`0` = unlimited); headings never count toward it. The initial
    /// selection is `auto_select_index` clamped to the visible items.
    #[must_use]
    pub fn build(
        key: QueryKey,
        source: ViewSource,
        items: &[Suggestion],
        group_by: &dyn GroupBy,
        limit: usize,
        auto_select_index: usize,
    ) -> Self {
        let mut flat: Vec<Suggestion> = Vec::new();
        let mut groups: Vec<(String, Vec<Suggestion>)> = Vec::new();
        for item in items {
            match group_by.group_of(item) {
                None => flat.push(item.clone()),
                Some(label) => {
                    if let Some((_, members)) = groups.iter_mut().find(|(l, _)| *l == label) {
                        members.push(item.clone());
                    } else {
                        groups.push((label, vec![item.clone()]));
                    }
                }
            }
        }

        let cap = if limit == 0 { usize::MAX } else { limit };
        let mut rows = Vec::new();
        let mut count = 0usize;
        for suggestion in flat {
            if count == cap {
                break;
            }
            rows.push(ViewRow::Item { suggestion });
            count += 1;
        }
        'groups: for (text, members) in groups {
            if count == cap {
                break;
            }
            rows.push(ViewRow::Label { text });
            for suggestion in members {
                if count == cap {
                    break 'groups;
                }
                rows.push(ViewRow::Item { suggestion });
                count += 1;
            }
        }

        let selected = if count == 0 {
            None
        } else {
            Some(auto_select_index.min(count - 1))
        };
        Self {
            key,
            source,
            rows,
            selected,
            truncated: limit != 0 && items.len() > limit,
        }
    }

    /// Number of selectable items (labels excluded).
    #[must_use]
    pub fn selectable_len(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, ViewRow::Item { .. }))
            .count()
    }

    /// Whether the view shows no items at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selectable_len() == 0
    }

    /// The currently selected suggestion, if any.
    #[must_use]
    pub fn selected_suggestion(&self) -> Option<&Suggestion> {
        let index = self.selected?;
        self.rows
            .iter()
            .filter_map(|row| match row {
                ViewRow::Item { suggestion } => Some(suggestion),
                ViewRow::Label { .. } => None,
            })
            .nth(index)
    }

    /// Move the selection one item down, clamping at the last item.
    /// Returns whether the index changed.
    pub(crate) fn select_next(&mut self) -> bool {
        let len = self.selectable_len();
        if len == 0 {
            return false;
        }
        let current = self.selected.unwrap_or(0);
        let next = (current + 1).min(len - 1);
        self.selected = Some(next);
        next != current
    }

    /// Move the selection one item up, clamping at the first item.
    /// Returns whether the index changed.
    pub(crate) fn select_prev(&mut self) -> bool {
        let len = self.selectable_len();
        if len == 0 {
            return false;
        }
        let current = self.selected.unwrap_or(0);
        let prev = current.saturating_sub(1);
        self.selected = Some(prev);
        prev != current
    }
}
