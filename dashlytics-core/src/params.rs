//! Request parameters derived from view state
//!
//! A `RequestParameters` value is an immutable snapshot of
//! `(limit, sort_field, sort_order)`. Controllers rebuild it on every state
//! change and compare snapshots to decide whether a new fetch is needed.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::Debug;

/// Direction of a client-side (and, where supported, server-side) sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Query-string form: `asc` / `desc`.
    pub fn as_wire(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// Accepts the wire form and the long names, case-insensitively.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortOrder::Ascending),
            "desc" | "descending" => Some(SortOrder::Descending),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    /// Orients an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// A sortable field of one view's records.
pub trait SortField: Copy + Eq + Debug + Send + Sync + 'static {
    /// Every field the view allows, in display order.
    fn all() -> &'static [Self];

    /// Name used on the wire and in console commands.
    fn wire_name(self) -> &'static str;

    fn from_wire(s: &str) -> Option<Self> {
        let needle = s.trim();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.wire_name().eq_ignore_ascii_case(needle))
    }

    /// Unknown names fall back to `fallback` (normally the view default).
    fn parse_or(s: &str, fallback: Self) -> Self {
        Self::from_wire(s).unwrap_or(fallback)
    }
}

/// Coerces a user-supplied limit into `[1, u32::MAX]`.
pub fn clamp_limit(limit: i64) -> u32 {
    limit.clamp(1, i64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestParameters<F> {
    limit: u32,
    sort_field: F,
    sort_order: SortOrder,
}

impl<F: SortField> RequestParameters<F> {
    /// Values of `limit` at or below zero become 1.
    pub fn new(limit: i64, sort_field: F, sort_order: SortOrder) -> Self {
        Self {
            limit: clamp_limit(limit),
            sort_field,
            sort_order,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn sort_field(&self) -> F {
        self.sort_field
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn with_limit(self, limit: i64) -> Self {
        Self {
            limit: clamp_limit(limit),
            ..self
        }
    }

    pub fn with_sort_field(self, sort_field: F) -> Self {
        Self { sort_field, ..self }
    }

    pub fn with_sort_order(self, sort_order: SortOrder) -> Self {
        Self { sort_order, ..self }
    }
}
