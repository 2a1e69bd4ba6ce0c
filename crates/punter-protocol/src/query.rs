//! Filter, search and sort building blocks shared by every list view

use punter_types::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Exact-match filter over an enum, or no filter at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter<T> {
    /// Keep everything
    #[default]
    All,
    /// Keep only records whose value equals this one
    Only(T),
}

impl<T: PartialEq> Filter<T> {
    /// Whether a record with this value passes the filter
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }
}

impl<T> FromStr for Filter<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(value) => value.fmt(f),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl SortDirection {
    /// The opposite direction
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison result
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(ParseEnumError {
                kind: "sort direction",
                value: s.to_string(),
                expected: "asc, desc",
            }),
        }
    }
}

/// A column a list can be sorted by
pub trait SortKey: Copy + Eq {
    /// Direction chosen when the operator first selects this key
    fn default_direction(self) -> SortDirection {
        SortDirection::Ascending
    }
}

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K> {
    /// Column
    pub key: K,
    /// Direction
    pub direction: SortDirection,
}

impl<K: SortKey> Sort<K> {
    /// Sort by `key` in its default direction
    pub fn by(key: K) -> Self {
        Self {
            key,
            direction: key.default_direction(),
        }
    }

    /// Header-click behaviour: the active key flips direction, any other key
    /// becomes active in its default direction
    #[must_use]
    pub fn toggle(self, key: K) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.toggled(),
            }
        } else {
            Self::by(key)
        }
    }
}

/// Case-insensitive substring search across a record's text fields.
///
/// An empty (or whitespace-only) query matches everything.
pub fn matches_search<'a, I>(query: &str, fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Compare two strings ignoring case
pub(crate) fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
