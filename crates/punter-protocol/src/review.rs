//! Pending → decided review workflow shared by KYC and transaction review
//!
//! A [`ReviewBoard`] owns the list loaded from the backend and the item
//! currently open in the detail view. Deciding an item is split in two:
//! [`ReviewBoard::prepare`] checks the item is still pending and produces a
//! [`ReviewCommand`] for the backend, and [`ReviewBoard::apply`] patches the
//! local list once the backend has accepted it. A failed backend call
//! therefore never leaves the list half-updated.

use crate::error::{ProtocolError, ProtocolResult};
use crate::query::{Filter, Sort, SortKey, matches_search};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Operator verdict on a pending item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Approve the KYC request / complete the transaction
    Approve,
    /// Reject the KYC request / fail the transaction
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approve => f.write_str("approve"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// A record that moves out of `pending` exactly once
pub trait Reviewable {
    /// Status enum of the record
    type Status: Copy + Eq + fmt::Display + fmt::Debug;
    /// Columns the list can be sorted by
    type SortKey: SortKey;

    /// Human readable record kind used in errors and logs
    const KIND: &'static str;

    /// Backend id
    fn id(&self) -> &str;

    /// Id of the account that owns the record, when the backend needs it
    fn owner(&self) -> Option<&str> {
        None
    }

    /// Current status
    fn status(&self) -> Self::Status;

    /// Overwrite the status
    fn set_status(&mut self, status: Self::Status);

    /// Whether the record still awaits a decision
    fn is_pending(&self) -> bool;

    /// Terminal status a decision leads to
    fn outcome(decision: Decision) -> Self::Status;

    /// Text fields covered by free-text search
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Ascending comparison on a sort column
    fn compare(&self, other: &Self, key: Self::SortKey) -> Ordering;
}

/// Status filter, free-text search and optional sort for a review list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery<S, K> {
    /// Status filter
    pub status: Filter<S>,
    /// Free-text search; empty matches everything
    pub search: String,
    /// Sort; `None` keeps backend order
    pub sort: Option<Sort<K>>,
}

impl<S, K> Default for ReviewQuery<S, K> {
    fn default() -> Self {
        Self {
            status: Filter::All,
            search: String::new(),
            sort: None,
        }
    }
}

impl<S, K> ReviewQuery<S, K> {
    /// Restrict to one status
    #[must_use]
    pub fn with_status(mut self, status: Filter<S>) -> Self {
        self.status = status;
        self
    }

    /// Set the search text
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the sort
    #[must_use]
    pub fn with_sort(mut self, sort: Sort<K>) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Status change to send to the backend, produced by [`ReviewBoard::prepare`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommand<S> {
    /// Record id
    pub id: String,
    /// Owning account, forwarded for KYC verification
    pub owner: Option<String>,
    /// Operator verdict
    pub decision: Decision,
    /// Status the record had when the command was prepared
    pub previous: S,
    /// Status the record moves to
    pub next: S,
}

/// In-memory review list with detail selection
#[derive(Debug, Clone)]
pub struct ReviewBoard<T> {
    items: Vec<T>,
    selected: Option<String>,
}

impl<T> Default for ReviewBoard<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
        }
    }
}

impl<T: Reviewable> ReviewBoard<T> {
    /// Board over records freshly loaded from the backend
    pub const fn new(items: Vec<T>) -> Self {
        Self {
            items,
            selected: None,
        }
    }

    /// Replace the list (e.g. after a reload); the selection is dropped
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected = None;
    }

    /// All records in backend order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Look a record up by id
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Number of records with the given status
    pub fn count(&self, status: T::Status) -> usize {
        self.items
            .iter()
            .filter(|item| item.status() == status)
            .count()
    }

    /// Filtered, searched and sorted view of the list.
    ///
    /// The sort is stable: records with equal keys keep backend order.
    pub fn list(&self, query: &ReviewQuery<T::Status, T::SortKey>) -> Vec<&T> {
        let mut view: Vec<&T> = self
            .items
            .iter()
            .filter(|item| query.status.admits(&item.status()))
            .filter(|item| {
                let fields = item.search_fields();
                matches_search(&query.search, fields.iter().map(|field| &**field))
            })
            .collect();

        if let Some(sort) = query.sort {
            view.sort_by(|a, b| sort.direction.apply(a.compare(b, sort.key)));
        }
        view
    }

    /// Open a record in the detail view
    pub fn open(&mut self, id: &str) -> ProtocolResult<&T> {
        let item = self
            .items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| ProtocolError::not_found(T::KIND, id))?;
        self.selected = Some(id.to_string());
        Ok(item)
    }

    /// Close the detail view
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Record currently open in the detail view
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Check that `id` can be decided and build the backend command.
    ///
    /// Only pending records can be decided; anything else is rejected with
    /// [`ProtocolError::NotPending`] and the board is left untouched.
    pub fn prepare(&self, id: &str, decision: Decision) -> ProtocolResult<ReviewCommand<T::Status>> {
        let item = self
            .get(id)
            .ok_or_else(|| ProtocolError::not_found(T::KIND, id))?;

        if !item.is_pending() {
            return Err(ProtocolError::NotPending {
                kind: T::KIND,
                id: id.to_string(),
                status: item.status().to_string(),
            });
        }

        Ok(ReviewCommand {
            id: id.to_string(),
            owner: item.owner().map(str::to_string),
            decision,
            previous: item.status(),
            next: T::outcome(decision),
        })
    }

    /// Record a decision the backend has accepted.
    ///
    /// Patches only the targeted record and closes the detail view. A command
    /// whose record has moved on since it was prepared is rejected with
    /// [`ProtocolError::NotPending`], so a decided record keeps its status.
    pub fn apply(&mut self, command: &ReviewCommand<T::Status>) -> ProtocolResult<&T> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == command.id)
            .ok_or_else(|| ProtocolError::not_found(T::KIND, &command.id))?;

        if !item.is_pending() || item.status() != command.previous {
            return Err(ProtocolError::NotPending {
                kind: T::KIND,
                id: command.id.clone(),
                status: item.status().to_string(),
            });
        }

        item.set_status(command.next);
        self.selected = None;
        Ok(item)
    }
}
