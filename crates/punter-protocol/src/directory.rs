//! User directory: role filter, search, sort and status changes

use crate::error::{ProtocolError, ProtocolResult};
use crate::query::{Filter, Sort, SortKey, cmp_ignore_case, matches_search};
use punter_types::{ParseEnumError, Role, User, UserStatus};
use std::cmp::Ordering;
use std::str::FromStr;

const KIND: &str = "user";

/// Sort columns of the user list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    /// Full name
    Name,
    /// Email address
    Email,
    /// Username
    Username,
    /// Role
    Role,
    /// Account status
    Status,
    /// Signup time
    Joined,
    /// Wallet balance; accounts without a balance sort first
    Balance,
}

impl SortKey for UserSortKey {}

impl FromStr for UserSortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "username" => Ok(Self::Username),
            "role" => Ok(Self::Role),
            "status" => Ok(Self::Status),
            "joined" => Ok(Self::Joined),
            "balance" => Ok(Self::Balance),
            _ => Err(ParseEnumError {
                kind: "user sort key",
                value: s.to_string(),
                expected: "name, email, username, role, status, joined, balance",
            }),
        }
    }
}

impl UserSortKey {
    fn compare(self, a: &User, b: &User) -> Ordering {
        match self {
            Self::Name => cmp_ignore_case(&a.full_name(), &b.full_name()),
            Self::Email => cmp_ignore_case(&a.email, &b.email),
            Self::Username => cmp_ignore_case(&a.username, &b.username),
            Self::Role => a.role.as_str().cmp(b.role.as_str()),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::Joined => a.created_at.cmp(&b.created_at),
            Self::Balance => match (a.balance, b.balance) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (x, y) => x.is_some().cmp(&y.is_some()),
            },
        }
    }
}

/// Role filter, search text and sort for the user list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    /// Role filter
    pub role: Filter<Role>,
    /// Search over name, email, bio and username
    pub search: String,
    /// Sort column and direction
    pub sort: Sort<UserSortKey>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            role: Filter::All,
            search: String::new(),
            sort: Sort::by(UserSortKey::Name),
        }
    }
}

/// Status change produced by [`UserDirectory::prepare_status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// User id
    pub id: String,
    /// Status before the change
    pub previous: UserStatus,
    /// Requested status
    pub next: UserStatus,
}

impl StatusChange {
    /// Whether the change leaves the status as it was
    pub fn is_noop(&self) -> bool {
        self.previous == self.next
    }
}

/// Loaded user list with detail selection
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
    selected: Option<String>,
}

impl UserDirectory {
    /// Directory over users freshly loaded from the backend
    pub const fn new(users: Vec<User>) -> Self {
        Self {
            users,
            selected: None,
        }
    }

    /// All users in backend order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Look a user up by id
    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    /// Filtered, searched and stably sorted view
    pub fn list(&self, query: &UserQuery) -> Vec<&User> {
        let mut view: Vec<&User> = self
            .users
            .iter()
            .filter(|user| query.role.admits(&user.role))
            .filter(|user| {
                let name = user.full_name();
                matches_search(
                    &query.search,
                    [
                        name.as_str(),
                        user.email.as_str(),
                        user.bio.as_deref().unwrap_or_default(),
                        user.username.as_str(),
                    ],
                )
            })
            .collect();

        let Sort { key, direction } = query.sort;
        view.sort_by(|a, b| direction.apply(key.compare(a, b)));
        view
    }

    /// Open a user in the detail view
    pub fn open(&mut self, id: &str) -> ProtocolResult<&User> {
        let user = self
            .users
            .iter()
            .find(|user| user.id == id)
            .ok_or_else(|| ProtocolError::not_found(KIND, id))?;
        self.selected = Some(id.to_string());
        Ok(user)
    }

    /// Close the detail view
    pub fn close(&mut self) {
        self.selected = None;
    }

    /// User currently open in the detail view
    pub fn selected(&self) -> Option<&User> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Build a status change for `id`
    pub fn prepare_status(&self, id: &str, status: UserStatus) -> ProtocolResult<StatusChange> {
        let user = self
            .get(id)
            .ok_or_else(|| ProtocolError::not_found(KIND, id))?;
        Ok(StatusChange {
            id: id.to_string(),
            previous: user.status,
            next: status,
        })
    }

    /// Record a status change; the detail view stays open on the user
    pub fn apply_status(&mut self, change: &StatusChange) -> ProtocolResult<&User> {
        let user = self
            .users
            .iter_mut()
            .find(|user| user.id == change.id)
            .ok_or_else(|| ProtocolError::not_found(KIND, &change.id))?;
        user.status = change.next;
        Ok(user)
    }
}
