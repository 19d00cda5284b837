//! Owning principal of an application

use std::fmt;

/// Identity that owns applications: a registered user or a guest placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    User(i64),
    Guest(i64),
}

impl Owner {
    /// `(user_id, guest_id)` column values; exactly one is set.
    pub fn columns(self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::User(id) => (Some(id), None),
            Self::Guest(id) => (None, Some(id)),
        }
    }

    /// Rebuild an owner from stored columns.
    pub fn from_columns(user_id: Option<i64>, guest_id: Option<i64>) -> Option<Self> {
        match (user_id, guest_id) {
            (Some(id), None) => Some(Self::User(id)),
            (None, Some(id)) => Some(Self::Guest(id)),
            _ => None,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{}", id),
            Self::Guest(id) => write!(f, "guest:{}", id),
        }
    }
}
