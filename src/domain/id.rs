//! Identifiers for lists, statuses and tasks
//!
//! IDs are opaque strings. Documents written by older versions carry ids such
//! as `list-default`, `todo` or `task-3-buy-milk`, so no format is enforced
//! beyond "non-empty". Freshly minted ids look like:
//! - List IDs: `list-{7-char-hash}` (e.g., `list-7f2b4c1`)
//! - Status IDs: `status-{7-char-hash}` (e.g., `status-9d3e5f2`)
//! - Task IDs: `t-{7-char-hash}` (e.g., `t-04ac9e1`)
//!
//! Hash is derived from a seed (name, label or text), the creation timestamp
//! and a per-mint counter. A candidate that collides with an id currently in
//! scope is re-rolled. Deleted ids are not tracked; the timestamp and counter
//! make handing one out again unlikely, not impossible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid {kind} ID: ids must not be empty")]
    Empty { kind: &'static str },
}

/// Generates a 7-character hash from a seed, timestamp and nonce
fn generate_hash(seed: &str, timestamp: DateTime<Utc>, nonce: u64) -> String {
    let input = format!(
        "{}{}{}",
        seed,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Returns the id as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Wraps a string the caller has already checked is not blank
            pub(crate) fn from_checked(s: String) -> Self {
                debug_assert!(!s.trim().is_empty());
                Self(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err(IdError::Empty { kind: $kind });
                }
                Ok(Self(s.to_string()))
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

opaque_id!(
    /// Identifier of a list, unique within a document
    ListId,
    "list"
);

opaque_id!(
    /// Identifier of a status, unique within its list
    StatusId,
    "status"
);

opaque_id!(
    /// Identifier of a task, unique within its list
    TaskId,
    "task"
);

impl ListId {
    /// The id of the list synthesized for empty and legacy documents
    pub fn default_list() -> Self {
        Self("list-default".to_string())
    }
}

impl StatusId {
    /// Status every task falls back to when its list has no statuses left
    pub fn fallback() -> Self {
        Self("todo".to_string())
    }
}

impl TaskId {
    /// Derives the positional id used for tasks read from legacy text.
    ///
    /// The id depends on the line index, so editing an earlier line shifts
    /// the ids of every task after it.
    pub fn legacy(line_index: usize, body: &str) -> Self {
        let slug: String = body
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
            .chars()
            .take(10)
            .collect();
        Self(format!("task-{}-{}", line_index, slug))
    }
}

/// Mints fresh ids that do not collide with ids already in scope
#[derive(Debug, Default)]
pub struct IdMint {
    counter: u64,
}

impl IdMint {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self, prefix: &str, seed: &str, taken: impl Fn(&str) -> bool) -> String {
        loop {
            self.counter += 1;
            let candidate = format!("{}-{}", prefix, generate_hash(seed, Utc::now(), self.counter));
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    /// Mints a list id not present in `existing`
    pub fn list_id<'a>(&mut self, name: &str, existing: impl IntoIterator<Item = &'a ListId> + Clone) -> ListId {
        ListId(self.mint("list", name, |c| existing.clone().into_iter().any(|id| id == c)))
    }

    /// Mints a status id not present in `existing`
    pub fn status_id<'a>(&mut self, label: &str, existing: impl IntoIterator<Item = &'a StatusId> + Clone) -> StatusId {
        StatusId(self.mint("status", label, |c| existing.clone().into_iter().any(|id| id == c)))
    }

    /// Mints a task id not present in `existing`
    pub fn task_id<'a>(&mut self, text: &str, existing: impl IntoIterator<Item = &'a TaskId> + Clone) -> TaskId {
        TaskId(self.mint("t", text, |c| existing.clone().into_iter().any(|id| id == c)))
    }
}
