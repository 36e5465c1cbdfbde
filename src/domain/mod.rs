//! Domain models for todoit
//!
//! Contains the document model and its pure transforms, without any I/O concerns.

mod id;
mod document;
mod mutation;

pub use id::{IdError, IdMint, ListId, StatusId, TaskId};
pub use document::{
    default_statuses, Document, LegacyStatus, Status, Task, TaskList, Violation, View,
    DEFAULT_LIST_NAME, NEW_LIST_NAME,
};
pub use mutation::{splice_move, Applied, Mutation};
