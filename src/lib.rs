//! todoit - task lists kept in a plain text file
//!
//! A document holds several task lists, each with its own ordered set of
//! statuses and a table or board view. The file is structured JSON; older
//! checkbox-line and single-status files are read and upgraded on the first
//! edit. Edits made here are written back to the file, and edits made to the
//! file by anyone else flow back in without our own writes echoing.

pub mod cli;
pub mod codec;
pub mod domain;
pub mod storage;
pub mod sync;

pub use codec::{decode, encode, Dialect};
pub use domain::{Document, ListId, Mutation, Status, StatusId, Task, TaskId, TaskList, View};
pub use sync::{DocumentModel, Outcome, TextChannel};
