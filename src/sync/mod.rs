//! # Sync Layer
//!
//! Keeps the in-memory document in step with its store.
//!
//! - [`TextChannel`] owns the current text and suppresses echoes of its own
//!   writes.
//! - [`DocumentModel`] turns structured edits into text sent through a channel.
//! - [`acquire_host`] installs the one store a session talks to.
//!
//! ```text
//!  edit ──► DocumentModel ──encode──► TextChannel ──write──► DocumentStore
//!                ▲                        │  ▲                   │
//!                └───decode◄── listeners ◄┘  └── on_external_change (echoes dropped)
//! ```

mod channel;
mod host;
mod model;

use thiserror::Error;

use crate::storage::StoreError;

pub use channel::{ExternalChange, ListenerId, TextChannel};
pub use host::{acquire_host, host_acquired};
pub use model::{DocumentModel, ModelError, Outcome};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Document host was already acquired")]
    HostAlreadyAcquired,

    #[error("No document host has been acquired")]
    HostNotAcquired,
}
