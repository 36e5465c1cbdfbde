//! The boundary to whatever owns the document text
//!
//! A store reads the text once, persists local writes, and reports changes
//! made by anyone else. It may also report our own writes back; filtering
//! those echoes is the text channel's job, not the store's.

use std::any::Any;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read document {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write document {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to watch document {}: {message}", path.display())]
    Watch { path: PathBuf, message: String },

    #[error("Document store rejected the write: {0}")]
    Rejected(String),
}

/// Receives the full new text after each change
pub type ChangeSink = Arc<dyn Fn(String) + Send + Sync>;

/// Keeps a change subscription alive; dropping it stops delivery
pub struct Subscription {
    _guard: Box<dyn Any + Send>,
}

impl Subscription {
    pub fn new(guard: impl Any + Send) -> Self {
        Self {
            _guard: Box::new(guard),
        }
    }

    /// A subscription for stores that never report changes
    pub fn inert() -> Self {
        Self::new(())
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subscription")
    }
}

/// External owner of the document text
pub trait DocumentStore: Send + Sync {
    /// Current text; a document that does not exist yet reads as empty
    fn read(&self) -> Result<String, StoreError>;

    /// Persists a local change
    fn write(&self, text: &str) -> Result<(), StoreError>;

    /// Delivers the text to `sink` whenever it changes
    fn subscribe(&self, sink: ChangeSink) -> Result<Subscription, StoreError>;
}
