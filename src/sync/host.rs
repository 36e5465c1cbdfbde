//! The process-wide document host
//!
//! A host session owns exactly one store, acquired once at startup. Nothing
//! outside this module reads it directly; the rest of the crate reaches it
//! through [`TextChannel::from_host`].

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::{SyncError, TextChannel};
use crate::storage::DocumentStore;

static HOST: OnceCell<Arc<dyn DocumentStore>> = OnceCell::new();

/// Installs the host store; fails if one was already acquired
pub fn acquire_host(store: Arc<dyn DocumentStore>) -> Result<(), SyncError> {
    HOST.set(store).map_err(|_| SyncError::HostAlreadyAcquired)?;
    debug!("document host acquired");
    Ok(())
}

/// Whether [`acquire_host`] has succeeded in this process
pub fn host_acquired() -> bool {
    HOST.get().is_some()
}

impl TextChannel {
    /// Connects a channel to the acquired host store
    pub fn from_host() -> Result<Arc<TextChannel>, SyncError> {
        let store = HOST.get().cloned().ok_or(SyncError::HostNotAcquired)?;
        TextChannel::connect(store)
    }
}
