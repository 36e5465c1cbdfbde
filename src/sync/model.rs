//! The document model
//!
//! [`DocumentModel`] is the one place edits happen: it decodes the channel's
//! current text, applies a [`Mutation`], encodes the result and sends it
//! back through the channel. Mutations are serialized, so concurrent callers
//! never lose each other's updates.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, info};

use super::channel::{ListenerId, TextChannel};
use super::SyncError;
use crate::codec::{self, CodecError, Dialect};
use crate::domain::{Applied, Document, IdMint, ListId, Mutation, StatusId, TaskId, View};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Whether an operation produced a new document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The document changed and was sent to the store
    Changed,
    /// Nothing to do; no write happened
    Unchanged,
}

impl Outcome {
    pub fn is_changed(self) -> bool {
        self == Outcome::Changed
    }
}

/// Structured edits over a [`TextChannel`]
pub struct DocumentModel {
    channel: Arc<TextChannel>,
    mint: Mutex<IdMint>,
}

impl DocumentModel {
    pub fn new(channel: Arc<TextChannel>) -> Self {
        Self {
            channel,
            mint: Mutex::new(IdMint::new()),
        }
    }

    pub fn channel(&self) -> &Arc<TextChannel> {
        &self.channel
    }

    /// Decodes the current text
    pub fn document(&self) -> Document {
        codec::decode(&self.channel.current_text())
    }

    /// Dialect of the current text
    pub fn dialect(&self) -> Dialect {
        codec::classify(&self.channel.current_text())
    }

    /// Applies one mutation: decode, transform, encode, send
    pub fn apply(&self, mutation: Mutation) -> Result<Outcome, ModelError> {
        let mut mint = self.mint.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.document();
        let next = match mutation.apply(&current, &mut mint) {
            Applied::Changed(next) => next,
            Applied::Unchanged => {
                debug!(op = mutation.name(), "mutation was a no-op");
                return Ok(Outcome::Unchanged);
            }
        };

        let text = codec::encode(&next)?;
        debug!(op = mutation.name(), "applying mutation");
        self.channel.set_local(&text)?;
        Ok(Outcome::Changed)
    }

    /// Rewrites text that is not yet structured JSON, without other changes
    pub fn upgrade(&self) -> Result<Outcome, ModelError> {
        let _serialized = self.mint.lock().unwrap_or_else(PoisonError::into_inner);

        let dialect = self.dialect();
        if let Dialect::Structured(_) = dialect {
            return Ok(Outcome::Unchanged);
        }

        let from = dialect.name();
        let text = codec::encode(&dialect.into_document())?;
        self.channel.set_local(&text)?;
        info!(from, "upgraded document to structured JSON");
        Ok(Outcome::Changed)
    }

    /// Calls `listener` with the decoded document after each external change
    pub fn subscribe(&self, listener: impl Fn(&Document) + Send + Sync + 'static) -> ListenerId {
        self.channel.subscribe(move |text| listener(&codec::decode(text)))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.channel.unsubscribe(id)
    }

    pub fn add_task(&self, text: &str) -> Result<Outcome, ModelError> {
        self.apply(Mutation::AddTask { text: text.to_string() })
    }

    pub fn edit_task(&self, id: &TaskId, text: &str) -> Result<Outcome, ModelError> {
        self.apply(Mutation::EditTask {
            id: id.clone(),
            text: text.to_string(),
        })
    }

    pub fn delete_task(&self, id: &TaskId) -> Result<Outcome, ModelError> {
        self.apply(Mutation::DeleteTask { id: id.clone() })
    }

    pub fn change_status(&self, id: &TaskId, status: &StatusId) -> Result<Outcome, ModelError> {
        self.apply(Mutation::ChangeStatus {
            id: id.clone(),
            status: status.clone(),
        })
    }

    pub fn move_task_to_status(
        &self,
        id: &TaskId,
        status: &StatusId,
        before: Option<&TaskId>,
    ) -> Result<Outcome, ModelError> {
        self.apply(Mutation::MoveTaskToStatus {
            id: id.clone(),
            status: status.clone(),
            before: before.cloned(),
        })
    }

    pub fn reorder_tasks(&self, from: usize, to: usize) -> Result<Outcome, ModelError> {
        self.apply(Mutation::ReorderTasks { from, to })
    }

    pub fn add_list(&self, name: Option<&str>) -> Result<Outcome, ModelError> {
        self.apply(Mutation::AddList {
            name: name.map(str::to_string),
        })
    }

    pub fn rename_list(&self, id: &ListId, name: &str) -> Result<Outcome, ModelError> {
        self.apply(Mutation::RenameList {
            id: id.clone(),
            name: name.to_string(),
        })
    }

    pub fn delete_list(&self, id: &ListId) -> Result<Outcome, ModelError> {
        self.apply(Mutation::DeleteList { id: id.clone() })
    }

    pub fn set_active_list(&self, id: &ListId) -> Result<Outcome, ModelError> {
        self.apply(Mutation::SetActiveList { id: id.clone() })
    }

    pub fn set_view(&self, view: View) -> Result<Outcome, ModelError> {
        self.apply(Mutation::SetView { view })
    }

    pub fn add_status(&self, label: &str, color: &str) -> Result<Outcome, ModelError> {
        self.apply(Mutation::AddStatus {
            label: label.to_string(),
            color: color.to_string(),
        })
    }

    pub fn update_status(&self, id: &StatusId, label: &str, color: &str) -> Result<Outcome, ModelError> {
        self.apply(Mutation::UpdateStatus {
            id: id.clone(),
            label: label.to_string(),
            color: color.to_string(),
        })
    }

    pub fn delete_status(&self, id: &StatusId) -> Result<Outcome, ModelError> {
        self.apply(Mutation::DeleteStatus { id: id.clone() })
    }

    pub fn reorder_statuses(&self, from: usize, to: usize) -> Result<Outcome, ModelError> {
        self.apply(Mutation::ReorderStatuses { from, to })
    }
}
