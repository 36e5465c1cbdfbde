//! Opening the document for a command
//!
//! Resolves which file to use, acquires it as the process's document host
//! and wraps it in a [`DocumentModel`]. Also turns user-typed references
//! (ids, names, 1-based positions) into the ids the model works with.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};

use crate::domain::{Document, ListId, StatusId, TaskId, TaskList};
use crate::storage::{Config, FileStore, DEFAULT_DOCUMENT_FILE};
use crate::sync::{acquire_host, DocumentModel, TextChannel};

/// An open document plus the configuration it was opened with
pub struct Session {
    pub config: Config,
    pub path: PathBuf,
    pub model: DocumentModel,
}

impl Session {
    /// Opens the document named by `--file`, the config, or the default file
    pub fn open(config: Config, file: Option<&Path>) -> Result<Self> {
        let path = resolve_path(&config, file)?;
        let store = FileStore::new(&path).with_debounce(config.project.watch.debounce());

        acquire_host(Arc::new(store)).context("Failed to acquire document host")?;
        let channel = TextChannel::from_host()
            .with_context(|| format!("Failed to open document: {}", path.display()))?;

        Ok(Self {
            config,
            path,
            model: DocumentModel::new(channel),
        })
    }

    pub fn document(&self) -> Document {
        self.model.document()
    }
}

/// `--file`, else `[document] file`, else the default name next to the
/// project config or in the working directory
pub fn resolve_path(config: &Config, file: Option<&Path>) -> Result<PathBuf> {
    if let Some(file) = file {
        return Ok(file.to_path_buf());
    }
    if let Some(file) = config.document_file() {
        return Ok(file);
    }
    let base = match &config.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    Ok(base.join(DEFAULT_DOCUMENT_FILE))
}

/// Parses a 1-based position into an index
pub fn position(arg: usize) -> Result<usize> {
    arg.checked_sub(1)
        .ok_or_else(|| anyhow!("Positions start at 1"))
}

fn active(doc: &Document) -> Result<&TaskList> {
    doc.active_list()
        .ok_or_else(|| anyhow!("Document has no lists"))
}

/// A task in the active list, by id or 1-based position
pub fn resolve_task(doc: &Document, arg: &str) -> Result<TaskId> {
    let list = active(doc)?;
    if let Some(task) = list.tasks.iter().find(|t| t.id == arg) {
        return Ok(task.id.clone());
    }
    if let Ok(n) = arg.parse::<usize>() {
        if let Some(task) = n.checked_sub(1).and_then(|i| list.tasks.get(i)) {
            return Ok(task.id.clone());
        }
    }
    bail!("Task not found: {}", arg)
}

/// A status in the active list, by id or case-insensitive label
pub fn resolve_status(doc: &Document, arg: &str) -> Result<StatusId> {
    let list = active(doc)?;
    list.statuses
        .iter()
        .find(|s| s.id == arg)
        .or_else(|| list.statuses.iter().find(|s| s.label.eq_ignore_ascii_case(arg)))
        .map(|s| s.id.clone())
        .ok_or_else(|| anyhow!("Status not found: {}", arg))
}

/// A list, by id or case-insensitive name
pub fn resolve_list(doc: &Document, arg: &str) -> Result<ListId> {
    doc.lists
        .iter()
        .find(|l| l.id == arg)
        .or_else(|| doc.lists.iter().find(|l| l.name.eq_ignore_ascii_case(arg)))
        .map(|l| l.id.clone())
        .ok_or_else(|| anyhow!("List not found: {}", arg))
}
