//! Structured JSON dialect
//!
//! The only write format. A value is accepted as structured when it has a
//! non-empty `lists` array and a non-empty string `activeListId`; anything
//! else falls through to the legacy decoders. Once the shape matches, the
//! text is never read as a legacy dialect: fields the typed model rejects
//! are salvaged one by one instead, so a mutation cannot replace the user's
//! lists with an empty default list.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::CodecError;
use crate::domain::{Document, ListId, Status, StatusId, Task, TaskId, TaskList, View};

/// Outcome of the structured schema check
#[derive(Debug)]
pub(crate) enum ShapeCheck {
    Valid(Document),
    /// The shape matched but some fields did not; read field by field
    Salvaged(Document),
    NotStructured,
}

/// Whether `value` has the shape of a structured document
pub(crate) fn has_shape(value: &Value) -> bool {
    let lists_ok = value
        .get("lists")
        .and_then(Value::as_array)
        .is_some_and(|lists| !lists.is_empty());
    let active_ok = value
        .get("activeListId")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty());

    lists_ok && active_ok
}

/// Checks the shape, then deserializes into the typed model
pub(crate) fn check(value: &Value) -> ShapeCheck {
    if !has_shape(value) {
        debug!("value lacks lists/activeListId, not structured");
        return ShapeCheck::NotStructured;
    }

    match Document::deserialize(value) {
        Ok(doc) => ShapeCheck::Valid(doc),
        Err(e) => {
            warn!("structured document has malformed fields, reading leniently: {e}");
            ShapeCheck::Salvaged(salvage(value))
        }
    }
}

fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn string(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn id_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
}

/// Hands out `{prefix}-{index}` for entries without a usable id, skipping
/// ids already present among their siblings
struct PositionalIds {
    prefix: &'static str,
    taken: HashSet<String>,
}

impl PositionalIds {
    fn new(prefix: &'static str, entries: &[Value]) -> Self {
        let taken = entries
            .iter()
            .filter_map(|entry| id_field(entry, "id"))
            .map(str::to_string)
            .collect();
        Self { prefix, taken }
    }

    fn id_for(&mut self, index: usize, entry: &Value) -> String {
        if let Some(id) = id_field(entry, "id") {
            return id.to_string();
        }

        let base = format!("{}-{}", self.prefix, index);
        let mut candidate = base.clone();
        let mut suffix = 1;
        while self.taken.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}-{}", base, suffix);
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}

/// Reads a shape-checked value field by field
///
/// Missing or blank ids become positional, missing or mistyped strings
/// become "", a missing `statusId` becomes the fallback status and an
/// unknown view reads as table. Everything else is kept as written.
fn salvage(value: &Value) -> Document {
    let lists = array(value, "lists");
    let mut list_ids = PositionalIds::new("list", lists);

    let lists: Vec<TaskList> = lists
        .iter()
        .enumerate()
        .map(|(index, list)| salvage_list(ListId::from_checked(list_ids.id_for(index, list)), list))
        .collect();

    let active_list_id = match id_field(value, "activeListId") {
        Some(id) => ListId::from_checked(id.to_string()),
        None => lists[0].id.clone(),
    };

    Document {
        lists,
        active_list_id,
    }
}

fn salvage_list(id: ListId, list: &Value) -> TaskList {
    let statuses = array(list, "statuses");
    let tasks = array(list, "tasks");
    let mut status_ids = PositionalIds::new("status", statuses);
    let mut task_ids = PositionalIds::new("task", tasks);

    let view = match list.get("view").and_then(Value::as_str) {
        Some("kanban") => View::Kanban,
        _ => View::Table,
    };

    TaskList {
        id,
        name: string(list, "name"),
        view,
        statuses: statuses
            .iter()
            .enumerate()
            .map(|(index, status)| Status {
                id: StatusId::from_checked(status_ids.id_for(index, status)),
                label: string(status, "label"),
                color: string(status, "color"),
            })
            .collect(),
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(index, task)| {
                let status = id_field(task, "statusId")
                    .map(|id| StatusId::from_checked(id.to_string()))
                    .unwrap_or_else(StatusId::fallback);
                Task::new(
                    TaskId::from_checked(task_ids.id_for(index, task)),
                    string(task, "text"),
                    status,
                )
            })
            .collect(),
    }
}

/// Serializes a document as indented JSON
pub(crate) fn encode(doc: &Document) -> Result<String, CodecError> {
    serde_json::to_string_pretty(doc).map_err(CodecError::Encode)
}
