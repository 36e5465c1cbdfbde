//! Document domain model
//!
//! A document is an ordered set of lists plus a pointer to the active one.
//! Each list owns its status catalog and its tasks; nothing is shared across
//! lists. Order is meaningful everywhere: list order is tab order, status
//! order is column order, task order is row order.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{ListId, StatusId, TaskId};

/// Name of the list synthesized for empty and legacy documents
pub const DEFAULT_LIST_NAME: &str = "Default";

/// Name given to a list added without one
pub const NEW_LIST_NAME: &str = "New List";

/// How a list is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Table,
    Kanban,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Table => "table",
            View::Kanban => "kanban",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three fixed statuses of the legacy formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyStatus {
    Todo,
    Doing,
    Done,
}

impl LegacyStatus {
    pub const ALL: [LegacyStatus; 3] = [LegacyStatus::Todo, LegacyStatus::Doing, LegacyStatus::Done];

    /// Parses the character inside a `[ ]` checkbox
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            ' ' => Some(LegacyStatus::Todo),
            '*' => Some(LegacyStatus::Doing),
            'x' | 'X' => Some(LegacyStatus::Done),
            _ => None,
        }
    }

    /// Parses a status name of the single-status-enum JSON format
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "todo" => Some(LegacyStatus::Todo),
            "doing" => Some(LegacyStatus::Doing),
            "done" => Some(LegacyStatus::Done),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            LegacyStatus::Todo => "todo",
            LegacyStatus::Doing => "doing",
            LegacyStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LegacyStatus::Todo => "To Do",
            LegacyStatus::Doing => "Doing",
            LegacyStatus::Done => "Done",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            LegacyStatus::Todo => "#808080",
            LegacyStatus::Doing => "#4A9EFF",
            LegacyStatus::Done => "#4CAF50",
        }
    }

    pub fn status_id(&self) -> StatusId {
        self.id()
            .parse()
            .unwrap_or_else(|_| StatusId::fallback())
    }

    pub fn status(&self) -> Status {
        Status {
            id: self.status_id(),
            label: self.label().to_string(),
            color: self.color().to_string(),
        }
    }
}

/// The status catalog every new list starts with
pub fn default_statuses() -> Vec<Status> {
    LegacyStatus::ALL.iter().map(LegacyStatus::status).collect()
}

/// A named, colored stage a task can occupy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub id: StatusId,

    #[serde(default)]
    pub label: String,

    /// Hex color, e.g. `#4A9EFF`
    #[serde(default)]
    pub color: String,
}

/// A single item of work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    #[serde(default)]
    pub text: String,

    #[serde(default = "StatusId::fallback")]
    pub status_id: StatusId,
}

impl Task {
    pub fn new(id: TaskId, text: impl Into<String>, status_id: StatusId) -> Self {
        Self {
            id,
            text: text.into(),
            status_id,
        }
    }
}

/// An independent container of tasks with its own statuses and view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: ListId,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub view: View,

    #[serde(default)]
    pub statuses: Vec<Status>,

    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Creates an empty table list with the default statuses
    pub fn new(id: ListId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            view: View::Table,
            statuses: default_statuses(),
            tasks: Vec::new(),
        }
    }

    pub fn status(&self, id: &StatusId) -> Option<&Status> {
        self.statuses.iter().find(|s| &s.id == id)
    }

    pub fn has_status(&self, id: &StatusId) -> bool {
        self.status(id).is_some()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }

    /// The status new tasks get: the first one, or the fallback id
    pub fn first_status_id(&self) -> StatusId {
        self.statuses
            .first()
            .map(|s| s.id.clone())
            .unwrap_or_else(StatusId::fallback)
    }

    /// Tasks in one board column, in list order
    pub fn tasks_with_status<'a>(&'a self, status: &StatusId) -> impl Iterator<Item = &'a Task> + 'a {
        let status = status.clone();
        self.tasks.iter().filter(move |t| t.status_id == status)
    }

    /// Board columns in status order
    pub fn columns(&self) -> Vec<(&Status, Vec<&Task>)> {
        self.statuses
            .iter()
            .map(|s| (s, self.tasks_with_status(&s.id).collect()))
            .collect()
    }
}

/// The full persisted state: all lists plus which one is active
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub lists: Vec<TaskList>,
    pub active_list_id: ListId,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// One default list with the default statuses and no tasks
    pub fn empty() -> Self {
        Self::from_tasks(Vec::new())
    }

    /// A single default list holding `tasks`, as legacy text decodes to
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut list = TaskList::new(ListId::default_list(), DEFAULT_LIST_NAME);
        list.tasks = tasks;
        Self {
            active_list_id: list.id.clone(),
            lists: vec![list],
        }
    }

    /// Index of the active list, falling back to the first list
    pub fn active_index(&self) -> Option<usize> {
        self.lists
            .iter()
            .position(|l| l.id == self.active_list_id)
            .or_else(|| (!self.lists.is_empty()).then_some(0))
    }

    /// The active list, or the first list if the pointer is dangling
    pub fn active_list(&self) -> Option<&TaskList> {
        self.active_index().map(|i| &self.lists[i])
    }

    pub fn list(&self, id: &ListId) -> Option<&TaskList> {
        self.lists.iter().find(|l| &l.id == id)
    }

    pub fn has_list(&self, id: &ListId) -> bool {
        self.list(id).is_some()
    }

    /// Reports every broken invariant; an empty result means the document is sound
    pub fn violations(&self) -> Vec<Violation> {
        let mut found = Vec::new();

        if self.lists.is_empty() {
            found.push(Violation::NoLists);
            return found;
        }

        if !self.has_list(&self.active_list_id) {
            found.push(Violation::MissingActiveList {
                list: self.active_list_id.clone(),
            });
        }

        let mut list_ids = HashSet::new();
        for list in &self.lists {
            if !list_ids.insert(&list.id) {
                found.push(Violation::DuplicateList { list: list.id.clone() });
            }

            if list.statuses.is_empty() {
                found.push(Violation::NoStatuses { list: list.id.clone() });
            }

            let mut status_ids = HashSet::new();
            for status in &list.statuses {
                if !status_ids.insert(&status.id) {
                    found.push(Violation::DuplicateStatus {
                        list: list.id.clone(),
                        status: status.id.clone(),
                    });
                }
            }

            let mut task_ids = HashSet::new();
            for task in &list.tasks {
                if !task_ids.insert(&task.id) {
                    found.push(Violation::DuplicateTask {
                        list: list.id.clone(),
                        task: task.id.clone(),
                    });
                }
                if !status_ids.contains(&task.status_id) {
                    found.push(Violation::DanglingStatus {
                        list: list.id.clone(),
                        task: task.id.clone(),
                        status: task.status_id.clone(),
                    });
                }
            }
        }

        found
    }
}

/// A broken invariant found in a decoded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    NoLists,
    MissingActiveList { list: ListId },
    DuplicateList { list: ListId },
    NoStatuses { list: ListId },
    DuplicateStatus { list: ListId, status: StatusId },
    DuplicateTask { list: ListId, task: TaskId },
    DanglingStatus { list: ListId, task: TaskId, status: StatusId },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NoLists => write!(f, "document has no lists"),
            Violation::MissingActiveList { list } => {
                write!(f, "active list {} does not exist", list)
            }
            Violation::DuplicateList { list } => write!(f, "list id {} is used twice", list),
            Violation::NoStatuses { list } => write!(f, "list {} has no statuses", list),
            Violation::DuplicateStatus { list, status } => {
                write!(f, "status id {} is used twice in list {}", status, list)
            }
            Violation::DuplicateTask { list, task } => {
                write!(f, "task id {} is used twice in list {}", task, list)
            }
            Violation::DanglingStatus { list, task, status } => write!(
                f,
                "task {} in list {} references missing status {}",
                task, list, status
            ),
        }
    }
}
