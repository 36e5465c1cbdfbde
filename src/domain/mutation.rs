//! Document transforms
//!
//! Every edit the UI can make is a [`Mutation`]. Applying one never touches
//! the input document; it yields a new document, or [`Applied::Unchanged`]
//! when the edit is a no-op (unknown id, blank text, deleting the last list).
//! Task and status edits target the active list.

use super::document::{Document, Status, Task, TaskList, View, NEW_LIST_NAME};
use super::id::{IdMint, ListId, StatusId, TaskId};

/// A single structured edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddTask { text: String },
    EditTask { id: TaskId, text: String },
    DeleteTask { id: TaskId },
    ChangeStatus { id: TaskId, status: StatusId },
    /// Sets the status and repositions in one step (board drag and drop)
    MoveTaskToStatus {
        id: TaskId,
        status: StatusId,
        before: Option<TaskId>,
    },
    ReorderTasks { from: usize, to: usize },
    AddList { name: Option<String> },
    RenameList { id: ListId, name: String },
    DeleteList { id: ListId },
    SetActiveList { id: ListId },
    SetView { view: View },
    AddStatus { label: String, color: String },
    UpdateStatus {
        id: StatusId,
        label: String,
        color: String,
    },
    DeleteStatus { id: StatusId },
    ReorderStatuses { from: usize, to: usize },
}

/// Result of applying a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Changed(Document),
    Unchanged,
}

impl Applied {
    pub fn is_changed(&self) -> bool {
        matches!(self, Applied::Changed(_))
    }

    /// The resulting document, falling back to `current` when nothing changed
    pub fn into_document(self, current: &Document) -> Document {
        match self {
            Applied::Changed(doc) => doc,
            Applied::Unchanged => current.clone(),
        }
    }
}

impl Mutation {
    /// Short operation name for logs and output
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddTask { .. } => "add_task",
            Mutation::EditTask { .. } => "edit_task",
            Mutation::DeleteTask { .. } => "delete_task",
            Mutation::ChangeStatus { .. } => "change_status",
            Mutation::MoveTaskToStatus { .. } => "move_task_to_status",
            Mutation::ReorderTasks { .. } => "reorder_tasks",
            Mutation::AddList { .. } => "add_list",
            Mutation::RenameList { .. } => "rename_list",
            Mutation::DeleteList { .. } => "delete_list",
            Mutation::SetActiveList { .. } => "set_active_list",
            Mutation::SetView { .. } => "set_view",
            Mutation::AddStatus { .. } => "add_status",
            Mutation::UpdateStatus { .. } => "update_status",
            Mutation::DeleteStatus { .. } => "delete_status",
            Mutation::ReorderStatuses { .. } => "reorder_statuses",
        }
    }

    /// Applies the mutation to `doc`, minting any new ids from `mint`
    pub fn apply(&self, doc: &Document, mint: &mut IdMint) -> Applied {
        let mut next = doc.clone();

        match self {
            Mutation::AddTask { text } => with_active(&mut next, |list| add_task(list, text, mint)),
            Mutation::EditTask { id, text } => with_active(&mut next, |list| {
                if let Some(task) = list.tasks.iter_mut().find(|t| &t.id == id) {
                    task.text = text.clone();
                }
            }),
            Mutation::DeleteTask { id } => {
                with_active(&mut next, |list| list.tasks.retain(|t| &t.id != id))
            }
            Mutation::ChangeStatus { id, status } => with_active(&mut next, |list| {
                if !list.has_status(status) {
                    return;
                }
                if let Some(task) = list.tasks.iter_mut().find(|t| &t.id == id) {
                    task.status_id = status.clone();
                }
            }),
            Mutation::MoveTaskToStatus { id, status, before } => {
                with_active(&mut next, |list| move_task_to_status(list, id, status, before.as_ref()))
            }
            Mutation::ReorderTasks { from, to } => {
                with_active(&mut next, |list| splice_move(&mut list.tasks, *from, *to))
            }
            Mutation::AddList { name } => add_list(&mut next, name.as_deref(), mint),
            Mutation::RenameList { id, name } => {
                if let Some(list) = next.lists.iter_mut().find(|l| &l.id == id) {
                    list.name = name.clone();
                }
            }
            Mutation::DeleteList { id } => delete_list(&mut next, id),
            Mutation::SetActiveList { id } => {
                if next.active_list_id != *id && next.has_list(id) {
                    next.active_list_id = id.clone();
                }
            }
            Mutation::SetView { view } => with_active(&mut next, |list| list.view = *view),
            Mutation::AddStatus { label, color } => {
                with_active(&mut next, |list| add_status(list, label, color, mint))
            }
            Mutation::UpdateStatus { id, label, color } => with_active(&mut next, |list| {
                if let Some(status) = list.statuses.iter_mut().find(|s| &s.id == id) {
                    status.label = label.clone();
                    status.color = color.clone();
                }
            }),
            Mutation::DeleteStatus { id } => with_active(&mut next, |list| delete_status(list, id)),
            Mutation::ReorderStatuses { from, to } => {
                with_active(&mut next, |list| splice_move(&mut list.statuses, *from, *to))
            }
        }

        if next == *doc {
            Applied::Unchanged
        } else {
            Applied::Changed(next)
        }
    }
}

/// Runs `f` against the active list, if there is one
fn with_active(doc: &mut Document, f: impl FnOnce(&mut TaskList)) {
    if let Some(index) = doc.active_index() {
        f(&mut doc.lists[index]);
    }
}

/// Removes the element at `from` and reinserts it at `to` in the shortened
/// sequence. An out-of-range `from` is ignored and `to` is clamped to the end.
pub fn splice_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to || from >= items.len() {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}

fn add_task(list: &mut TaskList, text: &str, mint: &mut IdMint) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    let id = mint.task_id(text, list.tasks.iter().map(|t| &t.id));
    let status = list.first_status_id();
    list.tasks.push(Task::new(id, text, status));
}

fn move_task_to_status(list: &mut TaskList, id: &TaskId, status: &StatusId, before: Option<&TaskId>) {
    if !list.has_status(status) {
        return;
    }
    let Some(from) = list.task_position(id) else {
        return;
    };

    let mut task = list.tasks.remove(from);
    task.status_id = status.clone();

    let target = before
        .and_then(|b| list.task_position(b))
        .unwrap_or(list.tasks.len());
    list.tasks.insert(target, task);
}

fn add_list(doc: &mut Document, name: Option<&str>, mint: &mut IdMint) {
    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(NEW_LIST_NAME);
    let id = mint.list_id(name, doc.lists.iter().map(|l| &l.id));

    doc.lists.push(TaskList::new(id.clone(), name));
    doc.active_list_id = id;
}

fn delete_list(doc: &mut Document, id: &ListId) {
    if doc.lists.len() <= 1 {
        return;
    }
    let Some(index) = doc.lists.iter().position(|l| &l.id == id) else {
        return;
    };

    doc.lists.remove(index);
    if doc.active_list_id == *id {
        doc.active_list_id = doc.lists[0].id.clone();
    }
}

fn add_status(list: &mut TaskList, label: &str, color: &str, mint: &mut IdMint) {
    let id = mint.status_id(label, list.statuses.iter().map(|s| &s.id));
    list.statuses.push(Status {
        id,
        label: label.to_string(),
        color: color.to_string(),
    });
}

fn delete_status(list: &mut TaskList, id: &StatusId) {
    if !list.has_status(id) {
        return;
    }
    list.statuses.retain(|s| &s.id != id);

    let fallback = list.first_status_id();
    for task in list.tasks.iter_mut().filter(|t| &t.status_id == id) {
        task.status_id = fallback.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::default_statuses;

    fn id<T: std::str::FromStr>(s: &str) -> T
    where
        T::Err: std::fmt::Debug,
    {
        s.parse().unwrap()
    }

    fn apply(doc: &Document, mutation: Mutation) -> Document {
        mutation.apply(doc, &mut IdMint::new()).into_document(doc)
    }

    /// One list with tasks `t1..tN` and the given statuses
    fn doc_with(tasks: &[(&str, &str)]) -> Document {
        Document::from_tasks(
            tasks
                .iter()
                .map(|(task, status)| Task::new(id(task), format!("Task {}", task), id(status)))
                .collect(),
        )
    }

    fn task_ids(doc: &Document) -> Vec<String> {
        doc.active_list()
            .unwrap()
            .tasks
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    fn status_labels(doc: &Document) -> Vec<String> {
        doc.active_list()
            .unwrap()
            .statuses
            .iter()
            .map(|s| s.label.clone())
            .collect()
    }

    #[test]
    fn add_task_trims_and_uses_first_status() {
        let doc = apply(&Document::empty(), Mutation::AddTask { text: "  buy milk ".into() });
        let list = doc.active_list().unwrap();

        assert_eq!(list.tasks.len(), 1);
        assert_eq!(list.tasks[0].text, "buy milk");
        assert_eq!(list.tasks[0].status_id, "todo");
    }

    #[test]
    fn add_blank_task_is_noop() {
        let applied = Mutation::AddTask { text: "   ".into() }.apply(&Document::empty(), &mut IdMint::new());

        assert_eq!(applied, Applied::Unchanged);
    }

    #[test]
    fn add_task_appends_with_fresh_ids() {
        let mut doc = Document::empty();
        for text in ["a", "b", "c"] {
            doc = apply(&doc, Mutation::AddTask { text: text.into() });
        }

        let ids = task_ids(&doc);
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);

        let texts: Vec<_> = doc.lists[0].tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn edit_task_keeps_position() {
        let doc = doc_with(&[("t1", "todo"), ("t2", "todo"), ("t3", "todo")]);
        let doc = apply(&doc, Mutation::EditTask { id: id("t2"), text: "renamed".into() });

        assert_eq!(task_ids(&doc), vec!["t1", "t2", "t3"]);
        assert_eq!(doc.lists[0].tasks[1].text, "renamed");
    }

    #[test]
    fn missing_ids_are_noops() {
        let doc = doc_with(&[("t1", "todo")]);
        let mut mint = IdMint::new();

        for mutation in [
            Mutation::EditTask { id: id("nope"), text: "x".into() },
            Mutation::DeleteTask { id: id("nope") },
            Mutation::ChangeStatus { id: id("nope"), status: id("done") },
            Mutation::ChangeStatus { id: id("t1"), status: id("nope") },
            Mutation::MoveTaskToStatus { id: id("nope"), status: id("done"), before: None },
            Mutation::RenameList { id: id("nope"), name: "x".into() },
            Mutation::SetActiveList { id: id("nope") },
            Mutation::UpdateStatus { id: id("nope"), label: "x".into(), color: "#000".into() },
            Mutation::DeleteStatus { id: id("nope") },
        ] {
            assert_eq!(mutation.apply(&doc, &mut mint), Applied::Unchanged, "{}", mutation.name());
        }
    }

    #[test]
    fn delete_task_preserves_order() {
        let doc = doc_with(&[("t1", "todo"), ("t2", "todo"), ("t3", "todo")]);
        let doc = apply(&doc, Mutation::DeleteTask { id: id("t2") });

        assert_eq!(task_ids(&doc), vec!["t1", "t3"]);
    }

    #[test]
    fn change_status_keeps_position() {
        let doc = doc_with(&[("t1", "todo"), ("t2", "todo")]);
        let doc = apply(&doc, Mutation::ChangeStatus { id: id("t1"), status: id("done") });

        assert_eq!(task_ids(&doc), vec!["t1", "t2"]);
        assert_eq!(doc.lists[0].tasks[0].status_id, "done");
    }

    #[test]
    fn move_task_inserts_before_target() {
        let doc = doc_with(&[
            ("t1", "todo"),
            ("t2", "doing"),
            ("t4", "done"),
            ("t5", "done"),
            ("t6", "done"),
        ]);
        let doc = apply(
            &doc,
            Mutation::MoveTaskToStatus { id: id("t1"), status: id("done"), before: Some(id("t5")) },
        );

        let list = doc.active_list().unwrap();
        let done_id: StatusId = id("done");
        let done: Vec<_> = list.tasks_with_status(&done_id).map(|t| t.id.as_str()).collect();
        assert_eq!(done, vec!["t4", "t1", "t5", "t6"]);
        assert_eq!(task_ids(&doc), vec!["t2", "t4", "t1", "t5", "t6"]);
    }

    #[test]
    fn move_task_without_target_goes_to_end() {
        let doc = doc_with(&[("t1", "todo"), ("t2", "todo"), ("t3", "done")]);

        let doc = apply(
            &doc,
            Mutation::MoveTaskToStatus { id: id("t1"), status: id("doing"), before: Some(id("gone")) },
        );

        assert_eq!(task_ids(&doc), vec!["t2", "t3", "t1"]);
        assert_eq!(doc.lists[0].tasks[2].status_id, "doing");
    }

    #[test]
    fn move_task_before_itself_goes_to_end() {
        let doc = doc_with(&[("t1", "todo"), ("t2", "todo")]);
        let doc = apply(
            &doc,
            Mutation::MoveTaskToStatus { id: id("t1"), status: id("done"), before: Some(id("t1")) },
        );

        assert_eq!(task_ids(&doc), vec!["t2", "t1"]);
    }

    #[test]
    fn reorder_is_splice_not_swap() {
        let doc = doc_with(&[("a", "todo"), ("b", "todo"), ("c", "todo"), ("d", "todo")]);
        let moved = apply(&doc, Mutation::ReorderTasks { from: 0, to: 2 });

        // A swap would give c, b, a, d
        assert_eq!(task_ids(&moved), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn reorder_then_reverse_with_updated_indices_restores_order() {
        let doc = doc_with(&[("a", "todo"), ("b", "todo"), ("c", "todo"), ("d", "todo")]);

        for (i, j) in [(0, 3), (3, 0), (1, 2), (2, 1), (0, 1)] {
            let moved = apply(&doc, Mutation::ReorderTasks { from: i, to: j });
            // the moved element now sits at j, so moving it back is (j, i)
            let restored = apply(&moved, Mutation::ReorderTasks { from: j, to: i });
            assert_eq!(restored, doc, "reorder({}, {})", i, j);
        }
    }

    #[test]
    fn reorder_same_index_is_noop() {
        let doc = doc_with(&[("a", "todo"), ("b", "todo")]);
        let applied = Mutation::ReorderTasks { from: 1, to: 1 }.apply(&doc, &mut IdMint::new());

        assert_eq!(applied, Applied::Unchanged);
    }

    #[test]
    fn reorder_out_of_range() {
        let doc = doc_with(&[("a", "todo"), ("b", "todo"), ("c", "todo")]);

        let applied = Mutation::ReorderTasks { from: 7, to: 0 }.apply(&doc, &mut IdMint::new());
        assert_eq!(applied, Applied::Unchanged);

        let clamped = apply(&doc, Mutation::ReorderTasks { from: 0, to: 99 });
        assert_eq!(task_ids(&clamped), vec!["b", "c", "a"]);
    }

    #[test]
    fn add_list_becomes_active() {
        let doc = apply(&Document::empty(), Mutation::AddList { name: Some(" Work ".into()) });

        assert_eq!(doc.lists.len(), 2);
        let list = doc.active_list().unwrap();
        assert_eq!(list.name, "Work");
        assert_eq!(list.view, View::Table);
        assert_eq!(list.statuses, default_statuses());
        assert!(list.tasks.is_empty());
        assert_ne!(list.id, ListId::default_list());
    }

    #[test]
    fn add_list_without_name_uses_default() {
        let doc = apply(&Document::empty(), Mutation::AddList { name: None });
        assert_eq!(doc.active_list().unwrap().name, "New List");

        let doc = apply(&doc, Mutation::AddList { name: Some("   ".into()) });
        assert_eq!(doc.active_list().unwrap().name, "New List");
        assert_ne!(doc.lists[1].id, doc.lists[2].id);
    }

    #[test]
    fn rename_list() {
        let doc = apply(
            &Document::empty(),
            Mutation::RenameList { id: ListId::default_list(), name: "Inbox".into() },
        );

        assert_eq!(doc.lists[0].name, "Inbox");
    }

    #[test]
    fn delete_sole_list_is_rejected() {
        let doc = Document::empty();
        let applied = Mutation::DeleteList { id: ListId::default_list() }.apply(&doc, &mut IdMint::new());

        assert_eq!(applied, Applied::Unchanged);
    }

    #[test]
    fn delete_active_list_activates_first_remaining() {
        let doc = apply(&Document::empty(), Mutation::AddList { name: Some("Work".into()) });
        let work = doc.active_list_id.clone();

        let doc = apply(&doc, Mutation::DeleteList { id: work });
        assert_eq!(doc.lists.len(), 1);
        assert_eq!(doc.active_list_id, ListId::default_list());
    }

    #[test]
    fn delete_inactive_list_keeps_active() {
        let doc = apply(&Document::empty(), Mutation::AddList { name: Some("Work".into()) });
        let work = doc.active_list_id.clone();

        let doc = apply(&doc, Mutation::DeleteList { id: ListId::default_list() });
        assert_eq!(doc.active_list_id, work);
    }

    #[test]
    fn set_active_list() {
        let doc = apply(&Document::empty(), Mutation::AddList { name: Some("Work".into()) });
        let same = Mutation::SetActiveList { id: doc.active_list_id.clone() }.apply(&doc, &mut IdMint::new());
        assert_eq!(same, Applied::Unchanged);

        let doc = apply(&doc, Mutation::SetActiveList { id: ListId::default_list() });
        assert_eq!(doc.active_list_id, ListId::default_list());
    }

    #[test]
    fn task_edits_target_active_list_only() {
        let doc = apply(&Document::empty(), Mutation::AddList { name: Some("Work".into()) });
        let doc = apply(&doc, Mutation::AddTask { text: "deploy".into() });

        assert!(doc.lists[0].tasks.is_empty());
        assert_eq!(doc.lists[1].tasks.len(), 1);
    }

    #[test]
    fn set_view() {
        let doc = apply(&Document::empty(), Mutation::SetView { view: View::Kanban });
        assert_eq!(doc.lists[0].view, View::Kanban);

        let applied = Mutation::SetView { view: View::Kanban }.apply(&doc, &mut IdMint::new());
        assert_eq!(applied, Applied::Unchanged);
    }

    #[test]
    fn add_then_reorder_statuses() {
        let doc = apply(
            &Document::empty(),
            Mutation::AddStatus { label: "Blocked".into(), color: "#FF0000".into() },
        );
        assert_eq!(status_labels(&doc), vec!["To Do", "Doing", "Done", "Blocked"]);
        assert_eq!(doc.lists[0].statuses[3].color, "#FF0000");

        let doc = apply(&doc, Mutation::ReorderStatuses { from: 3, to: 0 });
        assert_eq!(status_labels(&doc), vec!["Blocked", "To Do", "Doing", "Done"]);
    }

    #[test]
    fn add_status_stores_label_and_color_as_given() {
        let doc = apply(
            &Document::empty(),
            Mutation::AddStatus { label: " Waiting ".into(), color: " #ABC".into() },
        );

        let added = &doc.lists[0].statuses[3];
        assert!(added.id.as_str().starts_with("status-"));
        assert_eq!(added.label, " Waiting ");
        assert_eq!(added.color, " #ABC");
    }

    #[test]
    fn update_status_keeps_position() {
        let doc = apply(
            &Document::empty(),
            Mutation::UpdateStatus { id: id("doing"), label: "In Progress".into(), color: "#123456".into() },
        );

        let status = &doc.lists[0].statuses[1];
        assert_eq!(status.id, "doing");
        assert_eq!(status.label, "In Progress");
        assert_eq!(status.color, "#123456");
    }

    #[test]
    fn delete_status_reassigns_tasks_to_first_remaining() {
        let doc = doc_with(&[("t1", "doing"), ("t2", "done"), ("t3", "doing")]);
        let doc = apply(&doc, Mutation::DeleteStatus { id: id("doing") });
        let list = doc.active_list().unwrap();

        assert!(!list.has_status(&id("doing")));
        let statuses: Vec<_> = list.tasks.iter().map(|t| t.status_id.as_str()).collect();
        assert_eq!(statuses, vec!["todo", "done", "todo"]);
        assert!(doc.violations().is_empty());
    }

    #[test]
    fn delete_first_status_falls_back_to_new_first() {
        let doc = doc_with(&[("t1", "todo")]);
        let doc = apply(&doc, Mutation::DeleteStatus { id: id("todo") });

        assert_eq!(doc.lists[0].tasks[0].status_id, "doing");
    }

    #[test]
    fn delete_last_status_falls_back_to_fixed_id() {
        let mut doc = doc_with(&[("t1", "done")]);
        for status in ["todo", "doing"] {
            doc = apply(&doc, Mutation::DeleteStatus { id: id(status) });
        }
        let doc = apply(&doc, Mutation::DeleteStatus { id: id("done") });

        assert!(doc.lists[0].statuses.is_empty());
        assert_eq!(doc.lists[0].tasks[0].status_id, StatusId::fallback());
    }

    #[test]
    fn apply_does_not_modify_input() {
        let doc = doc_with(&[("t1", "todo")]);
        let before = doc.clone();
        let _ = Mutation::DeleteTask { id: id("t1") }.apply(&doc, &mut IdMint::new());

        assert_eq!(doc, before);
    }
}
