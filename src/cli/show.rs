//! Rendering a list, and the `check` report

use std::fmt::Write as _;

use anyhow::{bail, Result};

use super::output::{truncate_str, Output};
use super::session::{resolve_list, Session};
use crate::domain::{Document, TaskList, View};

const TEXT_WIDTH: usize = 60;

/// Shows one list (the active one unless `list` names another)
pub fn show(session: &Session, output: &Output, list: Option<&str>, view: Option<View>) -> Result<()> {
    let doc = session.document();
    let list = match list {
        Some(arg) => {
            let id = resolve_list(&doc, arg)?;
            doc.list(&id).cloned()
        }
        None => doc.active_list().cloned(),
    };
    let Some(list) = list else {
        bail!("Document has no lists");
    };
    let view = view.unwrap_or(list.view);

    if output.is_json() {
        let columns: Vec<_> = list
            .columns()
            .into_iter()
            .map(|(status, tasks)| {
                serde_json::json!({
                    "status": status,
                    "tasks": tasks.iter().map(|t| t.id.to_string()).collect::<Vec<_>>(),
                })
            })
            .collect();
        output.data(&serde_json::json!({
            "active": list.id == doc.active_list_id,
            "view": view,
            "list": list,
            "columns": columns,
        }));
        return Ok(());
    }

    let text = match view {
        View::Table => render_table(&list),
        View::Kanban => render_kanban(&list),
    };
    print!("{}", text);
    Ok(())
}

fn header(list: &TaskList, view: View) -> String {
    let count = list.tasks.len();
    format!(
        "{} ({}, {} task{})\n",
        list.name,
        view,
        count,
        if count == 1 { "" } else { "s" }
    )
}

fn status_label(list: &TaskList, task: &crate::domain::Task) -> String {
    list.status(&task.status_id)
        .map(|s| s.label.clone())
        .unwrap_or_else(|| format!("?{}", task.status_id))
}

/// One row per task, in list order
pub fn render_table(list: &TaskList) -> String {
    let mut out = header(list, View::Table);
    if list.tasks.is_empty() {
        out.push_str("No tasks\n");
        return out;
    }

    let _ = writeln!(out, "{:<4} {:<20} {:<12} TEXT", "#", "ID", "STATUS");
    let _ = writeln!(out, "{}", "-".repeat(60));
    for (index, task) in list.tasks.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<4} {:<20} {:<12} {}",
            index + 1,
            task.id,
            truncate_str(&status_label(list, task), 12),
            truncate_str(&task.text, TEXT_WIDTH)
        );
    }
    out
}

/// One column per status, in status order; positions refer to the list
pub fn render_kanban(list: &TaskList) -> String {
    let mut out = header(list, View::Kanban);

    for (status, tasks) in list.columns() {
        let _ = writeln!(out, "\n{} ({})", status.label, tasks.len());
        for task in tasks {
            let position = list.task_position(&task.id).map_or(0, |p| p + 1);
            let _ = writeln!(out, "  {:>3}. {}", position, truncate_str(&task.text, TEXT_WIDTH));
        }
    }

    let orphans: Vec<_> = list
        .tasks
        .iter()
        .filter(|t| !list.has_status(&t.status_id))
        .collect();
    if !orphans.is_empty() {
        let _ = writeln!(out, "\n(unknown status) ({})", orphans.len());
        for task in orphans {
            let _ = writeln!(out, "  {} [{}]", truncate_str(&task.text, TEXT_WIDTH), task.status_id);
        }
    }
    out
}

/// Lists the lists, marking the active one
pub fn render_lists(doc: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {:<20} {:<8} {:>5}  NAME", "ID", "VIEW", "TASKS");
    for list in &doc.lists {
        let marker = if list.id == doc.active_list_id { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {:<20} {:<8} {:>5}  {}",
            marker,
            list.id,
            list.view,
            list.tasks.len(),
            list.name
        );
    }
    out
}

/// Reports dialect and invariant violations; fails if any were found
pub fn check(session: &Session, output: &Output) -> Result<()> {
    let dialect = session.model.dialect();
    let dialect_name = dialect.name();
    let legacy = dialect.is_legacy();
    let violations = dialect.into_document().violations();

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": session.path.display().to_string(),
            "dialect": dialect_name,
            "legacy": legacy,
            "violations": violations,
        }));
    } else {
        println!("{}: {}", session.path.display(), dialect_name);
        if legacy {
            println!("Legacy format; run 'todoit upgrade' to rewrite it as JSON");
        }
        for violation in &violations {
            println!("  - {}", violation);
        }
    }

    if !violations.is_empty() {
        bail!("{} invariant violation(s) found", violations.len());
    }
    output.verbose_ctx("check", "no violations");
    Ok(())
}
