//! Legacy input dialects
//!
//! Two older formats are read and upgraded to the current model, never
//! written back:
//!
//! - Checkbox lines, one task per line:
//!
//!   ```text
//!   - [ ] buy milk
//!   [*] write report
//!   [x] done thing
//!   ```
//!
//!   ` ` is todo, `*` is doing, `x`/`X` is done. Anything after the marker,
//!   even only whitespace, makes a task; other lines are dropped.
//!
//! - Single-status JSON, where each task carries one of the three fixed
//!   status names: `[{"text": "...", "status": "doing"}]`, optionally wrapped
//!   as `{"tasks": [...]}`.
//!
//! Both decode to one "Default" list with the default statuses. Task ids are
//! positional (`task-{line}-{slug}`) so re-reading unchanged text yields the
//! same ids.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{LegacyStatus, Task, TaskId};

static CHECKBOX_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:- )?\[([ *xX])\]\s*(.+)$").expect("checkbox pattern is valid")
});

/// Splits on CRLF, CR or LF
fn lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split("\r\n").flat_map(|chunk| chunk.split(['\r', '\n']))
}

/// Parses checkbox lines; unmatched lines are skipped but still counted
pub fn parse_checkbox_lines(raw: &str) -> Vec<Task> {
    lines(raw)
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = CHECKBOX_LINE.captures(line)?;
            let marker = caps.get(1)?.as_str().chars().next()?;
            let status = LegacyStatus::from_marker(marker)?;
            let body = caps.get(2)?.as_str().trim();
            Some(Task::new(TaskId::legacy(index, body), body, status.status_id()))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct SingleStatusTask {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    status: Option<String>,
}

/// Parses the single-status JSON dialect, or `None` if `value` is not in it
pub fn parse_single_status(value: &Value) -> Option<Vec<Task>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) if !map.contains_key("lists") => map.get("tasks")?.as_array()?,
        _ => return None,
    };

    let parsed: Vec<SingleStatusTask> = items
        .iter()
        .map(SingleStatusTask::deserialize)
        .collect::<Result<_, _>>()
        .ok()?;

    Some(
        parsed
            .into_iter()
            .enumerate()
            .map(|(index, task)| {
                let text = task.text.trim().to_string();
                let id = task
                    .id
                    .and_then(|id| id.parse().ok())
                    .unwrap_or_else(|| TaskId::legacy(index, &text));
                let status = task
                    .status
                    .as_deref()
                    .and_then(LegacyStatus::from_name)
                    .unwrap_or(LegacyStatus::Todo);
                Task::new(id, text, status.status_id())
            })
            .collect(),
    )
}
