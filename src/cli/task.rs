//! Task CLI commands
//!
//! All task commands act on the active list. Tasks can be named by id or
//! by their 1-based position as shown by `todoit show`.

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use super::session::{position, resolve_status, resolve_task, Session};

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to the active list
    Add {
        /// Task text
        text: String,
    },

    /// Replace a task's text
    Edit {
        /// Task ID or position
        task: String,

        /// New text
        text: String,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm {
        /// Task ID or position
        task: String,
    },

    /// Set a task's status without moving it
    Status {
        /// Task ID or position
        task: String,

        /// Status ID or label
        status: String,
    },

    /// Move a task into a status column, optionally before another task
    ///
    /// Examples:
    ///   todoit task move 3 done             # append to the Done column
    ///   todoit task move 3 done --before 5  # place right before task 5
    Move {
        /// Task ID or position
        task: String,

        /// Status ID or label
        status: String,

        /// Task to insert before (ID or position)
        #[arg(long)]
        before: Option<String>,
    },

    /// Move the task at one position to another
    Reorder {
        /// Current position (1-based)
        from: usize,

        /// New position (1-based)
        to: usize,
    },
}

pub fn run(cmd: TaskCommands, session: &Session, output: &Output) -> Result<()> {
    let model = &session.model;
    let doc = session.document();

    match cmd {
        TaskCommands::Add { text } => {
            let outcome = model.add_task(&text)?;
            output.outcome("add_task", outcome, &format!("Added task: {}", text.trim()));
        }
        TaskCommands::Edit { task, text } => {
            let id = resolve_task(&doc, &task)?;
            let outcome = model.edit_task(&id, &text)?;
            output.outcome("edit_task", outcome, &format!("Edited task: {}", id));
        }
        TaskCommands::Rm { task } => {
            let id = resolve_task(&doc, &task)?;
            let outcome = model.delete_task(&id)?;
            output.outcome("delete_task", outcome, &format!("Deleted task: {}", id));
        }
        TaskCommands::Status { task, status } => {
            let id = resolve_task(&doc, &task)?;
            let status = resolve_status(&doc, &status)?;
            let outcome = model.change_status(&id, &status)?;
            output.outcome(
                "change_status",
                outcome,
                &format!("Task {} is now {}", id, status),
            );
        }
        TaskCommands::Move { task, status, before } => {
            let id = resolve_task(&doc, &task)?;
            let status = resolve_status(&doc, &status)?;
            let before = before.map(|b| resolve_task(&doc, &b)).transpose()?;
            output.verbose_ctx("task", &format!("move {} to {} before {:?}", id, status, before));

            let outcome = model.move_task_to_status(&id, &status, before.as_ref())?;
            output.outcome(
                "move_task_to_status",
                outcome,
                &format!("Moved task {} to {}", id, status),
            );
        }
        TaskCommands::Reorder { from, to } => {
            let outcome = model.reorder_tasks(position(from)?, position(to)?)?;
            output.outcome(
                "reorder_tasks",
                outcome,
                &format!("Moved task from position {} to {}", from, to),
            );
        }
    }

    Ok(())
}
