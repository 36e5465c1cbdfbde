//! Status CLI commands
//!
//! Statuses belong to the active list; each list has its own set.

use anyhow::{bail, Result};
use clap::Subcommand;

use super::output::Output;
use super::session::{position, resolve_status, Session};

#[derive(Subcommand)]
pub enum StatusCommands {
    /// Show the active list's statuses in column order
    Ls,

    /// Add a status at the end
    Add {
        /// Label shown as the column title
        label: String,

        /// Color (defaults to `[status] default_color`)
        #[arg(long)]
        color: Option<String>,
    },

    /// Change a status's label and/or color
    Update {
        /// Status ID or label
        status: String,

        #[arg(long)]
        label: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a status; its tasks move to the first remaining status
    #[command(alias = "delete")]
    Rm {
        /// Status ID or label
        status: String,
    },

    /// Move the status at one position to another
    Reorder {
        /// Current position (1-based)
        from: usize,

        /// New position (1-based)
        to: usize,
    },
}

pub fn run(cmd: StatusCommands, session: &Session, output: &Output) -> Result<()> {
    let model = &session.model;
    let doc = session.document();

    match cmd {
        StatusCommands::Ls => {
            let Some(list) = doc.active_list() else {
                bail!("Document has no lists");
            };
            if output.is_json() {
                output.data(&list.statuses);
            } else {
                println!("{:<4} {:<20} {:<10} {:>5}  LABEL", "#", "ID", "COLOR", "TASKS");
                for (index, status) in list.statuses.iter().enumerate() {
                    println!(
                        "{:<4} {:<20} {:<10} {:>5}  {}",
                        index + 1,
                        status.id,
                        status.color,
                        list.tasks_with_status(&status.id).count(),
                        status.label
                    );
                }
            }
        }
        StatusCommands::Add { label, color } => {
            let label = label.trim();
            if label.is_empty() {
                bail!("Status label must not be empty");
            }
            let color = color.unwrap_or_else(|| session.config.project.status.default_color.clone());
            let outcome = model.add_status(label, &color)?;
            output.outcome("add_status", outcome, &format!("Added status: {}", label));
        }
        StatusCommands::Update { status, label, color } => {
            let id = resolve_status(&doc, &status)?;
            let Some(current) = doc.active_list().and_then(|l| l.status(&id)) else {
                bail!("Status not found: {}", status);
            };
            let label = label.unwrap_or_else(|| current.label.clone());
            let color = color.unwrap_or_else(|| current.color.clone());

            let outcome = model.update_status(&id, &label, &color)?;
            output.outcome("update_status", outcome, &format!("Updated status: {}", id));
        }
        StatusCommands::Rm { status } => {
            let id = resolve_status(&doc, &status)?;
            let outcome = model.delete_status(&id)?;
            output.outcome("delete_status", outcome, &format!("Deleted status: {}", id));
        }
        StatusCommands::Reorder { from, to } => {
            let outcome = model.reorder_statuses(position(from)?, position(to)?)?;
            output.outcome(
                "reorder_statuses",
                outcome,
                &format!("Moved status from position {} to {}", from, to),
            );
        }
    }

    Ok(())
}
