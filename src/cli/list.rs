//! List CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use super::session::{resolve_list, Session};
use super::show::render_lists;
use crate::domain::View;

#[derive(Subcommand)]
pub enum ListCommands {
    /// Show all lists; the active one is marked with *
    Ls,

    /// Add a list and make it active
    Add {
        /// List name (defaults to `[document] new_list_name`)
        name: Option<String>,
    },

    /// Rename a list
    Rename {
        /// List ID or name
        list: String,

        /// New name
        name: String,
    },

    /// Delete a list (the last remaining list cannot be deleted)
    #[command(alias = "delete")]
    Rm {
        /// List ID or name
        list: String,
    },

    /// Make a list active
    Use {
        /// List ID or name
        list: String,
    },

    /// Set how the active list is shown
    View {
        #[arg(value_parser = parse_view)]
        view: View,
    },
}

pub(crate) fn parse_view(s: &str) -> Result<View, String> {
    match s.to_ascii_lowercase().as_str() {
        "table" => Ok(View::Table),
        "kanban" | "board" => Ok(View::Kanban),
        other => Err(format!("unknown view '{}', expected table or kanban", other)),
    }
}

pub fn run(cmd: ListCommands, session: &Session, output: &Output) -> Result<()> {
    let model = &session.model;
    let doc = session.document();

    match cmd {
        ListCommands::Ls => {
            if output.is_json() {
                let lists: Vec<_> = doc
                    .lists
                    .iter()
                    .map(|l| {
                        serde_json::json!({
                            "id": l.id,
                            "name": l.name,
                            "view": l.view,
                            "tasks": l.tasks.len(),
                            "active": l.id == doc.active_list_id,
                        })
                    })
                    .collect();
                output.data(&lists);
            } else {
                print!("{}", render_lists(&doc));
            }
        }
        ListCommands::Add { name } => {
            let name = name.unwrap_or_else(|| session.config.project.document.new_list_name.clone());
            let outcome = model.add_list(Some(&name))?;
            output.outcome("add_list", outcome, &format!("Added list: {}", name.trim()));
        }
        ListCommands::Rename { list, name } => {
            let id = resolve_list(&doc, &list)?;
            let outcome = model.rename_list(&id, &name)?;
            output.outcome("rename_list", outcome, &format!("Renamed list {} to {}", id, name));
        }
        ListCommands::Rm { list } => {
            let id = resolve_list(&doc, &list)?;
            let outcome = model.delete_list(&id)?;
            output.outcome("delete_list", outcome, &format!("Deleted list: {}", id));
        }
        ListCommands::Use { list } => {
            let id = resolve_list(&doc, &list)?;
            let outcome = model.set_active_list(&id)?;
            output.outcome("set_active_list", outcome, &format!("Active list: {}", id));
        }
        ListCommands::View { view } => {
            let outcome = model.set_view(view)?;
            output.outcome("set_view", outcome, &format!("View set to {}", view));
        }
    }

    Ok(())
}
