//! `todoit watch`: report external edits as they happen
//!
//! Our own writes never show up here; the channel drops their echoes.

use std::sync::mpsc;
use std::sync::Mutex;

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use super::session::Session;
use crate::domain::Document;

/// One-line description of a document after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub lists: usize,
    pub active: String,
    pub tasks: usize,
    pub columns: Vec<(String, usize)>,
}

impl Summary {
    pub fn of(doc: &Document) -> Self {
        let active = doc.active_list();
        Self {
            lists: doc.lists.len(),
            active: active.map(|l| l.name.clone()).unwrap_or_default(),
            tasks: active.map_or(0, |l| l.tasks.len()),
            columns: active
                .map(|l| {
                    l.columns()
                        .into_iter()
                        .map(|(status, tasks)| (status.label.clone(), tasks.len()))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn line(&self) -> String {
        let columns: Vec<_> = self
            .columns
            .iter()
            .map(|(label, n)| format!("{} {}", label, n))
            .collect();
        format!(
            "{}: {} task(s) [{}] ({} list(s))",
            self.active,
            self.tasks,
            columns.join(", "),
            self.lists
        )
    }
}

/// Blocks, printing a summary after each external change
///
/// Stops after `limit` changes when given.
pub fn run(session: &Session, output: &Output, limit: Option<usize>) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    session.model.subscribe(move |doc| {
        if let Ok(tx) = tx.lock() {
            let _ = tx.send(Summary::of(doc));
        }
    });

    if !output.is_json() {
        println!("Watching {} (Ctrl-C to stop)", session.path.display());
        println!("{}", Summary::of(&session.document()).line());
    }

    let mut seen = 0;
    while limit.map_or(true, |limit| seen < limit) {
        match rx.recv() {
            Ok(summary) => {
                seen += 1;
                if output.is_json() {
                    output.data(&summary);
                } else {
                    println!("{}", summary.line());
                }
            }
            Err(e) => {
                output.verbose_ctx("watch", &format!("Channel error: {}", e));
                break;
            }
        }
    }

    Ok(())
}
