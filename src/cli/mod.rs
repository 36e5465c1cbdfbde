//! # Command-Line Interface
//!
//! User-facing commands over one document file.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | File setup and inspection | `init`, `show`, `check`, `upgrade`, `watch` |
//! | Task | Edit tasks in the active list | `task add`, `task move`, `task reorder` |
//! | List | Manage lists | `list add`, `list use`, `list view` |
//! | Status | Manage the active list's statuses | `status add`, `status rm` |
//!
//! Every editing command maps to one [`crate::sync::DocumentModel`]
//! operation. Commands that change nothing print "No change" and leave the
//! file untouched.
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; `TODOIT_LOG` sets the log
//! filter directly:
//! ```bash
//! TODOIT_LOG=todoit=trace todoit show
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod list;
mod output;
mod session;
mod show;
mod status;
mod task;
mod watch;

pub use app::{run, Cli, Commands, DocumentCommands};
pub use output::{Output, OutputFormat};
