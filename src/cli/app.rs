//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::output::{Output, OutputFormat};
use super::session::Session;
use super::{list, show, status, task, watch};
use crate::domain::View;
use crate::storage::{Config, ProjectConfig};
use crate::sync::Outcome;

#[derive(Parser)]
#[command(name = "todoit")]
#[command(author, version, about = "Task lists in a plain file, with board and table views")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Document file (defaults to `[document] file` in todoit.toml, then todo.todoit)
    #[arg(long, short = 'F', global = true, env = "TODOIT_FILE")]
    pub file: Option<PathBuf>,

    /// Output format (defaults to `default_format` from config)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the document and a todoit.toml in the current directory
    Init {
        /// Skip writing todoit.toml
        #[arg(long)]
        no_config: bool,
    },

    #[command(flatten)]
    Document(DocumentCommands),
}

/// Commands that open the document
#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Show the active list as a table or board
    Show {
        /// List ID or name to show instead of the active one
        #[arg(long)]
        list: Option<String>,

        /// Override the list's view
        #[arg(long, value_parser = super::list::parse_view)]
        view: Option<View>,
    },

    /// Rewrite a legacy checkbox or single-status file as JSON
    Upgrade,

    /// Report the file's format and any invariant violations
    Check,

    /// Print a summary whenever the file is changed by someone else
    Watch {
        /// Exit after this many changes
        #[arg(long)]
        count: Option<usize>,
    },

    /// Manage tasks in the active list
    #[command(subcommand)]
    Task(task::TaskCommands),

    /// Manage lists
    #[command(subcommand)]
    List(list::ListCommands),

    /// Manage the active list's statuses
    #[command(subcommand)]
    Status(status::StatusCommands),
}

/// Installs the log subscriber; `TODOIT_LOG` overrides the default filter
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TODOIT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "todoit=debug,warn" } else { "todoit=warn" })
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    let format = cli.format.unwrap_or_else(|| config.format().into());
    let output = Output::new(format, cli.verbose);

    output.verbose("todoit starting");

    match cli.command {
        Commands::Init { no_config } => init(config, cli.file, no_config, &output),
        Commands::Document(cmd) => {
            let session = Session::open(config, cli.file.as_deref())?;
            output.verbose(&format!("Using document: {}", session.path.display()));
            run_document(cmd, &session, &output)
        }
    }
}

fn run_document(cmd: DocumentCommands, session: &Session, output: &Output) -> Result<()> {
    match cmd {
        DocumentCommands::Show { list, view } => show::show(session, output, list.as_deref(), view)?,
        DocumentCommands::Upgrade => {
            let from = session.model.dialect().name();
            let outcome = session.model.upgrade()?;
            output.outcome(
                "upgrade",
                outcome,
                &format!("Upgraded {} from {}", session.path.display(), from),
            );
        }
        DocumentCommands::Check => show::check(session, output)?,
        DocumentCommands::Watch { count } => watch::run(session, output, count)?,
        DocumentCommands::Task(cmd) => task::run(cmd, session, output)?,
        DocumentCommands::List(cmd) => list::run(cmd, session, output)?,
        DocumentCommands::Status(cmd) => status::run(cmd, session, output)?,
    }

    Ok(())
}

fn init(config: Config, file: Option<PathBuf>, no_config: bool, output: &Output) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    let config = if !no_config && config.project_root.is_none() {
        let path = Config::init_project(&cwd, &ProjectConfig::default())?;
        output.verbose_ctx("init", &format!("Wrote {}", path.display()));
        Config::for_project(&cwd)?
    } else {
        config
    };

    let session = Session::open(config, file.as_deref())?;

    if session.model.dialect().is_legacy() {
        output.success(&format!(
            "{} is in a legacy format; run 'todoit upgrade' to convert it",
            session.path.display()
        ));
        return Ok(());
    }

    match session.model.upgrade()? {
        Outcome::Changed => output.success(&format!("Created {}", session.path.display())),
        Outcome::Unchanged => output.success(&format!("{} already exists", session.path.display())),
    }
    Ok(())
}
