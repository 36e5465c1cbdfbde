//! # Storage Layer
//!
//! Where the document text lives, and the configuration that says where.
//!
//! ## Stores
//!
//! | Store | Backing | Change reports |
//! |-------|---------|----------------|
//! | [`FileStore`] | one file on disk | debounced directory watcher |
//! | [`MemoryStore`] | a string | every write and external edit |
//!
//! Both report our own writes back to subscribers; the text channel in
//! [`crate::sync`] is what tells echoes from real external edits.
//!
//! ## Concurrency Safety
//!
//! - [`FileStore`] uses file locking (`fs2`): shared for reads, exclusive for writes
//! - All file writes are atomic (temp file + rename)
//!
//! ## Configuration
//!
//! | File | Location |
//! |------|----------|
//! | Project | `todoit.toml`, nearest ancestor of the working directory |
//! | Global | `config.toml` in the platform config dir |

mod config;
mod file;
mod memory;
mod store;

pub use config::{
    Config, ConfigError, DocumentConfig, GlobalConfig, OutputFormat, ProjectConfig, StatusConfig,
    WatchConfig, DEFAULT_DOCUMENT_FILE, PROJECT_CONFIG_FILE,
};
pub use file::{FileStore, DEFAULT_DEBOUNCE};
pub use memory::MemoryStore;
pub use store::{ChangeSink, DocumentStore, StoreError, Subscription};
