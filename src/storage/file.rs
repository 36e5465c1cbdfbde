//! Document store backed by a file on disk
//!
//! Reads take a shared lock; writes go to a sibling temp file under an
//! exclusive lock and are renamed into place, so a watcher never sees a
//! half-written document. Changes are picked up with a debounced watcher on
//! the parent directory, which also survives editors that replace the file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs2::FileExt;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use tracing::{debug, warn};

use super::store::{ChangeSink, DocumentStore, StoreError, Subscription};

/// Default quiet period before a burst of file events is reported
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Store for one document file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    debounce: Duration,
}

impl FileStore {
    /// Creates a store for the file at `path`; the file need not exist yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn read_error(&self, source: io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Reads `path` under a shared lock; a missing file reads as empty
fn read_locked(path: &Path) -> io::Result<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(e),
    };

    file.lock_shared()?;
    let mut text = String::new();
    (&file).read_to_string(&mut text)?;
    // Lock is released when file is dropped
    Ok(text)
}

impl DocumentStore for FileStore {
    fn read(&self) -> Result<String, StoreError> {
        read_locked(&self.path).map_err(|e| self.read_error(e))
    }

    fn write(&self, text: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let temp_path = self.temp_path();
        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| self.write_error(e))?;

            file.lock_exclusive().map_err(|e| self.write_error(e))?;

            let mut writer = BufWriter::new(&file);
            writer
                .write_all(text.as_bytes())
                .and_then(|()| writer.flush())
                .map_err(|e| self.write_error(e))?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path).map_err(|e| self.write_error(e))?;
        debug!(path = %self.path.display(), bytes = text.len(), "wrote document");
        Ok(())
    }

    fn subscribe(&self, sink: ChangeSink) -> Result<Subscription, StoreError> {
        let watch_error = |e: notify::Error| StoreError::Watch {
            path: self.path.clone(),
            message: e.to_string(),
        };

        let path = self.path.clone();
        let file_name = self.path.file_name().map(|n| n.to_os_string());

        let mut debouncer = new_debouncer(self.debounce, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let touched = events
                        .iter()
                        .any(|e| e.path.file_name().map(|n| n.to_os_string()) == file_name);
                    if !touched {
                        return;
                    }
                    match read_locked(&path) {
                        Ok(text) => sink(text),
                        Err(e) => warn!("Failed to re-read {}: {}", path.display(), e),
                    }
                }
                Err(error) => warn!("Watch error: {:?}", error),
            }
        })
        .map_err(watch_error)?;

        // The directory must exist to be watched, even before the first write
        let dir = self.watch_dir();
        fs::create_dir_all(&dir).map_err(|e| StoreError::Watch {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;

        debug!(dir = %dir.display(), "watching for document changes");
        Ok(Subscription::new(debouncer))
    }
}
