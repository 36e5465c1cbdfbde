//! In-process document store
//!
//! Holds the text in memory. Every accepted write is reported back to
//! subscribers, the way an editor host reports all edits to a document
//! including the ones we made, so channels see real echoes.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::store::{ChangeSink, DocumentStore, StoreError, Subscription};

#[derive(Default)]
struct Inner {
    text: String,
    writes: Vec<String>,
    reject_writes: Option<String>,
    echo_writes: bool,
    sinks: Vec<(u64, ChangeSink)>,
    next_sink: u64,
}

/// Store backed by a string in memory
#[derive(Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

/// Removes a sink when the subscription is dropped
struct SinkGuard {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.sinks.retain(|(id, _)| *id != self.id);
        }
    }
}

impl MemoryStore {
    /// Creates a store holding `text` that echoes writes to subscribers
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                text: text.into(),
                echo_writes: true,
                ..Inner::default()
            })),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current stored text
    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    /// Every text written through [`DocumentStore::write`], oldest first
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    /// Makes subsequent writes fail with `reason`, or succeed again with `None`
    pub fn reject_writes(&self, reason: Option<&str>) {
        self.lock().reject_writes = reason.map(str::to_string);
    }

    /// Whether accepted writes are reported back to subscribers
    pub fn set_echo_writes(&self, echo: bool) {
        self.lock().echo_writes = echo;
    }

    /// Replaces the text as if someone else edited it, notifying subscribers
    pub fn edit_externally(&self, text: impl Into<String>) {
        let text = text.into();
        let sinks = {
            let mut inner = self.lock();
            inner.text = text.clone();
            inner.sinks.iter().map(|(_, s)| s.clone()).collect::<Vec<_>>()
        };
        for sink in sinks {
            sink(text.clone());
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.lock().sinks.len()
    }
}

impl DocumentStore for MemoryStore {
    fn read(&self) -> Result<String, StoreError> {
        Ok(self.text())
    }

    fn write(&self, text: &str) -> Result<(), StoreError> {
        let echo_to = {
            let mut inner = self.lock();
            if let Some(reason) = &inner.reject_writes {
                return Err(StoreError::Rejected(reason.clone()));
            }
            inner.text = text.to_string();
            inner.writes.push(text.to_string());
            if inner.echo_writes {
                inner.sinks.iter().map(|(_, s)| s.clone()).collect()
            } else {
                Vec::new()
            }
        };

        for sink in echo_to {
            sink(text.to_string());
        }
        Ok(())
    }

    fn subscribe(&self, sink: ChangeSink) -> Result<Subscription, StoreError> {
        let mut inner = self.lock();
        let id = inner.next_sink;
        inner.next_sink += 1;
        inner.sinks.push((id, sink));

        Ok(Subscription::new(SinkGuard {
            id,
            inner: Arc::downgrade(&self.inner),
        }))
    }
}
