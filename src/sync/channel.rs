//! Two-way text sync with echo suppression
//!
//! A [`TextChannel`] holds the authoritative copy of the document text.
//! Local edits update it immediately and are forwarded to the store; the
//! store's change notifications come back through
//! [`TextChannel::on_external_change`]. A notification whose text equals the
//! last value the channel sent is an echo and is dropped, so a local write
//! never loops back into a re-decode.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{debug, trace, warn};

use super::SyncError;
use crate::storage::{ChangeSink, DocumentStore, Subscription};

/// Handle returned by [`TextChannel::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&str) + Send + Sync>;

/// What [`TextChannel::on_external_change`] did with a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalChange {
    /// The text was new; the copy was replaced and listeners notified
    Applied,
    /// The text was our own last write coming back; nothing happened
    Echo,
}

#[derive(Debug, Default)]
struct ChannelState {
    text: String,
    last_sent: Option<String>,
}

/// Authoritative in-memory copy of the document text
pub struct TextChannel {
    state: Mutex<ChannelState>,
    listeners: RwLock<Vec<(ListenerId, Listener)>>,
    next_listener: AtomicU64,
    store: Option<Arc<dyn DocumentStore>>,
    subscription: Mutex<Option<Subscription>>,
}

impl TextChannel {
    fn with_store(store: Option<Arc<dyn DocumentStore>>, initial: String) -> Self {
        Self {
            state: Mutex::new(ChannelState {
                last_sent: Some(initial.clone()),
                text: initial,
            }),
            listeners: RwLock::new(Vec::new()),
            next_listener: AtomicU64::new(0),
            store,
            subscription: Mutex::new(None),
        }
    }

    /// A channel with no store; local edits only update the in-memory copy
    pub fn detached(initial: impl Into<String>) -> Self {
        Self::with_store(None, initial.into())
    }

    /// A channel that writes to `store` but does not listen to it
    pub fn new(store: Arc<dyn DocumentStore>, initial: impl Into<String>) -> Self {
        Self::with_store(Some(store), initial.into())
    }

    /// Subscribes to the store's changes, then reads its current text
    ///
    /// The subscription lives as long as the returned channel; it holds only
    /// a weak reference, so dropping the last `Arc` ends delivery. The read
    /// happens under the state lock, so a change reported meanwhile is
    /// compared against the text actually read.
    pub fn connect(store: Arc<dyn DocumentStore>) -> Result<Arc<Self>, SyncError> {
        let channel = Arc::new(Self::new(store.clone(), String::new()));

        let weak = Arc::downgrade(&channel);
        let sink: ChangeSink = Arc::new(move |text: String| {
            if let Some(channel) = weak.upgrade() {
                channel.on_external_change(&text);
            }
        });
        let subscription = store.subscribe(sink)?;

        {
            let mut state = lock(&channel.state);
            let initial = store.read()?;
            state.last_sent = Some(initial.clone());
            state.text = initial;
        }
        *lock(&channel.subscription) = Some(subscription);

        debug!("text channel connected");
        Ok(channel)
    }

    /// The last known text
    pub fn current_text(&self) -> String {
        lock(&self.state).text.clone()
    }

    /// Whether a store is attached
    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    /// Records a local edit and forwards it to the store
    ///
    /// The in-memory copy is updated before the store is called and is not
    /// rolled back if the write fails.
    pub fn set_local(&self, text: &str) -> Result<(), SyncError> {
        {
            let mut state = lock(&self.state);
            state.text = text.to_string();
            state.last_sent = Some(text.to_string());
        }

        let Some(store) = &self.store else {
            return Ok(());
        };
        store.write(text).map_err(|e| {
            warn!("document write failed, keeping local copy: {e}");
            SyncError::from(e)
        })
    }

    /// Handles a change reported by the store
    pub fn on_external_change(&self, text: &str) -> ExternalChange {
        {
            let mut state = lock(&self.state);
            if state.last_sent.as_deref() == Some(text) {
                trace!(bytes = text.len(), "suppressed echo of our own write");
                return ExternalChange::Echo;
            }
            state.text = text.to_string();
            state.last_sent = Some(text.to_string());
        }

        debug!(bytes = text.len(), "applied external change");
        let listeners: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(text);
        }
        ExternalChange::Applied
    }

    /// Calls `listener` with the new text after every applied external change
    pub fn subscribe(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(listener)));
        id
    }

    /// Removes a listener; returns false if it was not registered
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

impl std::fmt::Debug for TextChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextChannel")
            .field("state", &*lock(&self.state))
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
