//! One-shot listeners for "wait until a matching message arrives".
//!
//! The update handler offers every incoming message to [`MessageWaiters::dispatch`].
//! A game registers a predicate and awaits the receiving end until its deadline.

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::debug;

use crate::game::message::IncomingMessage;

/// Predicate deciding whether a listener wants a message.
pub type MessageFilter = Box<dyn Fn(&IncomingMessage) -> bool + Send + Sync>;

/// Handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The deadline passed before a matching message arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitElapsed;

impl fmt::Display for WaitElapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timed out waiting for a matching message")
    }
}

impl std::error::Error for WaitElapsed {}

struct Listener {
    id: ListenerId,
    filter: MessageFilter,
    tx: oneshot::Sender<IncomingMessage>,
}

/// Registry of pending listeners, shared between the update handler and games.
#[derive(Default)]
pub struct MessageWaiters {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl MessageWaiters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a one-shot listener.
    pub fn register(&self, filter: MessageFilter) -> (ListenerId, oneshot::Receiver<IncomingMessage>) {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = oneshot::channel();
        self.lock().push(Listener { id, filter, tx });
        (id, rx)
    }

    /// Remove a listener. Returns false if it already fired or was removed.
    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        listeners.len() != before
    }

    /// Hand `msg` to the oldest listener that wants it.
    ///
    /// Returns true if a listener consumed the message.
    pub fn dispatch(&self, msg: &IncomingMessage) -> bool {
        let mut listeners = self.lock();
        // Drop listeners whose receiver is gone
        listeners.retain(|l| !l.tx.is_closed());

        // A receiver can still be dropped by a deadline after the prune above.
        // Such a listener is discarded and the message goes to the next match.
        while let Some(pos) = listeners.iter().position(|l| (l.filter)(msg)) {
            let listener = listeners.remove(pos);
            if listener.tx.send(msg.clone()).is_ok() {
                debug!("Message {} consumed by listener {:?}", msg.message_id, listener.id);
                return true;
            }
            debug!("Listener {:?} gone before message {}", listener.id, msg.message_id);
        }
        false
    }

    /// Wait for a message passing `filter`, giving up at `deadline`.
    ///
    /// The listener is unregistered before returning on timeout.
    pub async fn wait_for(
        &self,
        filter: MessageFilter,
        deadline: Instant,
    ) -> Result<IncomingMessage, WaitElapsed> {
        let (id, rx) = self.register(filter);
        match tokio::time::timeout_at(deadline, rx).await {
            Ok(Ok(msg)) => Ok(msg),
            // Sender dropped without a message; treat like running out of time
            Ok(Err(_)) | Err(_) => {
                self.unregister(id);
                Err(WaitElapsed)
            }
        }
    }

    /// Number of listeners still registered.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Listener>> {
        // A panic while holding the lock cannot leave the Vec half-updated
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }
}
