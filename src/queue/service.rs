//! Main alarm queue implementation.
//!
//! Provides the public `AlarmQueue` handle and its blocking send/receive
//! protocol built on one lock and two condition variables.

use super::error::{Error, Result, SendError};
use super::sync::{self, Arc, Condvar, Mutex, MutexGuard};
use super::types::{Entries, Message, MsgKind};
use tracing::{debug, info, trace};

/// Internal state shared by every handle.
pub(crate) struct AlarmQueueInner<T> {
    /// Queued entries and the destroyed flag.
    pub(crate) entries: Mutex<Entries<T>>,
    /// Signalled when an entry is inserted.
    pub(crate) entries_available: Condvar,
    /// Signalled when the queued alarm is delivered.
    pub(crate) alarm_slot_free: Condvar,
}

/// Blocking two-level message queue.
///
/// At most one ALARM message is queued at a time; a second ALARM send blocks
/// until the first is received. ALARM messages are delivered ahead of every
/// NORMAL message, and NORMAL messages are delivered in send order.
///
/// Cloning the handle is cheap; all clones refer to the same queue.
pub struct AlarmQueue<T> {
    pub(crate) inner: Arc<AlarmQueueInner<T>>,
}

impl<T> Clone for AlarmQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for AlarmQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for AlarmQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.lock();
        f.debug_struct("AlarmQueue")
            .field("size", &entries.len())
            .field("alarms", &entries.alarm_count())
            .field("destroyed", &entries.destroyed)
            .finish()
    }
}

impl<T> AlarmQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AlarmQueueInner {
                entries: Mutex::new(Entries::new()),
                entries_available: Condvar::new(),
                alarm_slot_free: Condvar::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Entries<T>> {
        sync::lock(&self.inner.entries)
    }

    /// Send a message, blocking while an ALARM send finds the alarm slot taken.
    ///
    /// NORMAL sends never block.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] if the queue has been destroyed,
    /// including while the caller was blocked. The payload is handed back
    /// inside the [`SendError`].
    pub fn send(&self, payload: T, kind: MsgKind) -> std::result::Result<(), SendError<T>> {
        let mut entries = self.lock();

        if kind.is_alarm() && entries.has_alarm() && !entries.destroyed {
            debug!("alarm slot occupied, sender waiting");
            while entries.has_alarm() && !entries.destroyed {
                entries = sync::wait(&self.inner.alarm_slot_free, entries);
            }
        }

        if entries.destroyed {
            return Err(SendError::new(Error::Uninitialized, payload));
        }

        self.enqueue(entries, payload, kind);
        Ok(())
    }

    /// Send without blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRoom`] for an ALARM send while an alarm is queued
    /// - [`Error::Uninitialized`] if the queue has been destroyed
    pub fn try_send(&self, payload: T, kind: MsgKind) -> std::result::Result<(), SendError<T>> {
        let entries = self.lock();

        if entries.destroyed {
            return Err(SendError::new(Error::Uninitialized, payload));
        }
        if kind.is_alarm() && entries.has_alarm() {
            return Err(SendError::new(Error::NoRoom, payload));
        }

        self.enqueue(entries, payload, kind);
        Ok(())
    }

    fn enqueue(&self, mut entries: MutexGuard<'_, Entries<T>>, payload: T, kind: MsgKind) {
        entries.insert(payload, kind);
        trace!(%kind, size = entries.len(), "message enqueued");
        self.inner.entries_available.notify_one();
    }

    /// Receive the next message, blocking while the queue is empty.
    ///
    /// A queued ALARM is always returned before any NORMAL message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] if the queue has been destroyed,
    /// including while the caller was blocked.
    pub fn receive(&self) -> Result<Message<T>> {
        let mut entries = self.lock();

        if entries.is_empty() && !entries.destroyed {
            debug!("queue empty, receiver waiting");
            while entries.is_empty() && !entries.destroyed {
                entries = sync::wait(&self.inner.entries_available, entries);
            }
        }

        self.dequeue(entries).ok_or(Error::Uninitialized)
    }

    /// Receive without blocking.
    ///
    /// # Errors
    ///
    /// - [`Error::NoMessage`] if the queue is empty
    /// - [`Error::Uninitialized`] if the queue has been destroyed
    pub fn try_receive(&self) -> Result<Message<T>> {
        let entries = self.lock();

        if entries.destroyed {
            return Err(Error::Uninitialized);
        }
        if entries.is_empty() {
            return Err(Error::NoMessage);
        }

        self.dequeue(entries).ok_or(Error::NoMessage)
    }

    /// Take the next entry unless the queue is destroyed or empty.
    fn dequeue(&self, mut entries: MutexGuard<'_, Entries<T>>) -> Option<Message<T>> {
        if entries.destroyed {
            return None;
        }

        let message = entries.take_next()?;
        trace!(kind = %message.kind, size = entries.len(), "message dequeued");

        if message.kind.is_alarm() {
            self.inner.alarm_slot_free.notify_one();
        }
        Some(message)
    }

    /// Number of queued messages (ALARM + NORMAL).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] if the queue has been destroyed.
    pub fn size(&self) -> Result<usize> {
        let entries = self.lock();
        if entries.destroyed {
            return Err(Error::Uninitialized);
        }
        Ok(entries.len())
    }

    /// Number of queued ALARM messages: 0 or 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Uninitialized`] if the queue has been destroyed.
    pub fn alarm_count(&self) -> Result<usize> {
        let entries = self.lock();
        if entries.destroyed {
            return Err(Error::Uninitialized);
        }
        Ok(entries.alarm_count())
    }

    /// Returns true once [`AlarmQueue::destroy`] has been called on any handle.
    pub fn is_destroyed(&self) -> bool {
        self.lock().destroyed
    }

    /// Destroy the queue and return the entries still queued, in delivery order.
    ///
    /// Every blocked sender and receiver wakes with [`Error::Uninitialized`],
    /// as does every later operation. Calling this twice returns an empty
    /// vector the second time. Lock and condition storage is released when
    /// the last handle is dropped.
    pub fn destroy(&self) -> Vec<Message<T>> {
        let drained = {
            let mut entries = self.lock();
            if entries.destroyed {
                return Vec::new();
            }
            entries.destroyed = true;
            entries.drain()
        };

        info!(drained = drained.len(), "alarm queue destroyed");
        self.inner.entries_available.notify_all();
        self.inner.alarm_slot_free.notify_all();
        drained
    }
}
