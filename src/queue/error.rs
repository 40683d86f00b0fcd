//! Error types for alarm queue operations.
//!
//! Every error carries a stable numeric result code so that callers driving
//! the queue from scripts or test harnesses can report outcomes uniformly.

use std::fmt;

/// Result type for alarm queue operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result code of a destroyed (or never usable) queue.
pub const CODE_UNINITIALIZED: i32 = -1;
/// Result code of a non-blocking alarm send that found the slot occupied.
pub const CODE_NO_ROOM: i32 = -2;
/// Result code of a non-blocking receive on an empty queue.
pub const CODE_NO_MESSAGE: i32 = -3;
/// Result code of a kind that is neither ALARM nor NORMAL.
pub const CODE_UNSUPPORTED_KIND: i32 = -99;

/// Alarm queue errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The queue has been destroyed.
    #[error("alarm queue is not initialized (destroyed)")]
    Uninitialized,

    /// Raw kind code does not name a supported message kind.
    #[error("unsupported message kind: {0}")]
    UnsupportedKind(i32),

    /// Non-blocking alarm send while an alarm is outstanding.
    #[error("no room: an alarm message is already queued")]
    NoRoom,

    /// Non-blocking receive on an empty queue.
    #[error("no message available")]
    NoMessage,
}

impl Error {
    /// Numeric result code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Self::Uninitialized => CODE_UNINITIALIZED,
            Self::NoRoom => CODE_NO_ROOM,
            Self::NoMessage => CODE_NO_MESSAGE,
            Self::UnsupportedKind(_) => CODE_UNSUPPORTED_KIND,
        }
    }

    /// Returns true for outcomes that only the non-blocking variants produce.
    pub fn is_would_block(&self) -> bool {
        matches!(self, Self::NoRoom | Self::NoMessage)
    }
}

/// A rejected send, handing the payload back to the caller.
///
/// The queue never drops a payload it did not accept.
pub struct SendError<T> {
    error: Error,
    payload: T,
}

impl<T> SendError<T> {
    pub(crate) fn new(error: Error, payload: T) -> Self {
        Self { error, payload }
    }

    /// The reason the send was rejected.
    pub fn error(&self) -> Error {
        self.error
    }

    /// Recover the payload that was not enqueued.
    pub fn into_inner(self) -> T {
        self.payload
    }
}

impl<T> From<SendError<T>> for Error {
    fn from(err: SendError<T>) -> Self {
        err.error
    }
}

// Payload is opaque, so Debug never requires `T: Debug`.
impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "send rejected: {}", self.error)
    }
}

impl<T> std::error::Error for SendError<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
