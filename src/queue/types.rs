//! Core types for the alarm queue.
//!
//! Contains the message kind, the delivered message, and the internal entry
//! storage guarded by the queue lock.

use super::error::Error;
use std::collections::VecDeque;
use std::fmt;

/// Kind of a queued message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MsgKind {
    /// At most one outstanding; always delivered ahead of normal messages.
    Alarm,
    /// Delivered in FIFO order after any pending alarm.
    Normal,
}

impl MsgKind {
    /// Numeric code of this kind.
    pub fn code(self) -> i32 {
        match self {
            Self::Alarm => 0,
            Self::Normal => 1,
        }
    }

    /// Returns true for [`MsgKind::Alarm`].
    pub fn is_alarm(self) -> bool {
        self == Self::Alarm
    }
}

impl TryFrom<i32> for MsgKind {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Alarm),
            1 => Ok(Self::Normal),
            other => Err(Error::UnsupportedKind(other)),
        }
    }
}

impl fmt::Display for MsgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alarm => f.write_str("ALARM"),
            Self::Normal => f.write_str("NORMAL"),
        }
    }
}

/// A delivered message: the payload plus the kind it was sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<T> {
    /// Kind the message was sent with.
    pub kind: MsgKind,
    /// Caller-supplied payload, returned untouched.
    pub payload: T,
}

impl<T> Message<T> {
    pub(crate) fn alarm(payload: T) -> Self {
        Self {
            kind: MsgKind::Alarm,
            payload,
        }
    }

    pub(crate) fn normal(payload: T) -> Self {
        Self {
            kind: MsgKind::Normal,
            payload,
        }
    }

    /// Split into kind and payload.
    pub fn into_parts(self) -> (MsgKind, T) {
        (self.kind, self.payload)
    }
}

/// Queued entries (internal). Only touched with the queue lock held.
///
/// The alarm lives in its own slot, which makes "alarm ahead of every normal"
/// and "at most one alarm" structural rather than positional.
#[derive(Debug)]
pub(crate) struct Entries<T> {
    alarm: Option<T>,
    normals: VecDeque<T>,
    pub(crate) destroyed: bool,
}

impl<T> Entries<T> {
    pub(crate) fn new() -> Self {
        Self {
            alarm: None,
            normals: VecDeque::new(),
            destroyed: false,
        }
    }

    pub(crate) fn has_alarm(&self) -> bool {
        self.alarm.is_some()
    }

    pub(crate) fn alarm_count(&self) -> usize {
        usize::from(self.has_alarm())
    }

    pub(crate) fn len(&self) -> usize {
        self.normals.len() + self.alarm_count()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.alarm.is_none() && self.normals.is_empty()
    }

    /// Insert an entry. The caller must have ensured the alarm slot is free
    /// when `kind` is [`MsgKind::Alarm`].
    pub(crate) fn insert(&mut self, payload: T, kind: MsgKind) {
        match kind {
            MsgKind::Alarm => {
                debug_assert!(self.alarm.is_none(), "alarm slot already occupied");
                self.alarm = Some(payload);
            }
            MsgKind::Normal => self.normals.push_back(payload),
        }
    }

    /// Remove the next entry in delivery order: the alarm, else the oldest normal.
    pub(crate) fn take_next(&mut self) -> Option<Message<T>> {
        if let Some(payload) = self.alarm.take() {
            return Some(Message::alarm(payload));
        }
        self.normals.pop_front().map(Message::normal)
    }

    /// Remove every entry in delivery order.
    pub(crate) fn drain(&mut self) -> Vec<Message<T>> {
        let mut drained = Vec::with_capacity(self.len());
        if let Some(payload) = self.alarm.take() {
            drained.push(Message::alarm(payload));
        }
        drained.extend(self.normals.drain(..).map(Message::normal));
        drained
    }
}
