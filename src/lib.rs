//! alarmq - a blocking two-level alarm queue.
//!
//! The [`queue`] module is the library: a thread-safe queue where at most one
//! ALARM message is outstanding and ALARM messages overtake NORMAL ones. The
//! remaining modules back the `alarmq` scenario runner binary.

pub mod commands;
pub mod config;
pub mod constants;
pub mod queue;
pub mod ui;

pub use queue::{AlarmQueue, Error, Message, MsgKind, SendError};
