//! Blocking alarm queue.
//!
//! A thread-safe message queue with two message kinds:
//!
//! - **ALARM**: at most one queued at any time, always delivered first. A
//!   second ALARM send blocks until the queued one is received.
//! - **NORMAL**: delivered in send order after any pending alarm. NORMAL
//!   sends never block.
//!
//! Receivers block while the queue is empty. Non-blocking `try_*` variants
//! report `NoRoom` / `NoMessage` instead of waiting.
//!
//! # Examples
//!
//! ## Priority Delivery
//!
//! ```rust
//! use alarmq::queue::{AlarmQueue, MsgKind};
//!
//! # fn main() -> Result<(), alarmq::queue::Error> {
//! let queue = AlarmQueue::new();
//!
//! queue.send(1, MsgKind::Normal)?;
//! queue.send(2, MsgKind::Normal)?;
//! queue.send(9, MsgKind::Alarm)?;
//!
//! assert_eq!(queue.receive()?.payload, 9);
//! assert_eq!(queue.receive()?.payload, 1);
//! assert_eq!(queue.receive()?.payload, 2);
//! assert_eq!(queue.size()?, 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Producer and Consumer Threads
//!
//! ```rust
//! use alarmq::queue::{AlarmQueue, MsgKind};
//! use std::thread;
//!
//! let queue = AlarmQueue::new();
//!
//! let consumer = {
//!     let queue = queue.clone();
//!     thread::spawn(move || queue.receive().map(|m| m.payload))
//! };
//!
//! queue.send("wake up", MsgKind::Normal).unwrap();
//! assert_eq!(consumer.join().unwrap(), Ok("wake up"));
//! ```
//!
//! ## Teardown
//!
//! ```rust
//! use alarmq::queue::{AlarmQueue, Error, MsgKind};
//!
//! let queue = AlarmQueue::new();
//! queue.send('a', MsgKind::Normal).unwrap();
//!
//! let leftover = queue.destroy();
//! assert_eq!(leftover.len(), 1);
//! assert_eq!(queue.receive(), Err(Error::Uninitialized));
//! ```

mod error;
mod service;
mod sync;
mod types;

// Re-export public API
pub use error::{
    CODE_NO_MESSAGE, CODE_NO_ROOM, CODE_UNINITIALIZED, CODE_UNSUPPORTED_KIND, Error, Result,
    SendError,
};
pub use service::AlarmQueue;
pub use types::{Message, MsgKind};

#[cfg(all(test, not(loom)))]
mod tests;
