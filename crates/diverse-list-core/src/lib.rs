//! Core systems for diverse-list.
//!
//! This crate provides the foundational pieces the list controller is built on:
//!
//! - **Signal/Slot System**: Type-safe, ordered, single-threaded notifications
//! - **Logging**: `tracing` targets and span names shared by every subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use diverse_list_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//!
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
