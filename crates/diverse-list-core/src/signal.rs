//! Signal/slot system for diverse-list.
//!
//! This module provides a type-safe, Qt-inspired signal/slot mechanism used by
//! the list controller to fan notifications out to the view that owns it.
//!
//! # Key Types
//!
//! - [`Signal<Args, R>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Threading
//!
//! Signals are single-threaded. They are neither `Send` nor `Sync`, and slots
//! are plain `Fn` closures invoked synchronously on the emitting thread. Work
//! finishing on another thread has to be marshalled back to the owning thread
//! before anything is emitted.
//!
//! # Delivery Guarantees
//!
//! - Slots run in the order they were connected. Connecting a new slot never
//!   replaces an earlier one.
//! - Emission works on a snapshot of the connection table, so a slot may
//!   connect or disconnect slots (including itself) while being invoked.
//! - A panicking slot is isolated: the panic is logged and delivery continues
//!   with the next slot.
//!
//! # Example
//!
//! ```
//! use diverse_list_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// The ID remains valid until the connection is explicitly disconnected or
    /// the signal is dropped.
    pub struct ConnectionId;
}

type Slot<Args, R> = Rc<dyn Fn(&Args) -> R>;

/// Internal storage for a single connection.
struct Connection<Args, R> {
    slot: Slot<Args, R>,
    /// Registration sequence number. Slot keys are recycled by the slot map,
    /// so delivery order is taken from this instead of key order.
    seq: u64,
}

type ConnectionTable<Args, R> = RefCell<SlotMap<ConnectionId, Connection<Args, R>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameters
///
/// - `Args`: The argument type passed to connected slots by reference. Use `()`
///   for signals with no arguments, or a tuple like `(u64, bool)` for several.
/// - `R`: The slot return type. Defaults to `()`. Signals whose listeners answer
///   a question (for example "was this long click consumed?") use a non-unit
///   `R` and collect the answers with [`emit_collect`](Self::emit_collect).
pub struct Signal<Args, R = ()> {
    connections: Rc<ConnectionTable<Args, R>>,
    next_seq: Cell<u64>,
    blocked: Cell<bool>,
}

impl<Args: 'static, R: 'static> Default for Signal<Args, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, R> fmt::Debug for Signal<Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connections.borrow().len())
            .field("blocked", &self.blocked.get())
            .finish()
    }
}

impl<Args: 'static, R: 'static> Signal<Args, R> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Rc::new(RefCell::new(SlotMap::with_key())),
            next_seq: Cell::new(0),
            blocked: Cell::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    ///
    /// # Example
    ///
    /// ```
    /// use diverse_list_core::Signal;
    ///
    /// let signal = Signal::<String>::new();
    /// let id = signal.connect(|s| println!("Got: {}", s));
    /// signal.emit("Hello".to_string());
    /// assert!(signal.disconnect(id));
    /// ```
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) -> R + 'static,
    {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.connections.borrow_mut().insert(Connection {
            slot: Rc::new(slot),
            seq,
        })
    }

    /// Connect a slot that is disconnected automatically when the returned
    /// guard is dropped.
    ///
    /// The guard only holds a weak reference to the connection table, so it
    /// may safely outlive the signal.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args, R>
    where
        F: Fn(&Args) -> R + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            table: Rc::downgrade(&self.connections),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.borrow_mut().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.borrow_mut().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.borrow().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing. Useful while a batch of
    /// mutations is applied and a single summary notification follows.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.set(blocked);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.get()
    }

    /// Emit the signal, invoking all connected slots in registration order.
    ///
    /// Returns the number of slots that completed without panicking. A blocked
    /// signal returns 0 without invoking anything.
    #[tracing::instrument(skip_all, target = "diverse_list_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) -> usize {
        self.dispatch(&args, |_| {})
    }

    /// Emit the signal and collect every slot's return value.
    ///
    /// Values are returned in registration order. Slots that panic contribute
    /// nothing to the result.
    #[tracing::instrument(skip_all, target = "diverse_list_core::signal", level = "trace")]
    pub fn emit_collect(&self, args: Args) -> Vec<R> {
        let mut results = Vec::new();
        self.dispatch(&args, |value| results.push(value));
        results
    }

    fn dispatch(&self, args: &Args, mut sink: impl FnMut(R)) -> usize {
        if self.is_blocked() {
            tracing::trace!(target: targets::SIGNAL, "signal blocked, skipping emit");
            return 0;
        }

        // The borrow is released before any slot runs.
        let slots = self.snapshot();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        let mut delivered = 0;
        for slot in slots {
            match panic::catch_unwind(AssertUnwindSafe(|| slot(args))) {
                Ok(value) => {
                    sink(value);
                    delivered += 1;
                }
                Err(payload) => {
                    tracing::error!(
                        target: targets::SIGNAL,
                        panic = %panic_message(payload.as_ref()),
                        "slot panicked during emission, continuing with remaining slots"
                    );
                }
            }
        }
        delivered
    }

    fn snapshot(&self) -> Vec<Slot<Args, R>> {
        let connections = self.connections.borrow();
        let mut ordered: Vec<(u64, Slot<Args, R>)> = connections
            .values()
            .map(|conn| (conn.seq, Rc::clone(&conn.slot)))
            .collect();
        ordered.sort_unstable_by_key(|(seq, _)| *seq);
        ordered.into_iter().map(|(_, slot)| slot).collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// A connection guard that automatically disconnects when dropped.
///
/// Created via [`Signal::connect_scoped`].
///
/// # Example
///
/// ```
/// use diverse_list_core::Signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let signal = Signal::<i32>::new();
/// let total = Rc::new(Cell::new(0));
/// {
///     let total = total.clone();
///     let _guard = signal.connect_scoped(move |&n| total.set(total.get() + n));
///     signal.emit(42);
/// }
/// signal.emit(43); // Nothing happens - connection was dropped
/// assert_eq!(total.get(), 42);
/// ```
pub struct ConnectionGuard<Args, R = ()> {
    table: Weak<ConnectionTable<Args, R>>,
    id: ConnectionId,
}

impl<Args, R> ConnectionGuard<Args, R> {
    /// The connection this guard owns.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args, R> fmt::Debug for ConnectionGuard<Args, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}

impl<Args, R> Drop for ConnectionGuard<Args, R> {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            let _ = table.borrow_mut().remove(self.id);
        }
    }
}

static_assertions::assert_not_impl_any!(Signal<u64>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T>() -> Rc<RefCell<Vec<T>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = recorder();

        let recv = received.clone();
        signal.connect(move |&value| recv.borrow_mut().push(value));

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.borrow(), vec![42, 100]);
    }

    #[test]
    fn test_signal_disconnect() {
        let signal = Signal::<i32>::new();
        let received = recorder();

        let recv = received.clone();
        let conn_id = signal.connect(move |&value| recv.borrow_mut().push(value));

        signal.emit(1);
        assert!(signal.disconnect(conn_id));
        assert!(!signal.disconnect(conn_id));
        signal.emit(2);

        assert_eq!(*received.borrow(), vec![1]);
    }

    #[test]
    fn test_signal_blocked() {
        let signal = Signal::<i32>::new();
        let received = recorder();

        let recv = received.clone();
        signal.connect(move |&value| recv.borrow_mut().push(value));

        signal.emit(1);
        signal.set_blocked(true);
        assert_eq!(signal.emit(2), 0);
        signal.set_blocked(false);
        signal.emit(3);

        assert_eq!(*received.borrow(), vec![1, 3]);
    }

    #[test]
    fn test_multiple_connections_keep_registration_order() {
        let signal = Signal::<()>::new();
        let order = recorder();

        for n in 0..3 {
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push(n));
        }

        assert_eq!(signal.connection_count(), 3);
        assert_eq!(signal.emit(()), 3);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_recycled_slot_is_delivered_last() {
        let signal = Signal::<()>::new();
        let order = recorder();

        let first = {
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push("first"))
        };
        {
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push("second"));
        }
        signal.disconnect(first);
        {
            // Reuses the freed slot, but was registered after "second".
            let order = order.clone();
            signal.connect(move |_| order.borrow_mut().push("third"));
        }

        signal.emit(());
        assert_eq!(*order.borrow(), vec!["second", "third"]);
    }

    #[test]
    fn test_disconnect_all() {
        let signal = Signal::<()>::new();

        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_connection_guard() {
        let signal = Signal::<i32>::new();
        let received = recorder();

        {
            let recv = received.clone();
            let _guard = signal.connect_scoped(move |&value| recv.borrow_mut().push(value));
            signal.emit(1);
        }

        signal.emit(2);

        assert_eq!(*received.borrow(), vec![1]);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_guard_outliving_signal() {
        let signal = Signal::<i32>::new();
        let guard = signal.connect_scoped(|_| {});
        drop(signal);
        drop(guard);
    }

    #[test]
    fn test_signal_with_multiple_args() {
        let signal = Signal::<(String, i32)>::new();
        let received = Rc::new(RefCell::new(None));

        let recv = received.clone();
        signal.connect(move |args| *recv.borrow_mut() = Some(args.clone()));

        signal.emit(("hello".to_string(), 42));

        assert_eq!(*received.borrow(), Some(("hello".to_string(), 42)));
    }

    #[test]
    fn test_emit_collect() {
        let signal = Signal::<usize, bool>::new();
        signal.connect(|&index| index == 3);
        signal.connect(|_| false);

        assert_eq!(signal.emit_collect(3), vec![true, false]);
        assert_eq!(signal.emit_collect(1), vec![false, false]);
    }

    #[test]
    fn test_panicking_slot_does_not_stop_delivery() {
        let signal = Signal::<i32>::new();
        let received = recorder();

        signal.connect(|_| panic!("listener failure"));
        let recv = received.clone();
        signal.connect(move |&value| recv.borrow_mut().push(value));

        assert_eq!(signal.emit(7), 1);
        assert_eq!(*received.borrow(), vec![7]);
    }

    #[test]
    fn test_connect_during_emission() {
        let signal = Rc::new(Signal::<()>::new());
        let calls = Rc::new(Cell::new(0));

        let inner_signal = Rc::downgrade(&signal);
        let inner_calls = calls.clone();
        signal.connect(move |_| {
            inner_calls.set(inner_calls.get() + 1);
            if let Some(signal) = inner_signal.upgrade() {
                signal.connect(|_| {});
            }
        });

        // The slot added during emission only sees later emissions.
        assert_eq!(signal.emit(()), 1);
        assert_eq!(signal.connection_count(), 2);
        assert_eq!(calls.get(), 1);
    }
}
