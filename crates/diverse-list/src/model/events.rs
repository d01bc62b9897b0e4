//! Event hub.
//!
//! Fan-out of controller notifications to listeners registered by the view.
//! The hub holds no business logic: the controller decides what happened and
//! the hub delivers it.
//!
//! Within one user gesture, notifications arrive in this order: click,
//! long click, selection changes (one per identity whose state flipped), move
//! completed. Each event kind may have any number of listeners; registering
//! a listener never replaces an earlier one.
//!
//! # Example
//!
//! ```
//! use diverse_list::model::EventHub;
//!
//! let events = EventHub::<()>::new();
//! events.on_selection_changed(|id, selected| {
//!     println!("{id} is now {}", if selected { "selected" } else { "unselected" });
//! });
//! events.on_moved(|from, to| println!("moved {from} -> {to}"));
//! ```

use diverse_list_core::logging::targets;
use diverse_list_core::{ConnectionId, Signal};

use super::item::ItemId;
use super::selection::SelectionChange;
use super::update::ItemUpdate;

/// A change the view must render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListChange<P> {
    /// `count` items were inserted starting at `index`.
    Inserted { index: usize, count: usize },
    /// `count` items were removed starting at `index`.
    Removed { index: usize, count: usize },
    /// The item at `from` now sits at `to`.
    Moved { from: usize, to: usize },
    /// The item at `index` must be refreshed as described by `update`.
    Changed { index: usize, update: ItemUpdate<P> },
}

/// Signals emitted by a list controller.
pub struct EventHub<P> {
    /// Emitted when an item is clicked. Args: index
    pub clicked: Signal<usize>,

    /// Emitted when an item is long-clicked. Args: index.
    /// Listeners return `true` to consume the gesture.
    pub long_clicked: Signal<usize, bool>,

    /// Emitted once per identity whose selection state flipped.
    pub selection_changed: Signal<SelectionChange>,

    /// Emitted once when a drag ends with the item in a new position.
    /// Args: (start index, final index)
    pub moved: Signal<(usize, usize)>,

    /// Emitted for every structural or content change the view must render.
    pub items_changed: Signal<ListChange<P>>,
}

impl<P: 'static> Default for EventHub<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> std::fmt::Debug for EventHub<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("clicked", &self.clicked)
            .field("long_clicked", &self.long_clicked)
            .field("selection_changed", &self.selection_changed)
            .field("moved", &self.moved)
            .field("items_changed", &self.items_changed)
            .finish()
    }
}

impl<P: 'static> EventHub<P> {
    /// Creates a hub with no listeners.
    pub fn new() -> Self {
        Self {
            clicked: Signal::new(),
            long_clicked: Signal::new(),
            selection_changed: Signal::new(),
            moved: Signal::new(),
            items_changed: Signal::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Listener registration
    // -------------------------------------------------------------------------

    /// Adds a click listener.
    pub fn on_item_clicked(&self, f: impl Fn(usize) + 'static) -> ConnectionId {
        self.clicked.connect(move |&index| f(index))
    }

    /// Adds a long-click listener. Return `true` to consume the gesture.
    pub fn on_item_long_clicked(&self, f: impl Fn(usize) -> bool + 'static) -> ConnectionId {
        self.long_clicked.connect(move |&index| f(index))
    }

    /// Adds a selection listener.
    pub fn on_selection_changed(&self, f: impl Fn(ItemId, bool) + 'static) -> ConnectionId {
        self.selection_changed
            .connect(move |change| f(change.id, change.selected))
    }

    /// Adds a move-completed listener.
    pub fn on_moved(&self, f: impl Fn(usize, usize) + 'static) -> ConnectionId {
        self.moved.connect(move |&(from, to)| f(from, to))
    }

    /// Adds a render-change listener.
    pub fn on_items_changed(&self, f: impl Fn(&ListChange<P>) + 'static) -> ConnectionId {
        self.items_changed.connect(f)
    }

    // -------------------------------------------------------------------------
    // Delivery
    // -------------------------------------------------------------------------

    pub(crate) fn emit_clicked(&self, index: usize) {
        tracing::trace!(target: targets::EVENTS, index, "click");
        self.clicked.emit(index);
    }

    /// Delivers a long click to every listener; consumed if any listener consumed it.
    pub(crate) fn emit_long_clicked(&self, index: usize) -> bool {
        tracing::trace!(target: targets::EVENTS, index, "long click");
        self.long_clicked
            .emit_collect(index)
            .into_iter()
            .any(|consumed| consumed)
    }

    pub(crate) fn emit_selection_changes(&self, changes: Vec<SelectionChange>) {
        for change in changes {
            tracing::trace!(target: targets::EVENTS, id = %change.id, selected = change.selected, "selection changed");
            self.selection_changed.emit(change);
        }
    }

    pub(crate) fn emit_moved(&self, from: usize, to: usize) {
        tracing::trace!(target: targets::EVENTS, from, to, "move completed");
        self.moved.emit((from, to));
    }

    pub(crate) fn emit_change(&self, change: ListChange<P>) {
        self.items_changed.emit(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_listeners_accumulate() {
        let hub = EventHub::<()>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let recv = received.clone();
            hub.on_item_clicked(move |index| recv.borrow_mut().push((tag, index)));
        }

        hub.emit_clicked(4);
        assert_eq!(*received.borrow(), vec![("first", 4), ("second", 4)]);
    }

    #[test]
    fn test_long_click_consumed_by_any_listener() {
        let hub = EventHub::<()>::new();
        let calls = Rc::new(RefCell::new(0));

        let c1 = calls.clone();
        hub.on_item_long_clicked(move |_| {
            *c1.borrow_mut() += 1;
            true
        });
        let c2 = calls.clone();
        hub.on_item_long_clicked(move |_| {
            *c2.borrow_mut() += 1;
            false
        });

        assert!(hub.emit_long_clicked(0));
        // Both listeners run even though the first consumed the gesture.
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn test_long_click_without_listeners_not_consumed() {
        let hub = EventHub::<()>::new();
        assert!(!hub.emit_long_clicked(0));
    }

    #[test]
    fn test_selection_changes_delivered_in_order() {
        let hub = EventHub::<()>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let recv = received.clone();
        hub.on_selection_changed(move |id, selected| recv.borrow_mut().push((id.get(), selected)));

        hub.emit_selection_changes(vec![
            SelectionChange::deselected(ItemId::new(1)),
            SelectionChange::selected(ItemId::new(2)),
        ]);

        assert_eq!(*received.borrow(), vec![(1, false), (2, true)]);
    }

    #[test]
    fn test_failing_listener_isolated() {
        let hub = EventHub::<()>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        hub.on_moved(|_, _| panic!("view crashed"));
        let recv = received.clone();
        hub.on_moved(move |from, to| recv.borrow_mut().push((from, to)));

        hub.emit_moved(3, 7);
        assert_eq!(*received.borrow(), vec![(3, 7)]);
    }

    #[test]
    fn test_items_changed_payload() {
        let hub = EventHub::<&'static str>::new();
        let received = Rc::new(RefCell::new(Vec::new()));

        let recv = received.clone();
        hub.on_items_changed(move |change| recv.borrow_mut().push(change.clone()));

        hub.emit_change(ListChange::Changed {
            index: 2,
            update: ItemUpdate::Partial("text"),
        });

        assert_eq!(
            *received.borrow(),
            vec![ListChange::Changed {
                index: 2,
                update: ItemUpdate::Partial("text")
            }]
        );
    }
}
