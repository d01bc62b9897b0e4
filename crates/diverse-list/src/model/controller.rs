//! List controller.
//!
//! [`ListController`] is the single entry point a view talks to. It owns the
//! ordered items, the type registry, the selection state machine, the drag
//! session and the event hub, and keeps them consistent with one another:
//!
//! - removing an item drops its selection and abandons a drag of it,
//! - inserting or removing other items during a drag keeps the drag's start
//!   position pointing at the same place among them,
//! - every structural or content change is reported through
//!   [`EventHub::items_changed`] after it has been applied,
//! - a call that returns an error has changed nothing.
//!
//! The controller is single-threaded. It is neither `Send` nor `Sync`; work
//! finished on another thread must be handed back to the owning thread before
//! it touches the list.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use diverse_list::config::ControllerConfig;
//! use diverse_list::model::{Item, ItemId, ListController, SelectionMode, TypeTag};
//!
//! let mut list: ListController<String> = ListController::with_config(
//!     ControllerConfig::new().with_selection_mode(SelectionMode::SingleSelection),
//! );
//! for id in 0..3 {
//!     list.push(Item::with_id(TypeTag::new(0), id, format!("Row {id}")).selectable(true))
//!         .unwrap();
//! }
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let recorder = seen.clone();
//! list.events().on_selection_changed(move |id, selected| {
//!     recorder.borrow_mut().push((id.get(), selected));
//! });
//!
//! list.set_selected(ItemId::new(1), true).unwrap();
//! list.set_selected(ItemId::new(2), true).unwrap();
//! assert_eq!(*seen.borrow(), vec![(1, true), (1, false), (2, true)]);
//! ```

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use diverse_list_core::logging::{span_names, targets};

use crate::config::ControllerConfig;
use crate::error::{ListError, Result};

use super::collection::{DataChange, ItemCollection};
use super::diff::diff_items;
use super::events::{EventHub, ListChange};
use super::item::{Item, ItemId, TypeTag};
use super::registry::{ItemKind, TypeRegistry};
use super::reorder::{DragState, ReorderController};
use super::selection::{SelectionChange, SelectionMode, SelectionModel};
use super::update::{UpdateDispatcher, UpdatePolicy};

/// Result of a selection request that was accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The selection state changed and listeners were notified.
    Changed,
    /// The request was valid but the state was already as requested, or the
    /// mode does not allow selection.
    Unchanged,
}

/// Controller for a heterogeneous list.
///
/// `D` is the item data type, usually an enum with one variant per item kind.
/// `P` is the payload type carried by partial updates.
pub struct ListController<D, P = ()> {
    config: ControllerConfig,
    items: ItemCollection<D>,
    registry: TypeRegistry,
    selection: SelectionModel,
    reorder: ReorderController,
    dispatcher: UpdateDispatcher,
    events: EventHub<P>,
}

static_assertions::assert_not_impl_any!(ListController<String>: Send, Sync);

impl<D, P: 'static> Default for ListController<D, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: std::fmt::Debug, P> std::fmt::Debug for ListController<D, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListController")
            .field("config", &self.config)
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("drag", &self.reorder.state())
            .finish_non_exhaustive()
    }
}

impl<D, P: 'static> ListController<D, P> {
    /// Creates an empty controller with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Creates an empty controller with the given configuration.
    pub fn with_config(config: ControllerConfig) -> Self {
        Self {
            config,
            items: ItemCollection::new(),
            registry: TypeRegistry::new(),
            selection: SelectionModel::new(config.selection_mode),
            reorder: ReorderController::new(),
            dispatcher: UpdateDispatcher::new(config.update_policy),
            events: EventHub::new(),
        }
    }

    /// Returns the active configuration.
    ///
    /// `selection_mode` always reflects the current mode.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Returns the event hub for registering listeners.
    pub fn events(&self) -> &EventHub<P> {
        &self.events
    }

    /// Switches the update policy used for later content changes.
    pub fn set_update_policy(&mut self, policy: UpdatePolicy) {
        self.dispatcher.set_policy(policy);
        self.config.update_policy = policy;
    }

    /// Stops or resumes [`EventHub::items_changed`] notifications.
    ///
    /// While blocked, structural and content changes are applied without
    /// telling the view; call this around a batch the view will pick up with
    /// a full reload. Selection, click and move events are unaffected.
    pub fn set_notifications_blocked(&self, blocked: bool) {
        tracing::debug!(target: targets::CONTROLLER, blocked, "item change notifications");
        self.events.items_changed.set_blocked(blocked);
    }

    /// Returns `true` while item change notifications are blocked.
    pub fn notifications_blocked(&self) -> bool {
        self.events.items_changed.is_blocked()
    }

    // =========================================================================
    // Type Registry
    // =========================================================================

    /// Returns the type registry.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Registers an item kind.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::DuplicateType`] if the tag is already registered.
    pub fn register_kind(&mut self, tag: TypeTag, kind: ItemKind) -> Result<()> {
        self.registry.register(tag, kind)
    }

    /// Builds an item carrying the default flags registered for its tag.
    pub fn create_item(&self, tag: TypeTag, id: u64, data: D) -> Item<D> {
        let flags = self
            .registry
            .kind(tag)
            .map(ItemKind::default_flags)
            .unwrap_or_default();
        Item::with_id(tag, id, data).with_flags(flags)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the ordered items.
    pub fn items(&self) -> &ItemCollection<D> {
        &self.items
    }

    /// Returns the item at a position.
    pub fn get(&self, index: usize) -> Result<&Item<D>> {
        self.items.get(index)
    }

    /// Returns the item with an identity.
    pub fn get_by_id(&self, id: ItemId) -> Result<&Item<D>> {
        self.items.get_by_id(id)
    }

    /// Returns the current position of an identity.
    pub fn index_of(&self, id: ItemId) -> Result<usize> {
        self.items.index_of(id)
    }

    /// Returns `true` if an item with this identity is present.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains(id)
    }

    /// Returns the position of the first item with the tag.
    pub fn first_index_of_type(&self, tag: TypeTag) -> Option<usize> {
        self.items.first_index_of_type(tag)
    }

    /// Returns the position of the last item with the tag.
    pub fn last_index_of_type(&self, tag: TypeTag) -> Option<usize> {
        self.items.last_index_of_type(tag)
    }

    // =========================================================================
    // Structural Changes
    // =========================================================================

    /// Inserts an item, by default at the end. Returns where it landed.
    ///
    /// # Errors
    ///
    /// - [`ListError::DuplicateIdentity`] if the identity is already present.
    /// - [`ListError::UnknownType`] if strict typing is on and the tag is unregistered.
    pub fn insert(&mut self, item: Item<D>, at: Option<usize>) -> Result<usize> {
        let tag = item.type_tag();
        self.registry.check(tag, self.config.strict_types)?;
        let dragged = self.dragged_index();
        let index = self.items.insert(item, at).inspect_err(|err| {
            tracing::warn!(target: targets::CONTROLLER, %err, "insert rejected");
        })?;
        self.registry.retain(tag, 1);
        if let Some(current) = dragged {
            self.reorder.note_inserted(current, index, 1);
        }

        self.events
            .emit_change(ListChange::Inserted { index, count: 1 });
        Ok(index)
    }

    /// Appends an item.
    pub fn push(&mut self, item: Item<D>) -> Result<usize> {
        self.insert(item, None)
    }

    /// Inserts a batch of items contiguously, by default at the end.
    ///
    /// Either every item is inserted or none is. An empty batch is a no-op.
    pub fn insert_many(&mut self, items: Vec<Item<D>>, at: Option<usize>) -> Result<Range<usize>> {
        if items.is_empty() {
            tracing::warn!(target: targets::CONTROLLER, "empty batch insert ignored");
            let index = at.map_or(self.items.len(), |at| at.min(self.items.len()));
            return Ok(index..index);
        }
        for item in &items {
            self.registry.check(item.type_tag(), self.config.strict_types)?;
        }

        let tags: Vec<TypeTag> = items.iter().map(Item::type_tag).collect();
        let dragged = self.dragged_index();
        let range = self.items.insert_many(items, at)?;
        for tag in tags {
            self.registry.retain(tag, 1);
        }
        if let Some(current) = dragged {
            self.reorder.note_inserted(current, range.start, range.len());
        }

        self.events.emit_change(ListChange::Inserted {
            index: range.start,
            count: range.len(),
        });
        Ok(range)
    }

    /// Removes the item with an identity.
    ///
    /// The item leaves the selection without a selection-changed
    /// notification; the removal itself is the only event.
    pub fn remove(&mut self, id: ItemId) -> Result<Item<D>> {
        let index = self.items.index_of(id)?;
        self.remove_at(index)
    }

    /// Removes the item at a position.
    pub fn remove_at(&mut self, index: usize) -> Result<Item<D>> {
        let dragged = self.dragged_index();
        let item = self.items.remove_at(index)?;
        self.forget(&item);
        self.track_removal(dragged, index, 1);

        self.events
            .emit_change(ListChange::Removed { index, count: 1 });
        Ok(item)
    }

    /// Removes `count` items starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if the range reaches past the end.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<Vec<Item<D>>> {
        let dragged = self.dragged_index();
        let removed = self.items.remove_range(start, count)?;
        if removed.is_empty() {
            return Ok(removed);
        }
        for item in &removed {
            self.forget(item);
        }
        self.track_removal(dragged, start, removed.len());

        self.events.emit_change(ListChange::Removed {
            index: start,
            count: removed.len(),
        });
        Ok(removed)
    }

    /// Removes every item.
    pub fn clear(&mut self) -> Vec<Item<D>> {
        let removed = self.items.clear();
        if removed.is_empty() {
            return removed;
        }
        for item in &removed {
            self.forget(item);
        }
        self.reorder.reconcile(&self.items);

        tracing::debug!(target: targets::CONTROLLER, count = removed.len(), "list cleared");
        self.events.emit_change(ListChange::Removed {
            index: 0,
            count: removed.len(),
        });
        removed
    }

    /// Moves an item to a new position, clamped to the last position.
    ///
    /// Returns the position it moved from. Selection is untouched. Moving
    /// the dragged item itself does not change where a cancel puts it back.
    pub fn move_to(&mut self, id: ItemId, new_index: usize) -> Result<usize> {
        let dragged = self
            .dragged_index()
            .filter(|_| self.reorder.dragged_id() != Some(id));
        let from = self.items.move_to(id, new_index)?;
        let to = self.items.index_of(id)?;
        if from == to {
            return Ok(from);
        }
        if let Some(current) = dragged {
            self.reorder.note_removed(current, from, 1);
            let current = if from < current { current - 1 } else { current };
            self.reorder.note_inserted(current, to, 1);
        }
        self.events.emit_change(ListChange::Moved { from, to });
        Ok(from)
    }

    /// Drops the bookkeeping of an item that left the collection.
    fn forget(&mut self, item: &Item<D>) {
        self.registry.release(item.type_tag());
        if self.selection.forget(item.id()) {
            tracing::trace!(target: targets::CONTROLLER, id = %item.id(), "removed item left the selection");
        }
    }

    /// Position of the dragged item, if a drag is running.
    fn dragged_index(&self) -> Option<usize> {
        let id = self.reorder.dragged_id()?;
        self.items.index_of(id).ok()
    }

    /// Abandons a drag of a removed item, or shifts the drag's start past
    /// the removed span. `dragged` is the dragged position before removal.
    fn track_removal(&mut self, dragged: Option<usize>, start: usize, count: usize) {
        if self.reorder.reconcile(&self.items) {
            return;
        }
        if let Some(current) = dragged {
            self.reorder.note_removed(current, start, count);
        }
    }

    // =========================================================================
    // Content Changes
    // =========================================================================

    /// Replaces the data of an item, keeping its identity, tag and flags.
    ///
    /// With a `hint` the view receives a partial update carrying it;
    /// otherwise it rebinds the item fully. Returns the replaced data.
    pub fn replace_data(&mut self, id: ItemId, data: D, hint: Option<P>) -> Result<DataChange<D>> {
        let change = self.items.replace_data(id, data)?;
        let current = self.items.get(change.index)?;
        let update = self
            .dispatcher
            .compute_update(&change.old_data, current.data(), hint);

        self.events.emit_change(ListChange::Changed {
            index: change.index,
            update,
        });
        Ok(change)
    }

    /// Asks the view to refresh an item whose data did not change.
    ///
    /// Returns the item's position.
    pub fn refresh(&mut self, id: ItemId, hint: Option<P>) -> Result<usize> {
        let index = self.items.index_of(id)?;
        let update = self.dispatcher.resolve(hint);
        self.events
            .emit_change(ListChange::Changed { index, update });
        Ok(index)
    }

    /// Replaces the whole list, reporting a keyed change set.
    ///
    /// Items are matched by identity and tag. Survivors keep their selection
    /// while they stay selectable; a survivor that comes back non-selectable
    /// is deselected, and listeners hear about it after the item changes.
    /// Survivors with different data are reported as changed, with the
    /// payload chosen by `payload`. A running drag continues only if its item
    /// survives and is still draggable; its start becomes its new position.
    ///
    /// # Errors
    ///
    /// - [`ListError::DuplicateIdentity`] if `new_items` repeats an identity.
    /// - [`ListError::UnknownType`] if strict typing is on and a tag is unregistered.
    pub fn replace_items(
        &mut self,
        new_items: Vec<Item<D>>,
        payload: impl Fn(TypeTag, &D, &D) -> Option<P>,
    ) -> Result<()>
    where
        D: PartialEq,
    {
        let _span = tracing::trace_span!(
            target: targets::CONTROLLER,
            span_names::REPLACE_ITEMS,
            old_len = self.items.len(),
            new_len = new_items.len()
        )
        .entered();

        for item in &new_items {
            self.registry.check(item.type_tag(), self.config.strict_types)?;
        }
        let changes = diff_items(self.items.items(), &new_items, &self.dispatcher, payload)?;

        let survivors: HashMap<ItemId, (TypeTag, bool)> = new_items
            .iter()
            .map(|item| (item.id(), (item.type_tag(), item.is_selectable())))
            .collect();
        let mut next = ItemCollection::new();
        next.insert_many(new_items, None)?;

        for item in self.items.items() {
            self.registry.release(item.type_tag());
        }
        for item in next.items() {
            self.registry.retain(item.type_tag(), 1);
        }

        let previous: HashMap<ItemId, TypeTag> = self
            .items
            .iter()
            .map(|item| (item.id(), item.type_tag()))
            .collect();
        let survives = |id: &ItemId| {
            matches!(
                (previous.get(id), survivors.get(id)),
                (Some(old_tag), Some((new_tag, _))) if old_tag == new_tag
            )
        };
        let deselected: Vec<SelectionChange> = self
            .selection
            .selection_order()
            .iter()
            .filter(|id| survives(*id) && matches!(survivors.get(*id), Some((_, false))))
            .map(|id| SelectionChange::deselected(*id))
            .collect();
        self.selection
            .retain(|id| survives(&id) && matches!(survivors.get(&id), Some((_, true))));

        self.items = next;
        if !self.reorder.reconcile(&self.items) {
            self.reorder.rebase(&self.items);
        }

        tracing::debug!(
            target: targets::CONTROLLER,
            changes = changes.len(),
            deselected = deselected.len(),
            "items replaced"
        );
        for change in changes {
            self.events.emit_change(change);
        }
        self.events.emit_selection_changes(deselected);
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns the selection state.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Returns the current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.selection_mode()
    }

    /// Returns `true` if the identity is selected.
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.is_selected(id)
    }

    /// Returns a snapshot of the selected identities.
    pub fn selected_ids(&self) -> HashSet<ItemId> {
        self.selection.selected_ids()
    }

    /// Switches the selection mode.
    ///
    /// Switching to single selection keeps only the most recently selected
    /// identity; switching to no selection clears everything. One
    /// notification is emitted per cleared identity, oldest first.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        let changes = self.selection.set_selection_mode(mode);
        self.config.selection_mode = mode;
        self.events.emit_selection_changes(changes);
    }

    /// Selects or deselects an item.
    ///
    /// # Errors
    ///
    /// - [`ListError::NotFound`] if the item is absent.
    /// - [`ListError::NotSelectable`] if the item cannot be selected.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> Result<SelectionOutcome> {
        self.check_selectable(id)?;
        let changes = self.selection.set_selected(id, selected);
        Ok(self.publish_selection(changes))
    }

    /// Applies [`set_selected`](Self::set_selected) to each identity in order.
    ///
    /// Under single selection the last accepted `true` request wins; the
    /// intermediate selections are still reported. Returns one outcome per
    /// request.
    pub fn set_many_selected(
        &mut self,
        ids: impl IntoIterator<Item = ItemId>,
        selected: bool,
    ) -> Vec<Result<SelectionOutcome>> {
        ids.into_iter()
            .map(|id| {
                self.set_selected(id, selected).inspect_err(|err| {
                    tracing::warn!(target: targets::SELECTION, %err, "batch selection request rejected");
                })
            })
            .collect()
    }

    /// Flips the selection state of an item.
    pub fn toggle_selected(&mut self, id: ItemId) -> Result<SelectionOutcome> {
        self.check_selectable(id)?;
        let changes = self.selection.toggle(id);
        Ok(self.publish_selection(changes))
    }

    /// Deselects everything. Returns how many items were deselected.
    pub fn clear_selection(&mut self) -> usize {
        let changes = self.selection.clear();
        let count = changes.len();
        self.events.emit_selection_changes(changes);
        count
    }

    fn check_selectable(&self, id: ItemId) -> Result<()> {
        let item = self.items.get_by_id(id)?;
        if !item.is_selectable() {
            tracing::warn!(target: targets::SELECTION, %id, "selection of non-selectable item rejected");
            return Err(ListError::NotSelectable(id));
        }
        Ok(())
    }

    fn publish_selection(&self, changes: Vec<SelectionChange>) -> SelectionOutcome {
        if changes.is_empty() {
            return SelectionOutcome::Unchanged;
        }
        self.events.emit_selection_changes(changes);
        SelectionOutcome::Changed
    }

    // =========================================================================
    // Drag Reordering
    // =========================================================================

    /// Returns the drag session state.
    pub fn drag_state(&self) -> DragState {
        self.reorder.state()
    }

    /// Starts dragging an item. Returns its start position.
    ///
    /// # Errors
    ///
    /// - [`ListError::DragInProgress`] if a drag is already running.
    /// - [`ListError::NotFound`] if the item is absent.
    /// - [`ListError::NotDraggable`] if the item cannot be dragged.
    /// - [`ListError::NothingToReorder`] if the item is alone in the list.
    pub fn begin_drag(&mut self, id: ItemId) -> Result<usize> {
        self.reorder.begin_drag(&self.items, id)
    }

    /// Applies one intermediate move of the dragged item.
    ///
    /// Returns `true` if the item moved. The view is notified of each applied
    /// move so it can follow the gesture.
    pub fn report_move(&mut self, from: usize, to: usize) -> Result<bool> {
        match self.reorder.report_move(&mut self.items, from, to)? {
            Some((from, to)) => {
                self.events.emit_change(ListChange::Moved { from, to });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ends the drag, returning the start and final positions.
    ///
    /// Listeners of [`EventHub::moved`] are told once, with the start and
    /// final positions, if the item ended up somewhere else.
    pub fn end_drag(&mut self) -> Result<(usize, usize)> {
        let (start, end) = self.reorder.end_drag(&self.items)?;
        if start != end {
            self.events.emit_moved(start, end);
        }
        Ok((start, end))
    }

    /// Cancels the drag, restoring the order from before it began.
    pub fn cancel_drag(&mut self) -> Result<()> {
        if let Some((from, to)) = self.reorder.cancel_drag(&mut self.items)? {
            self.events.emit_change(ListChange::Moved { from, to });
        }
        Ok(())
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Handles a click on the item at a position.
    ///
    /// Click listeners run first. With `select_on_click`, a selectable item
    /// then has its selection toggled.
    pub fn click(&mut self, index: usize) -> Result<()> {
        let item = self.items.get(index)?;
        let (id, selectable) = (item.id(), item.is_selectable());

        self.events.emit_clicked(index);
        if self.config.select_on_click && selectable {
            let changes = self.selection.toggle(id);
            self.publish_selection(changes);
        }
        Ok(())
    }

    /// Handles a long click on the item at a position.
    ///
    /// Every listener runs; returns `true` if any of them consumed the gesture.
    pub fn long_click(&mut self, index: usize) -> Result<bool> {
        self.items.get(index)?;
        Ok(self.events.emit_long_clicked(index))
    }
}
