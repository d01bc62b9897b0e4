//! Drag reordering.
//!
//! [`ReorderController`] runs one drag session at a time over an
//! [`ItemCollection`]: `Idle -> Dragging -> Idle`. Intermediate moves are
//! applied to the collection immediately so the view can follow the gesture;
//! the session remembers only where the dragged item started.
//!
//! The start position is kept relative to the other items: inserting or
//! removing items while a drag runs shifts it, so cancelling still restores
//! the pre-drag order and ending the drag reports only the user's move.

use diverse_list_core::logging::{span_names, targets};

use crate::error::{ListError, Result};

use super::collection::ItemCollection;
use super::item::{ItemId, TypeTag};

/// State of the drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// An item is being dragged.
    Dragging {
        /// The dragged item.
        id: ItemId,
        /// Where cancelling would put it back. Equal to its position when the
        /// drag began, shifted by items inserted or removed since.
        start_index: usize,
    },
}

/// Validates and applies drag moves.
#[derive(Debug, Clone, Default)]
pub struct ReorderController {
    state: DragState,
    /// Tag of the dragged item when the session began.
    tag: Option<TypeTag>,
    /// Span covering the running session.
    span: Option<tracing::Span>,
}

impl ReorderController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Returns `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Returns the identity being dragged, if any.
    pub fn dragged_id(&self) -> Option<ItemId> {
        match self.state {
            DragState::Dragging { id, .. } => Some(id),
            DragState::Idle => None,
        }
    }

    /// Starts a drag session for an item. Returns its start position.
    ///
    /// # Errors
    ///
    /// - [`ListError::DragInProgress`] if a session is already running.
    /// - [`ListError::NotFound`] if the item is absent.
    /// - [`ListError::NotDraggable`] if the item cannot be dragged.
    /// - [`ListError::NothingToReorder`] if the item is alone in the list.
    pub fn begin_drag<D>(&mut self, items: &ItemCollection<D>, id: ItemId) -> Result<usize> {
        if let DragState::Dragging { id: current, .. } = self.state {
            tracing::warn!(target: targets::REORDER, %id, %current, "drag already in progress");
            return Err(ListError::DragInProgress(current));
        }
        let start_index = items.index_of(id)?;
        let item = &items.items()[start_index];
        if !item.is_draggable() {
            return Err(ListError::NotDraggable(id));
        }
        if items.len() < 2 {
            return Err(ListError::NothingToReorder(items.len()));
        }

        self.state = DragState::Dragging { id, start_index };
        self.tag = Some(item.type_tag());
        self.span = Some(tracing::debug_span!(
            target: targets::REORDER,
            span_names::DRAG_SESSION,
            %id,
            start_index
        ));
        tracing::debug!(target: targets::REORDER, %id, start_index, "drag started");
        Ok(start_index)
    }

    /// Applies one intermediate move of the dragged item.
    ///
    /// `from` must be the dragged item's current position; `to` is clamped to
    /// the last position. The item currently at `to` must be draggable too.
    /// Returns the applied `(from, to)`, or `None` when the item stays put.
    ///
    /// # Errors
    ///
    /// - [`ListError::NoActiveDrag`] outside a session.
    /// - [`ListError::DragSourceMismatch`] if `from` is not the dragged item's position.
    /// - [`ListError::NotDraggable`] if the target position holds a fixed item.
    pub fn report_move<D>(
        &mut self,
        items: &mut ItemCollection<D>,
        from: usize,
        to: usize,
    ) -> Result<Option<(usize, usize)>> {
        let DragState::Dragging { id, .. } = self.state else {
            return Err(ListError::NoActiveDrag);
        };
        let _entered = self.span.as_ref().map(tracing::Span::enter);
        let current = items.index_of(id)?;
        if from != current {
            return Err(ListError::DragSourceMismatch {
                expected: current,
                actual: from,
            });
        }

        let to = to.min(items.len().saturating_sub(1));
        if to == from {
            return Ok(None);
        }
        let target = &items.items()[to];
        if !target.is_draggable() {
            return Err(ListError::NotDraggable(target.id()));
        }

        items.move_index(from, to)?;
        tracing::trace!(target: targets::REORDER, %id, from, to, "drag move applied");
        Ok(Some((from, to)))
    }

    /// Ends the session, returning the start and final positions.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NoActiveDrag`] outside a session.
    pub fn end_drag<D>(&mut self, items: &ItemCollection<D>) -> Result<(usize, usize)> {
        let DragState::Dragging { id, start_index } = std::mem::take(&mut self.state) else {
            return Err(ListError::NoActiveDrag);
        };
        self.finish();
        let final_index = items.index_of(id)?;
        tracing::debug!(target: targets::REORDER, %id, start_index, final_index, "drag ended");
        Ok((start_index, final_index))
    }

    /// Cancels the session, putting the dragged item back at its start position.
    ///
    /// Returns the restoring `(from, to)` move, or `None` if the item never
    /// left its start position.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NoActiveDrag`] outside a session.
    pub fn cancel_drag<D>(&mut self, items: &mut ItemCollection<D>) -> Result<Option<(usize, usize)>> {
        let DragState::Dragging { id, start_index } = std::mem::take(&mut self.state) else {
            return Err(ListError::NoActiveDrag);
        };
        self.finish();
        let current = items.index_of(id)?;
        tracing::debug!(target: targets::REORDER, %id, current, start_index, "drag cancelled");
        if current == start_index {
            return Ok(None);
        }
        items.move_index(current, start_index)?;
        Ok(Some((current, start_index)))
    }

    /// Shifts the start position after `count` items were inserted at
    /// `index`. `current` is the dragged item's position before the insert.
    pub(crate) fn note_inserted(&mut self, current: usize, index: usize, count: usize) {
        let DragState::Dragging { id, start_index } = &mut self.state else {
            return;
        };
        // Position among the other items, ignoring the dragged one.
        let base = if index > current { index - 1 } else { index };
        if base < *start_index || (base == *start_index && index <= current) {
            *start_index += count;
            tracing::trace!(target: targets::REORDER, id = %id, start_index = *start_index, "drag start shifted");
        }
    }

    /// Shifts the start position after `count` items, none of them the
    /// dragged one, were removed from `start`. `current` is the dragged
    /// item's position before the removal.
    pub(crate) fn note_removed(&mut self, current: usize, start: usize, count: usize) {
        let DragState::Dragging { id, start_index } = &mut self.state else {
            return;
        };
        let base = if start > current { start - 1 } else { start };
        let before = count.min(start_index.saturating_sub(base));
        if before > 0 {
            *start_index -= before;
            tracing::trace!(target: targets::REORDER, id = %id, start_index = *start_index, "drag start shifted");
        }
    }

    /// Makes the dragged item's current position its start position.
    pub(crate) fn rebase<D>(&mut self, items: &ItemCollection<D>) {
        if let DragState::Dragging { id, start_index } = &mut self.state {
            if let Ok(current) = items.index_of(*id) {
                *start_index = current;
            }
        }
    }

    /// Drops the session if its item left the collection, became fixed, or
    /// came back under another tag.
    ///
    /// Returns `true` if a session was abandoned.
    pub(crate) fn reconcile<D>(&mut self, items: &ItemCollection<D>) -> bool {
        let DragState::Dragging { id, .. } = self.state else {
            return false;
        };
        let reason = match items.get_by_id(id) {
            Err(_) => "dragged item removed",
            Ok(item) if !item.is_draggable() => "dragged item no longer draggable",
            Ok(item) if Some(item.type_tag()) != self.tag => "dragged item changed type",
            Ok(_) => return false,
        };
        tracing::warn!(target: targets::REORDER, %id, reason, "drag abandoned");
        self.state = DragState::Idle;
        self.finish();
        true
    }

    fn finish(&mut self) {
        self.tag = None;
        self.span = None;
    }
}
