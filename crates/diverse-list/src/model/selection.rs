//! Selection model for list controllers.
//!
//! This module provides [`SelectionModel`], which tracks which item identities
//! are selected under a [`SelectionMode`]. Selection is keyed by [`ItemId`],
//! never by position, so moves and data replacements leave it untouched.
//!
//! Every mutating call returns the [`SelectionChange`]s it caused, in the
//! order listeners must see them: identities being cleared first (oldest
//! selection first), then the newly selected identity.
//!
//! # Example
//!
//! ```
//! use diverse_list::model::{ItemId, SelectionChange, SelectionMode, SelectionModel};
//!
//! let mut selection = SelectionModel::new(SelectionMode::SingleSelection);
//! selection.select(ItemId::new(1));
//! let changes = selection.select(ItemId::new(2));
//!
//! assert_eq!(
//!     changes,
//!     vec![
//!         SelectionChange::deselected(ItemId::new(1)),
//!         SelectionChange::selected(ItemId::new(2)),
//!     ]
//! );
//! ```

use std::collections::HashSet;

use diverse_list_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::item::ItemId;

/// Policy constraining how many items may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// No items can be selected. Select requests are no-ops.
    #[default]
    #[serde(rename = "none")]
    NoSelection,
    /// At most one item is selected; selecting another replaces it.
    #[serde(rename = "single")]
    SingleSelection,
    /// Any number of items can be selected.
    #[serde(rename = "multiple")]
    MultiSelection,
}

/// One identity whose selection state flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionChange {
    /// The affected item.
    pub id: ItemId,
    /// The new selection state.
    pub selected: bool,
}

impl SelectionChange {
    /// A change to the selected state.
    pub const fn selected(id: ItemId) -> Self {
        Self { id, selected: true }
    }

    /// A change to the deselected state.
    pub const fn deselected(id: ItemId) -> Self {
        Self {
            id,
            selected: false,
        }
    }
}

/// Manages selection state for a list.
///
/// Invariants, for every reachable state:
/// - `NoSelection` implies nothing is selected.
/// - `SingleSelection` implies at most one identity is selected.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    /// Current selection mode.
    mode: SelectionMode,

    /// Set of selected IDs for O(1) lookup.
    selected_ids: HashSet<ItemId>,

    /// Selected IDs, oldest selection first.
    selection_order: Vec<ItemId>,
}

impl SelectionModel {
    /// Creates an empty selection model with the given mode.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    // =========================================================================
    // Selection Mode
    // =========================================================================

    /// Gets the current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.mode
    }

    /// Sets the selection mode.
    ///
    /// The new mode never inherits a selection it cannot represent:
    /// - to `NoSelection`: everything is cleared.
    /// - to `SingleSelection`: only the most recently selected identity
    ///   survives.
    ///
    /// Setting the current mode again is a no-op.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> Vec<SelectionChange> {
        if mode == self.mode {
            return Vec::new();
        }
        tracing::debug!(target: targets::SELECTION, from = ?self.mode, to = ?mode, "selection mode changed");
        self.mode = mode;

        let keep = match mode {
            SelectionMode::NoSelection => 0,
            SelectionMode::SingleSelection => 1,
            SelectionMode::MultiSelection => return Vec::new(),
        };
        let surplus = self.selection_order.len().saturating_sub(keep);
        let cleared: Vec<ItemId> = self.selection_order.drain(..surplus).collect();
        cleared
            .into_iter()
            .map(|id| {
                self.selected_ids.remove(&id);
                SelectionChange::deselected(id)
            })
            .collect()
    }

    // =========================================================================
    // Selection Queries
    // =========================================================================

    /// Checks if an identity is selected.
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Returns true if any items are selected.
    pub fn has_selection(&self) -> bool {
        !self.selection_order.is_empty()
    }

    /// Returns the number of selected items.
    pub fn selected_count(&self) -> usize {
        self.selection_order.len()
    }

    /// Returns a snapshot of the selected identities.
    pub fn selected_ids(&self) -> HashSet<ItemId> {
        self.selected_ids.clone()
    }

    /// Returns the selected identities, oldest selection first.
    pub fn selection_order(&self) -> &[ItemId] {
        &self.selection_order
    }

    // =========================================================================
    // Selection Operations
    // =========================================================================

    /// Selects an identity.
    ///
    /// Under `SingleSelection` a different selected identity is deselected
    /// first. Under `NoSelection` nothing happens.
    pub fn select(&mut self, id: ItemId) -> Vec<SelectionChange> {
        if self.mode == SelectionMode::NoSelection || self.is_selected(id) {
            return Vec::new();
        }

        let mut changes = Vec::with_capacity(2);
        if self.mode == SelectionMode::SingleSelection {
            for previous in self.selection_order.drain(..) {
                self.selected_ids.remove(&previous);
                changes.push(SelectionChange::deselected(previous));
            }
        }

        self.selected_ids.insert(id);
        self.selection_order.push(id);
        changes.push(SelectionChange::selected(id));
        tracing::trace!(target: targets::SELECTION, %id, "selected");
        changes
    }

    /// Deselects an identity.
    pub fn deselect(&mut self, id: ItemId) -> Vec<SelectionChange> {
        if !self.selected_ids.remove(&id) {
            return Vec::new();
        }
        self.selection_order.retain(|selected| *selected != id);
        tracing::trace!(target: targets::SELECTION, %id, "deselected");
        vec![SelectionChange::deselected(id)]
    }

    /// Selects or deselects an identity.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) -> Vec<SelectionChange> {
        if selected {
            self.select(id)
        } else {
            self.deselect(id)
        }
    }

    /// Flips the selection state of an identity.
    pub fn toggle(&mut self, id: ItemId) -> Vec<SelectionChange> {
        let selected = !self.is_selected(id);
        self.set_selected(id, selected)
    }

    /// Deselects everything, oldest selection first.
    pub fn clear(&mut self) -> Vec<SelectionChange> {
        self.selected_ids.clear();
        self.selection_order
            .drain(..)
            .map(SelectionChange::deselected)
            .collect()
    }

    /// Drops an identity without reporting a change.
    ///
    /// Used when the item itself leaves the list; the removal notification
    /// already tells the view everything it needs.
    pub fn forget(&mut self, id: ItemId) -> bool {
        if !self.selected_ids.remove(&id) {
            return false;
        }
        self.selection_order.retain(|selected| *selected != id);
        true
    }

    /// Keeps only the selected identities for which `keep` returns `true`,
    /// without reporting changes.
    pub fn retain(&mut self, mut keep: impl FnMut(ItemId) -> bool) {
        let selected_ids = &mut self.selected_ids;
        self.selection_order.retain(|id| {
            let kept = keep(*id);
            if !kept {
                selected_ids.remove(id);
            }
            kept
        });
    }
}
