//! Ordered item storage.
//!
//! [`ItemCollection`] is an array-backed sequence of [`Item`]s plus an
//! identity-to-position lookup. Positions are rewritten for the affected span
//! after each structural change, so "where is item X now" stays O(1) while
//! inserts, removals and moves remain O(n) shifts.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use diverse_list_core::logging::targets;

use crate::error::{ListError, Result};

use super::item::{Item, ItemId, TypeTag};

/// Record of a data replacement, consumed by the update dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DataChange<D> {
    /// Position of the item at the time of the change.
    pub index: usize,
    /// Identity of the changed item.
    pub id: ItemId,
    /// Type tag of the changed item.
    pub type_tag: TypeTag,
    /// The data that was replaced.
    pub old_data: D,
}

/// An ordered list of items with unique identities.
#[derive(Debug, Clone)]
pub struct ItemCollection<D> {
    items: Vec<Item<D>>,
    positions: HashMap<ItemId, usize>,
}

impl<D> Default for ItemCollection<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> ItemCollection<D> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the items in order.
    pub fn items(&self) -> &[Item<D>] {
        &self.items
    }

    /// Iterates over the items in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Item<D>> {
        self.items.iter()
    }

    /// Returns the identities in order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id).collect()
    }

    /// Returns the item at a position.
    pub fn get(&self, index: usize) -> Result<&Item<D>> {
        self.items
            .get(index)
            .ok_or_else(|| ListError::out_of_range(index, self.items.len()))
    }

    /// Returns the item with an identity.
    pub fn get_by_id(&self, id: ItemId) -> Result<&Item<D>> {
        let index = self.index_of(id)?;
        Ok(&self.items[index])
    }

    /// Returns the current position of an identity.
    pub fn index_of(&self, id: ItemId) -> Result<usize> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(ListError::NotFound(id))
    }

    /// Returns `true` if an item with this identity is present.
    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Inserts an item, by default at the end.
    ///
    /// A position past the end is clamped to the end. Returns the position
    /// the item actually landed at.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::DuplicateIdentity`] if the identity is already
    /// present; the collection is unchanged.
    pub fn insert(&mut self, item: Item<D>, at: Option<usize>) -> Result<usize> {
        if self.contains(item.id()) {
            return Err(ListError::DuplicateIdentity(item.id()));
        }
        let index = at.map_or(self.items.len(), |at| at.min(self.items.len()));
        tracing::trace!(target: targets::COLLECTION, id = %item.id(), index, "inserting item");

        self.items.insert(index, item);
        self.reindex(index..self.items.len());
        Ok(index)
    }

    /// Inserts a batch of items contiguously, by default at the end.
    ///
    /// Either every item is inserted or none is. Returns the range of
    /// positions the batch occupies.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::DuplicateIdentity`] if any identity is already
    /// present or appears twice in the batch.
    pub fn insert_many(&mut self, items: Vec<Item<D>>, at: Option<usize>) -> Result<Range<usize>> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if self.contains(item.id()) || !seen.insert(item.id()) {
                return Err(ListError::DuplicateIdentity(item.id()));
            }
        }

        let start = at.map_or(self.items.len(), |at| at.min(self.items.len()));
        let end = start + items.len();
        tracing::trace!(target: targets::COLLECTION, start, count = items.len(), "inserting batch");

        self.items.splice(start..start, items);
        self.reindex(start..self.items.len());
        Ok(start..end)
    }

    /// Removes the item with an identity, returning its former position and the item.
    pub fn remove(&mut self, id: ItemId) -> Result<(usize, Item<D>)> {
        let index = self.index_of(id)?;
        let item = self.remove_at(index)?;
        Ok((index, item))
    }

    /// Removes the item at a position.
    pub fn remove_at(&mut self, index: usize) -> Result<Item<D>> {
        if index >= self.items.len() {
            return Err(ListError::out_of_range(index, self.items.len()));
        }
        let item = self.items.remove(index);
        tracing::trace!(target: targets::COLLECTION, id = %item.id(), index, "removed item");

        self.positions.remove(&item.id());
        self.reindex(index..self.items.len());
        Ok(item)
    }

    /// Removes `count` items starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::OutOfRange`] if the range reaches past the end.
    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<Vec<Item<D>>> {
        let len = self.items.len();
        if start > len || count > len - start {
            let last = start.saturating_add(count.max(1)) - 1;
            return Err(ListError::out_of_range(last, len));
        }

        let removed: Vec<Item<D>> = self.items.drain(start..start + count).collect();
        for item in &removed {
            self.positions.remove(&item.id());
        }
        self.reindex(start..self.items.len());
        tracing::trace!(target: targets::COLLECTION, start, count, "removed range");
        Ok(removed)
    }

    /// Removes every item.
    pub fn clear(&mut self) -> Vec<Item<D>> {
        self.positions.clear();
        std::mem::take(&mut self.items)
    }

    /// Moves an item to a new position, clamped to `[0, len - 1]`.
    ///
    /// Returns the position the item was moved from. Identity, flags and
    /// data are untouched.
    pub fn move_to(&mut self, id: ItemId, new_index: usize) -> Result<usize> {
        let from = self.index_of(id)?;
        let to = new_index.min(self.items.len() - 1);
        self.shift(from, to);
        Ok(from)
    }

    /// Moves the item at `from` to `to`. Both positions must be in range.
    pub fn move_index(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        if from >= len {
            return Err(ListError::out_of_range(from, len));
        }
        if to >= len {
            return Err(ListError::out_of_range(to, len));
        }
        self.shift(from, to);
        Ok(())
    }

    /// Replaces the data of an item, keeping its identity, tag and flags.
    pub fn replace_data(&mut self, id: ItemId, data: D) -> Result<DataChange<D>> {
        let index = self.index_of(id)?;
        let item = &mut self.items[index];
        let old_data = item.replace_data(data);
        tracing::trace!(target: targets::COLLECTION, %id, index, "replaced item data");

        Ok(DataChange {
            index,
            id,
            type_tag: item.type_tag(),
            old_data,
        })
    }

    /// Returns the position of the first item with the tag.
    pub fn first_index_of_type(&self, tag: TypeTag) -> Option<usize> {
        self.items.iter().position(|item| item.type_tag() == tag)
    }

    /// Returns the position of the last item with the tag.
    pub fn last_index_of_type(&self, tag: TypeTag) -> Option<usize> {
        self.items.iter().rposition(|item| item.type_tag() == tag)
    }

    fn shift(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        if from < to {
            self.items[from..=to].rotate_left(1);
            self.reindex(from..to + 1);
        } else {
            self.items[to..=from].rotate_right(1);
            self.reindex(to..from + 1);
        }
        tracing::trace!(target: targets::COLLECTION, from, to, "moved item");
    }

    fn reindex(&mut self, span: Range<usize>) {
        for index in span {
            self.positions.insert(self.items[index].id(), index);
        }
    }
}

impl<'a, D> IntoIterator for &'a ItemCollection<D> {
    type Item = &'a Item<D>;
    type IntoIter = std::slice::Iter<'a, Item<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
