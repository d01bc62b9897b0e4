//! Item descriptors.
//!
//! An [`Item`] is a self-describing list entry: a type tag selecting how the
//! view renders it, a stable identity that survives reordering, the bound data,
//! and fixed capability flags.
//!
//! Heterogeneous lists use a caller-defined enum as the data type, with one
//! variant (and one type tag) per item kind:
//!
//! ```
//! use diverse_list::model::{Item, ItemFlags, ListItem, TypeTag};
//!
//! #[derive(Debug, Clone, PartialEq, Hash)]
//! enum Row {
//!     Header(String),
//!     Choice(String),
//! }
//!
//! impl ListItem for Row {
//!     fn type_tag(&self) -> TypeTag {
//!         match self {
//!             Row::Header(_) => TypeTag::new(0),
//!             Row::Choice(_) => TypeTag::new(1),
//!         }
//!     }
//!
//!     fn flags(&self) -> ItemFlags {
//!         match self {
//!             Row::Header(_) => ItemFlags::new(),
//!             Row::Choice(_) => ItemFlags::selectable(),
//!         }
//!     }
//! }
//!
//! let item = Item::from_data(Row::Choice("Apple".into()));
//! assert!(item.flags().selectable);
//! ```

use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

/// Stable identity of an item.
///
/// Unlike a positional index, the identity stays the same across inserts,
/// removals and moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates an identity from a raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ItemId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discriminator selecting which rendering capability applies to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(u32);

impl TypeTag {
    /// Creates a type tag from a raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw tag value.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for TypeTag {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flags indicating what the user may do with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    /// Item can enter the selection.
    pub selectable: bool,
    /// Item can be dragged to reorder the list.
    pub draggable: bool,
}

impl ItemFlags {
    /// Creates flags for a static item (neither selectable nor draggable).
    pub const fn new() -> Self {
        Self {
            selectable: false,
            draggable: false,
        }
    }

    /// Creates flags for a selectable item.
    pub const fn selectable() -> Self {
        Self {
            selectable: true,
            draggable: false,
        }
    }

    /// Creates flags for a draggable item.
    pub const fn draggable() -> Self {
        Self {
            selectable: false,
            draggable: true,
        }
    }

    /// Sets the selectable flag.
    pub const fn with_selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }

    /// Sets the draggable flag.
    pub const fn with_drag(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }
}

/// Trait for data types that describe their own item kind.
///
/// Implement this for the data type of a list (usually an enum with one
/// variant per kind) to build items with [`Item::from_data`].
pub trait ListItem {
    /// Returns the type tag for this value's kind.
    fn type_tag(&self) -> TypeTag;

    /// Returns the capability flags for this value's kind.
    fn flags(&self) -> ItemFlags {
        ItemFlags::new()
    }
}

/// A list entry.
///
/// The type tag, identity and flags are fixed at construction. The data is
/// only ever replaced wholesale through the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct Item<D> {
    type_tag: TypeTag,
    id: ItemId,
    data: D,
    flags: ItemFlags,
}

impl<D> Item<D> {
    /// Creates an item with an explicit identity.
    ///
    /// Prefer this constructor whenever two distinct items may carry equal
    /// data, since hash-derived identities would collide.
    pub fn with_id(type_tag: TypeTag, id: u64, data: D) -> Self {
        Self {
            type_tag,
            id: ItemId(id),
            data,
            flags: ItemFlags::new(),
        }
    }

    /// Sets the capability flags.
    pub fn with_flags(mut self, flags: ItemFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the selectable flag.
    pub fn selectable(mut self, selectable: bool) -> Self {
        self.flags.selectable = selectable;
        self
    }

    /// Sets the draggable flag.
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.flags.draggable = draggable;
        self
    }

    /// Returns the type tag.
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Returns the stable identity.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the bound data.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Returns the capability flags.
    pub fn flags(&self) -> ItemFlags {
        self.flags
    }

    /// Returns `true` if the item may be selected.
    pub fn is_selectable(&self) -> bool {
        self.flags.selectable
    }

    /// Returns `true` if the item may be dragged.
    pub fn is_draggable(&self) -> bool {
        self.flags.draggable
    }

    /// Consumes the item, returning its data.
    pub fn into_data(self) -> D {
        self.data
    }

    /// Swaps in new data, returning the previous value.
    pub(crate) fn replace_data(&mut self, data: D) -> D {
        std::mem::replace(&mut self.data, data)
    }
}

impl<D: Hash> Item<D> {
    /// Creates an item whose identity is derived from its type tag and data.
    ///
    /// Two items of the same kind with equal data get the same identity, and
    /// the second insert is rejected as a duplicate.
    pub fn new(type_tag: TypeTag, data: D) -> Self {
        let id = content_id(type_tag, &data);
        Self::with_id(type_tag, id.get(), data)
    }
}

impl<D: ListItem + Hash> Item<D> {
    /// Creates an item from data that knows its own kind.
    ///
    /// The identity is content-derived as in [`Item::new`].
    pub fn from_data(data: D) -> Self {
        let flags = data.flags();
        Self::new(data.type_tag(), data).with_flags(flags)
    }
}

/// Derives an identity from a type tag and a hashable value.
pub fn content_id<D: Hash + ?Sized>(type_tag: TypeTag, data: &D) -> ItemId {
    let mut hasher = DefaultHasher::new();
    type_tag.hash(&mut hasher);
    data.hash(&mut hasher);
    ItemId(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Hash)]
    enum Row {
        Text(&'static str),
        Handle(&'static str),
    }

    impl ListItem for Row {
        fn type_tag(&self) -> TypeTag {
            match self {
                Row::Text(_) => TypeTag::new(1),
                Row::Handle(_) => TypeTag::new(2),
            }
        }

        fn flags(&self) -> ItemFlags {
            match self {
                Row::Text(_) => ItemFlags::selectable(),
                Row::Handle(_) => ItemFlags::draggable(),
            }
        }
    }

    #[test]
    fn test_item_flags() {
        let flags = ItemFlags::new();
        assert!(!flags.selectable);
        assert!(!flags.draggable);

        let both = ItemFlags::selectable().with_drag(true);
        assert!(both.selectable);
        assert!(both.draggable);
    }

    #[test]
    fn test_explicit_identity() {
        let item = Item::with_id(TypeTag::new(3), 42, "hello").selectable(true);
        assert_eq!(item.id(), ItemId::new(42));
        assert_eq!(item.type_tag(), TypeTag::new(3));
        assert_eq!(*item.data(), "hello");
        assert!(item.is_selectable());
        assert!(!item.is_draggable());
    }

    #[test]
    fn test_content_identity_is_stable() {
        let a = Item::new(TypeTag::new(1), "same");
        let b = Item::new(TypeTag::new(1), "same");
        let other_kind = Item::new(TypeTag::new(2), "same");

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), other_kind.id());
    }

    #[test]
    fn test_from_data_uses_kind_flags() {
        let text = Item::from_data(Row::Text("a"));
        let handle = Item::from_data(Row::Handle("a"));

        assert_eq!(text.type_tag(), TypeTag::new(1));
        assert!(text.is_selectable());
        assert_eq!(handle.type_tag(), TypeTag::new(2));
        assert!(handle.is_draggable());
    }

    #[test]
    fn test_replace_data_keeps_identity() {
        let mut item = Item::with_id(TypeTag::new(0), 7, String::from("old"));
        let old = item.replace_data(String::from("new"));
        assert_eq!(old, "old");
        assert_eq!(item.data(), "new");
        assert_eq!(item.id(), ItemId::new(7));
    }
}
