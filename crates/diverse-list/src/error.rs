//! Error types for the list controller.

use crate::model::{ItemId, TypeTag};

/// Result type alias for list controller operations.
pub type Result<T> = std::result::Result<T, ListError>;

/// Errors returned by list controller operations.
///
/// Every variant is returned from the call that caused it, and a call that
/// fails leaves the collection, selection, registry and drag session exactly
/// as they were before the call.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// An item with this identity is already in the collection.
    #[error("an item with identity {0} is already present")]
    DuplicateIdentity(ItemId),

    /// No item with this identity is in the collection.
    #[error("no item with identity {0}")]
    NotFound(ItemId),

    /// A positional index is outside the collection.
    #[error("index {index} is out of range for a list of {len} items")]
    OutOfRange { index: usize, len: usize },

    /// The item exists but cannot be selected.
    #[error("item {0} is not selectable")]
    NotSelectable(ItemId),

    /// The item exists but cannot be dragged.
    #[error("item {0} is not draggable")]
    NotDraggable(ItemId),

    /// A drag session is already running for the given item.
    #[error("a drag of item {0} is already in progress")]
    DragInProgress(ItemId),

    /// A drag was requested on a list with fewer than two items.
    #[error("a list of {0} items cannot be reordered")]
    NothingToReorder(usize),

    /// A drag operation was requested while no drag session is running.
    #[error("no drag is in progress")]
    NoActiveDrag,

    /// A reported move does not start at the dragged item's position.
    #[error("move reported from index {actual}, but the dragged item is at index {expected}")]
    DragSourceMismatch { expected: usize, actual: usize },

    /// The type tag has not been registered and strict typing is enabled.
    #[error("type tag {0} is not registered")]
    UnknownType(TypeTag),

    /// The type tag is already registered to another kind.
    #[error("type tag {0} is already registered")]
    DuplicateType(TypeTag),

    /// The controller configuration could not be parsed.
    #[error("invalid controller configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ListError {
    /// Create an out-of-range error.
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::OutOfRange { index, len }
    }
}
