//! Convenient re-exports for common use.
//!
//! ```
//! use diverse_list::prelude::*;
//! ```

pub use crate::config::ControllerConfig;
pub use crate::error::{ListError, Result};
pub use crate::model::{
    DragState, EventHub, Item, ItemFlags, ItemId, ItemKind, ItemUpdate, ListChange,
    ListController, ListItem, SelectionChange, SelectionMode, SelectionOutcome, TypeTag,
    UpdatePolicy,
};
pub use diverse_list_core::{ConnectionGuard, ConnectionId, Signal};
