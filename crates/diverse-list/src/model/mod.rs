//! Heterogeneous list model.
//!
//! This module provides the state layer behind a list view that renders
//! several item shapes in one list. The view owns rendering and gesture
//! detection; everything else lives here:
//!
//! - `Item`: type tag, stable identity, data and capability flags
//! - `TypeRegistry`: the item kinds a list may contain
//! - `ItemCollection`: ordered storage with O(1) identity lookup
//! - `SelectionModel`: the NONE / SINGLE / MULTIPLE selection state machine
//! - `ReorderController`: one drag session at a time
//! - `UpdateDispatcher`: full rebind versus payload update
//! - `EventHub`: listener fan-out
//! - `ListController`: ties the above together
//!
//! # Example
//!
//! ```
//! use diverse_list::model::{Item, ItemId, ListChange, ListController, TypeTag};
//!
//! let mut list: ListController<String, &'static str> = ListController::new();
//! list.events().on_items_changed(|change| match change {
//!     ListChange::Changed { index, update } => println!("refresh {index}: {update:?}"),
//!     other => println!("{other:?}"),
//! });
//!
//! list.push(Item::with_id(TypeTag::new(0), 1, "Hello".to_string())).unwrap();
//! list.replace_data(ItemId::new(1), "Hello, world".to_string(), Some("text"))
//!     .unwrap();
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────┐  calls   ┌────────────────┐  events  ┌──────────┐
//! │ View / gestures  │─────────>│ ListController │─────────>│ EventHub │
//! └──────────────────┘          └────────────────┘          └──────────┘
//!                                  │    │    │
//!                  ┌───────────────┘    │    └───────────────┐
//!                  v                    v                    v
//!          ┌────────────────┐  ┌────────────────┐  ┌───────────────────┐
//!          │ ItemCollection │  │ SelectionModel │  │ ReorderController │
//!          └────────────────┘  └────────────────┘  └───────────────────┘
//! ```

mod collection;
mod controller;
mod diff;
mod events;
mod item;
mod registry;
mod reorder;
pub mod selection;
mod update;

pub use collection::{DataChange, ItemCollection};
pub use controller::{ListController, SelectionOutcome};
pub use diff::diff_items;
pub use events::{EventHub, ListChange};
pub use item::{Item, ItemFlags, ItemId, ListItem, TypeTag, content_id};
pub use registry::{ItemKind, TypeRegistry};
pub use reorder::{DragState, ReorderController};
pub use selection::{SelectionChange, SelectionMode, SelectionModel};
pub use update::{ItemUpdate, UpdateDispatcher, UpdatePolicy};
