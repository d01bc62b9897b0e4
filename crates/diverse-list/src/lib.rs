//! diverse-list: a controller for heterogeneous list views.
//!
//! The crate holds the state behind a scrollable list that renders several
//! distinct item shapes in one list: an ordered collection with stable
//! identities, per-item selection, drag reordering, and partial updates
//! instead of full rebinds. Rendering and gesture detection belong to the
//! view; the view calls into a [`ListController`](model::ListController) and
//! listens to its [`EventHub`](model::EventHub).
//!
//! # Example
//!
//! ```
//! use diverse_list::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Hash)]
//! enum Row {
//!     Header(String),
//!     Fruit(String),
//! }
//!
//! impl ListItem for Row {
//!     fn type_tag(&self) -> TypeTag {
//!         match self {
//!             Row::Header(_) => TypeTag::new(0),
//!             Row::Fruit(_) => TypeTag::new(1),
//!         }
//!     }
//!
//!     fn flags(&self) -> ItemFlags {
//!         match self {
//!             Row::Header(_) => ItemFlags::new(),
//!             Row::Fruit(_) => ItemFlags::selectable().with_drag(true),
//!         }
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let mut list: ListController<Row> = ListController::with_config(
//!         ControllerConfig::new().with_selection_mode(SelectionMode::MultiSelection),
//!     );
//!     list.push(Item::from_data(Row::Header("Fruit".into())))?;
//!     let apple = Item::from_data(Row::Fruit("Apple".into()));
//!     let apple_id = apple.id();
//!     list.push(apple)?;
//!
//!     list.events().on_moved(|from, to| println!("moved {from} -> {to}"));
//!     list.set_selected(apple_id, true)?;
//!     assert!(list.is_selected(apple_id));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;

pub use diverse_list_core::logging;
pub use diverse_list_core::{ConnectionGuard, ConnectionId, Signal};
