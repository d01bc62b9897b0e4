//! Logging facilities for diverse-list.
//!
//! diverse-list uses the `tracing` crate for instrumentation. The library never
//! installs a subscriber; applications (and tests) choose their own:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("diverse_list=debug")
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the fixed [`targets`], so a filter such as
//! `diverse_list::reorder=trace` isolates the drag machinery.

/// Span names used throughout diverse-list for tracing.
pub mod span_names {
    /// Drag session span.
    pub const DRAG_SESSION: &str = "diverse_list::drag_session";
    /// Keyed list replacement span.
    pub const REPLACE_ITEMS: &str = "diverse_list::replace_items";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "diverse_list_core::signal";
    /// Controller facade target.
    pub const CONTROLLER: &str = "diverse_list::controller";
    /// Ordered item storage target.
    pub const COLLECTION: &str = "diverse_list::collection";
    /// Type registry target.
    pub const REGISTRY: &str = "diverse_list::registry";
    /// Selection state machine target.
    pub const SELECTION: &str = "diverse_list::selection";
    /// Drag reordering target.
    pub const REORDER: &str = "diverse_list::reorder";
    /// Update dispatch target.
    pub const UPDATE: &str = "diverse_list::update";
    /// Event hub target.
    pub const EVENTS: &str = "diverse_list::events";
}
