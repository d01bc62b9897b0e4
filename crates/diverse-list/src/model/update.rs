//! Update dispatch.
//!
//! Decides, for a changed item, whether the view must fully rebind it or may
//! apply a partial ("payload") update. Payload shape always comes from an
//! explicit hint supplied by the caller. The dispatcher never diffs data to
//! invent one.
//!
//! A partial update is a rendering shortcut only. The collection always holds
//! the complete new data before any update is reported, so a view that
//! ignores the payload and rebinds from the collection ends up in the same
//! state as one that applies it.

use diverse_list_core::logging::targets;
use serde::{Deserialize, Serialize};

/// How the view should refresh a changed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUpdate<P> {
    /// Rebind every facet of the item from its current data.
    FullRebind,
    /// Update only the facet described by the payload.
    Partial(P),
}

impl<P> ItemUpdate<P> {
    /// Returns `true` for a partial update.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_))
    }

    /// Returns the payload of a partial update.
    pub fn payload(&self) -> Option<&P> {
        match self {
            Self::Partial(payload) => Some(payload),
            Self::FullRebind => None,
        }
    }
}

/// Policy applied by the [`UpdateDispatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdatePolicy {
    /// Partial updates when the caller supplies a hint, full rebinds otherwise.
    #[default]
    HintDriven,
    /// Always full rebinds, even when a hint is supplied.
    AlwaysFull,
}

/// Chooses between full rebinds and payload updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateDispatcher {
    policy: UpdatePolicy,
}

impl UpdateDispatcher {
    /// Creates a dispatcher with the given policy.
    pub fn new(policy: UpdatePolicy) -> Self {
        Self { policy }
    }

    /// Returns the active policy.
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// Sets the active policy.
    pub fn set_policy(&mut self, policy: UpdatePolicy) {
        self.policy = policy;
    }

    /// Computes the update for a data replacement.
    ///
    /// The old and new data are not inspected; only the hint determines
    /// whether a partial update is produced.
    pub fn compute_update<D: ?Sized, P>(&self, _old: &D, _new: &D, hint: Option<P>) -> ItemUpdate<P> {
        self.resolve(hint)
    }

    /// Computes the update for a refresh that did not replace data.
    pub fn resolve<P>(&self, hint: Option<P>) -> ItemUpdate<P> {
        let update = match (self.policy, hint) {
            (UpdatePolicy::HintDriven, Some(payload)) => ItemUpdate::Partial(payload),
            _ => ItemUpdate::FullRebind,
        };
        tracing::trace!(target: targets::UPDATE, partial = update.is_partial(), "resolved item update");
        update
    }
}
