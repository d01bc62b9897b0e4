//! Type registry.
//!
//! Maps each [`TypeTag`] to the [`ItemKind`] the view needs in order to render
//! items of that tag. The registry validates and counts; it never renders.

use std::borrow::Cow;
use std::collections::HashMap;

use diverse_list_core::logging::targets;

use crate::error::{ListError, Result};

use super::item::{ItemFlags, TypeTag};

/// Description of one item kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKind {
    name: Cow<'static, str>,
    default_flags: ItemFlags,
}

impl ItemKind {
    /// Creates a kind with the given display name and static default flags.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            default_flags: ItemFlags::new(),
        }
    }

    /// Sets the flags items of this kind usually carry.
    pub fn with_default_flags(mut self, flags: ItemFlags) -> Self {
        self.default_flags = flags;
        self
    }

    /// Returns the kind's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind's default flags.
    pub fn default_flags(&self) -> ItemFlags {
        self.default_flags
    }
}

#[derive(Debug, Clone)]
struct Entry {
    kind: ItemKind,
    /// Number of live items carrying this tag.
    live: usize,
    /// Registered on first insert rather than by the caller.
    implicit: bool,
}

/// Registry of the item kinds a list may contain.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<TypeTag, Entry>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind under a tag.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::DuplicateType`] if the tag was registered
    /// explicitly before. A tag that was only auto-registered by an insert is
    /// upgraded to the explicit kind, keeping its live count.
    pub fn register(&mut self, tag: TypeTag, kind: ItemKind) -> Result<()> {
        match self.entries.get_mut(&tag) {
            Some(entry) if !entry.implicit => Err(ListError::DuplicateType(tag)),
            Some(entry) => {
                entry.kind = kind;
                entry.implicit = false;
                Ok(())
            }
            None => {
                tracing::trace!(target: targets::REGISTRY, %tag, name = kind.name(), "registered item kind");
                self.entries.insert(
                    tag,
                    Entry {
                        kind,
                        live: 0,
                        implicit: false,
                    },
                );
                Ok(())
            }
        }
    }

    /// Removes an explicit registration.
    ///
    /// Returns the kind if the tag was registered and no live item uses it.
    pub fn unregister(&mut self, tag: TypeTag) -> Option<ItemKind> {
        match self.entries.get(&tag) {
            Some(entry) if entry.live == 0 => self.entries.remove(&tag).map(|entry| entry.kind),
            _ => None,
        }
    }

    /// Returns the kind registered under a tag.
    pub fn kind(&self, tag: TypeTag) -> Option<&ItemKind> {
        self.entries.get(&tag).map(|entry| &entry.kind)
    }

    /// Returns `true` if the tag is known to the registry.
    pub fn is_registered(&self, tag: TypeTag) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Returns the number of live items carrying the tag.
    pub fn live_count(&self, tag: TypeTag) -> usize {
        self.entries.get(&tag).map_or(0, |entry| entry.live)
    }

    /// Returns the tags that currently have live items, in ascending order.
    pub fn tags_in_use(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.live > 0)
            .map(|(tag, _)| *tag)
            .collect();
        tags.sort_unstable();
        tags
    }

    /// Checks that items with this tag may be inserted.
    pub(crate) fn check(&self, tag: TypeTag, strict: bool) -> Result<()> {
        if strict && !self.is_registered(tag) {
            return Err(ListError::UnknownType(tag));
        }
        Ok(())
    }

    /// Records `count` new live items with the tag, auto-registering it if needed.
    pub(crate) fn retain(&mut self, tag: TypeTag, count: usize) {
        let entry = self.entries.entry(tag).or_insert_with(|| {
            tracing::trace!(target: targets::REGISTRY, %tag, "auto-registered item kind");
            Entry {
                kind: ItemKind::new(format!("type-{tag}")),
                live: 0,
                implicit: true,
            }
        });
        entry.live += count;
    }

    /// Records that one live item with the tag went away.
    ///
    /// Auto-registered tags are forgotten with their last item.
    pub(crate) fn release(&mut self, tag: TypeTag) {
        let Some(entry) = self.entries.get_mut(&tag) else {
            return;
        };
        entry.live = entry.live.saturating_sub(1);
        if entry.live == 0 && entry.implicit {
            self.entries.remove(&tag);
            tracing::trace!(target: targets::REGISTRY, %tag, "dropped auto-registered kind");
        }
    }
}
