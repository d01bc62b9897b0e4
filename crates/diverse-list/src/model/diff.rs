//! Keyed list diff.
//!
//! Computes the change set that turns one item sequence into another, matching
//! items by identity. The changes are meant to be applied in the order they
//! are returned:
//!
//! 1. [`ListChange::Removed`] for identities that vanished, back to front.
//! 2. [`ListChange::Moved`] for survivors outside the longest run that already
//!    has the right relative order.
//! 3. [`ListChange::Inserted`] for new identities, front to back.
//! 4. [`ListChange::Changed`] for survivors whose data differs, at their new
//!    positions.
//!
//! An identity whose type tag changed is not a survivor: it is removed and
//! inserted again.

use std::collections::{HashMap, HashSet};

use diverse_list_core::logging::targets;

use crate::error::{ListError, Result};

use super::events::ListChange;
use super::item::{Item, ItemId, TypeTag};
use super::update::UpdateDispatcher;

/// Computes the changes turning `old` into `new`.
///
/// `payload` is consulted for every survivor whose data changed; returning
/// `None` requests a full rebind.
///
/// # Errors
///
/// Returns [`ListError::DuplicateIdentity`] if `new` contains an identity twice.
pub fn diff_items<D, P>(
    old: &[Item<D>],
    new: &[Item<D>],
    dispatcher: &UpdateDispatcher,
    payload: impl Fn(TypeTag, &D, &D) -> Option<P>,
) -> Result<Vec<ListChange<P>>>
where
    D: PartialEq,
{
    let mut new_positions: HashMap<ItemId, usize> = HashMap::with_capacity(new.len());
    for (index, item) in new.iter().enumerate() {
        if new_positions.insert(item.id(), index).is_some() {
            return Err(ListError::DuplicateIdentity(item.id()));
        }
    }

    // Survivors: same identity and same tag on both sides.
    let survives = |item: &Item<D>| {
        new_positions
            .get(&item.id())
            .is_some_and(|&index| new[index].type_tag() == item.type_tag())
    };

    let mut changes = Vec::new();

    // Removals, back to front so earlier indices stay valid.
    let mut index = old.len();
    while index > 0 {
        if survives(&old[index - 1]) {
            index -= 1;
            continue;
        }
        let end = index;
        while index > 0 && !survives(&old[index - 1]) {
            index -= 1;
        }
        changes.push(ListChange::Removed {
            index,
            count: end - index,
        });
    }

    // Survivors in their current order, and in the order they must end up.
    let mut working: Vec<ItemId> = old
        .iter()
        .filter(|item| survives(item))
        .map(Item::id)
        .collect();
    let surviving: HashSet<ItemId> = working.iter().copied().collect();
    let target: Vec<ItemId> = new
        .iter()
        .map(Item::id)
        .filter(|id| surviving.contains(id))
        .collect();

    let ranks: Vec<usize> = working.iter().map(|id| new_positions[id]).collect();
    let stable: HashSet<ItemId> = longest_increasing_run(&ranks)
        .into_iter()
        .map(|at| working[at])
        .collect();

    // Each unstable survivor, in target order, goes right after its target
    // predecessor. Stable survivors never move.
    for (rank, &id) in target.iter().enumerate() {
        if stable.contains(&id) {
            continue;
        }
        let Some(from) = working.iter().position(|&current| current == id) else {
            continue;
        };
        working.remove(from);
        let to = match rank {
            0 => 0,
            _ => working
                .iter()
                .position(|&current| current == target[rank - 1])
                .map_or(0, |at| at + 1),
        };
        working.insert(to, id);
        if from != to {
            changes.push(ListChange::Moved { from, to });
        }
    }

    // Insertions, front to back, coalescing runs.
    let mut index = 0;
    while index < new.len() {
        if surviving.contains(&new[index].id()) {
            index += 1;
            continue;
        }
        let start = index;
        while index < new.len() && !surviving.contains(&new[index].id()) {
            index += 1;
        }
        changes.push(ListChange::Inserted {
            index: start,
            count: index - start,
        });
    }

    // Data changes, at final positions.
    for item in old.iter().filter(|item| surviving.contains(&item.id())) {
        let index = new_positions[&item.id()];
        let replacement = &new[index];
        if item.data() == replacement.data() {
            continue;
        }
        let hint = payload(item.type_tag(), item.data(), replacement.data());
        changes.push(ListChange::Changed {
            index,
            update: dispatcher.compute_update(item.data(), replacement.data(), hint),
        });
    }

    tracing::trace!(
        target: targets::UPDATE,
        old_len = old.len(),
        new_len = new.len(),
        changes = changes.len(),
        "computed keyed diff"
    );
    Ok(changes)
}

/// Returns the positions of one longest strictly increasing subsequence.
fn longest_increasing_run(values: &[usize]) -> Vec<usize> {
    // tails[k]: position of the smallest tail of an increasing run of length k + 1.
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; values.len()];

    for (at, &value) in values.iter().enumerate() {
        let slot = tails.partition_point(|&tail| values[tail] < value);
        previous[at] = slot.checked_sub(1).map(|before| tails[before]);
        if slot == tails.len() {
            tails.push(at);
        } else {
            tails[slot] = at;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(at) = cursor {
        run.push(at);
        cursor = previous[at];
    }
    run.reverse();
    run
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: TypeTag = TypeTag::new(0);
    const IMAGE: TypeTag = TypeTag::new(1);

    fn items(ids: &[u64]) -> Vec<Item<String>> {
        ids.iter()
            .map(|&id| Item::with_id(TEXT, id, format!("Item {id}")))
            .collect()
    }

    fn no_payload(_: TypeTag, _: &String, _: &String) -> Option<()> {
        None
    }

    /// Replays `changes` against the ids of `old`, inserting from `new`.
    fn replay<P>(old: &[Item<String>], new: &[Item<String>], changes: &[ListChange<P>]) -> Vec<u64> {
        let mut ids: Vec<u64> = old.iter().map(|item| item.id().get()).collect();
        for change in changes {
            match *change {
                ListChange::Removed { index, count } => {
                    ids.drain(index..index + count);
                }
                ListChange::Moved { from, to } => {
                    let id = ids.remove(from);
                    ids.insert(to, id);
                }
                ListChange::Inserted { index, count } => {
                    for offset in 0..count {
                        ids.insert(index + offset, new[index + offset].id().get());
                    }
                }
                ListChange::Changed { .. } => {}
            }
        }
        ids
    }

    fn check(old: &[u64], new: &[u64]) -> Vec<ListChange<()>> {
        let (old, new) = (items(old), items(new));
        let changes = diff_items(&old, &new, &UpdateDispatcher::default(), no_payload).unwrap();
        let expected: Vec<u64> = new.iter().map(|item| item.id().get()).collect();
        assert_eq!(replay(&old, &new, &changes), expected);
        changes
    }

    #[test]
    fn test_identical_lists_produce_nothing() {
        assert!(check(&[1, 2, 3], &[1, 2, 3]).is_empty());
    }

    #[test]
    fn test_sliding_window() {
        let changes = check(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9], &[5, 6, 7, 8, 9, 10, 11, 12, 13, 14]);
        assert_eq!(
            changes,
            vec![
                ListChange::Removed { index: 0, count: 5 },
                ListChange::Inserted { index: 5, count: 5 },
            ]
        );
    }

    #[test]
    fn test_single_move_to_back() {
        let changes = check(&[1, 2, 3, 4], &[2, 3, 4, 1]);
        assert_eq!(changes, vec![ListChange::Moved { from: 0, to: 3 }]);
    }

    #[test]
    fn test_reversal_and_mixed_changes() {
        check(&[1, 2, 3, 4, 5], &[5, 4, 3, 2, 1]);
        check(&[1, 2, 3, 4, 5], &[6, 4, 1, 7, 3]);
        check(&[], &[1, 2]);
        check(&[1, 2], &[]);
    }

    #[test]
    fn test_duplicate_identity_rejected() {
        let old = items(&[1]);
        let new = items(&[2, 3, 2]);
        let err = diff_items(&old, &new, &UpdateDispatcher::default(), no_payload).unwrap_err();
        assert!(matches!(err, ListError::DuplicateIdentity(id) if id == ItemId::new(2)));
    }

    #[test]
    fn test_tag_change_is_remove_and_insert() {
        let old = items(&[1, 2]);
        let new = vec![
            Item::with_id(TEXT, 1, "Item 1".to_string()),
            Item::with_id(IMAGE, 2, "Item 2".to_string()),
        ];
        let changes = diff_items(&old, &new, &UpdateDispatcher::default(), no_payload).unwrap();
        assert_eq!(
            changes,
            vec![
                ListChange::Removed { index: 1, count: 1 },
                ListChange::Inserted { index: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn test_changed_data_uses_payload_provider() {
        let old = items(&[1, 2, 3]);
        let mut new = items(&[3, 1, 2]);
        new[1] = Item::with_id(TEXT, 1, "Renamed".to_string());

        let changes = diff_items(&old, &new, &UpdateDispatcher::default(), |tag, before, after| {
            assert_eq!(tag, TEXT);
            Some(format!("{before} -> {after}"))
        })
        .unwrap();

        assert_eq!(
            changes.last(),
            Some(&ListChange::Changed {
                index: 1,
                update: crate::model::ItemUpdate::Partial("Item 1 -> Renamed".to_string()),
            })
        );
    }

    #[test]
    fn test_longest_increasing_run() {
        assert_eq!(longest_increasing_run(&[]), Vec::<usize>::new());
        assert_eq!(longest_increasing_run(&[3, 0, 1, 2]), vec![1, 2, 3]);
        assert_eq!(longest_increasing_run(&[4, 3, 2, 1]).len(), 1);
    }
}
