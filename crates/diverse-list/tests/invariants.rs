//! Randomized invariant checks.
//!
//! Drives a controller with seeded random operation sequences and checks,
//! after every step, the invariants that must hold in any reachable state.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use diverse_list::prelude::*;

const TEXT: TypeTag = TypeTag::new(0);
const HEADER: TypeTag = TypeTag::new(1);
const STEPS: usize = 400;

fn random_item(rng: &mut StdRng) -> Item<u32> {
    let id = rng.gen_range(0..64);
    if rng.gen_bool(0.2) {
        Item::with_id(HEADER, id, 0)
    } else {
        Item::with_id(TEXT, id, rng.r#gen())
            .selectable(true)
            .draggable(rng.gen_bool(0.8))
    }
}

fn random_mode(rng: &mut StdRng) -> SelectionMode {
    match rng.gen_range(0..3) {
        0 => SelectionMode::NoSelection,
        1 => SelectionMode::SingleSelection,
        _ => SelectionMode::MultiSelection,
    }
}

fn check_invariants(list: &ListController<u32>) {
    let ids = list.items().ids();
    let unique: HashSet<ItemId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "identities must be unique");

    for (index, id) in ids.iter().enumerate() {
        assert_eq!(list.index_of(*id).unwrap(), index);
    }

    let selected = list.selected_ids();
    match list.selection_mode() {
        SelectionMode::NoSelection => assert!(selected.is_empty()),
        SelectionMode::SingleSelection => assert!(selected.len() <= 1),
        SelectionMode::MultiSelection => {}
    }
    for id in &selected {
        assert!(list.get_by_id(*id).unwrap().is_selectable());
    }

    for tag in [TEXT, HEADER] {
        let live = ids
            .iter()
            .filter(|id| list.get_by_id(**id).unwrap().type_tag() == tag)
            .count();
        assert_eq!(list.registry().live_count(tag), live);
    }

    if let DragState::Dragging { id, start_index } = list.drag_state() {
        assert!(list.get_by_id(id).unwrap().is_draggable());
        assert!(start_index < list.len());
    }
}

fn run(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list: ListController<u32> = ListController::new();

    for _ in 0..STEPS {
        let before_len = list.len();
        match rng.gen_range(0..12) {
            0..=2 => {
                let item = random_item(&mut rng);
                let duplicate = list.contains(item.id());
                let at = rng.gen_bool(0.5).then(|| rng.gen_range(0..=before_len + 2));
                let result = list.insert(item, at);
                assert_eq!(result.is_err(), duplicate);
                assert_eq!(list.len(), before_len + usize::from(!duplicate));
            }
            3 => {
                let id = ItemId::new(rng.gen_range(0..64));
                let present = list.contains(id);
                assert_eq!(list.remove(id).is_ok(), present);
            }
            4 => list.set_mode(random_mode(&mut rng)),
            5 | 6 => {
                let id = ItemId::new(rng.gen_range(0..64));
                let _ = list.set_selected(id, rng.gen_bool(0.7));
            }
            7 => {
                let ids: Vec<ItemId> = (0..rng.gen_range(0..5))
                    .map(|_| ItemId::new(rng.gen_range(0..64)))
                    .collect();
                list.set_many_selected(ids, true);
            }
            8 if !list.is_empty() => {
                let id = list.get(rng.gen_range(0..before_len)).unwrap().id();
                list.move_to(id, rng.gen_range(0..before_len + 3)).unwrap();
            }
            9 if !list.is_empty() => drag_session(&mut list, &mut rng),
            10 => {
                let id = ItemId::new(rng.gen_range(0..64));
                let _ = list.replace_data(id, rng.r#gen(), None);
            }
            _ if before_len > 2 => {
                let start = rng.gen_range(0..before_len - 1);
                list.remove_range(start, 2).unwrap();
            }
            _ => {}
        }
        check_invariants(&list);
    }
}

/// Runs one drag session that either completes or is cancelled.
///
/// Items arrive and leave while the drag runs. `baseline` tracks the order
/// the list would have without the user's moves; cancelling must restore it
/// and ending must report the dragged item's place in it as the start.
fn drag_session(list: &mut ListController<u32>, rng: &mut StdRng) {
    let id = list.get(rng.gen_range(0..list.len())).unwrap().id();
    let mut baseline = list.items().ids();
    if list.begin_drag(id).is_err() {
        return;
    }

    for _ in 0..rng.gen_range(1..8) {
        match rng.gen_range(0..4) {
            0 => {
                let item = random_item(rng);
                let new_id = item.id();
                if list.contains(new_id) {
                    continue;
                }
                if rng.gen_bool(0.5) {
                    list.insert(item, Some(0)).unwrap();
                    baseline.insert(0, new_id);
                } else {
                    list.push(item).unwrap();
                    baseline.push(new_id);
                }
            }
            1 => {
                let other = list.get(rng.gen_range(0..list.len())).unwrap().id();
                if other == id {
                    continue;
                }
                list.remove(other).unwrap();
                baseline.retain(|kept| *kept != other);
            }
            _ => {
                let from = list.index_of(id).unwrap();
                let to = rng.gen_range(0..list.len());
                let _ = list.report_move(from, to);
            }
        }
        assert!(matches!(list.drag_state(), DragState::Dragging { id: dragged, .. } if dragged == id));
        check_invariants(list);
    }

    if rng.gen_bool(0.5) {
        list.cancel_drag().unwrap();
        assert_eq!(list.items().ids(), baseline);
    } else {
        let moved = Rc::new(RefCell::new(Vec::new()));
        let sink = moved.clone();
        let connection = list
            .events()
            .on_moved(move |from, to| sink.borrow_mut().push((from, to)));

        let (from, to) = list.end_drag().unwrap();
        assert_eq!(Some(from), baseline.iter().position(|other| *other == id));
        assert_eq!(to, list.index_of(id).unwrap());
        let expected = if from == to { vec![] } else { vec![(from, to)] };
        assert_eq!(*moved.borrow(), expected);

        list.events().moved.disconnect(connection);
    }
}

#[test]
fn test_random_operations_preserve_invariants() {
    for seed in 0..16 {
        run(seed);
    }
}

#[test]
fn test_random_replace_items_preserves_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut list: ListController<u32> =
        ListController::with_config(ControllerConfig::new().with_selection_mode(SelectionMode::MultiSelection));

    for _ in 0..50 {
        let mut next = Vec::new();
        let mut seen = HashSet::new();
        for _ in 0..rng.gen_range(0..20) {
            let item = random_item(&mut rng);
            if seen.insert(item.id()) {
                next.push(item);
            }
        }
        let expected: Vec<ItemId> = next.iter().map(Item::id).collect();

        for id in list.items().ids() {
            if rng.gen_bool(0.3) {
                let _ = list.set_selected(id, true);
            }
        }

        list.replace_items(next, |_, _, _| None).unwrap();
        assert_eq!(list.items().ids(), expected);
        check_invariants(&list);
    }
}
