#![no_main]

use std::collections::HashSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ordview_core::ItemId;
use ordview_reconcile::{ReconcilePolicy, reconcile};

/// A full order of up to 64 items, plus arbitrary (often malformed) views.
#[derive(Arbitrary, Debug)]
struct ReconcileInput {
    len: u8,
    /// Indices into the full order; out-of-range values become foreign ids.
    old_view: Vec<u8>,
    new_view: Vec<u8>,
    shift: bool,
}

fn id(index: u8) -> ItemId {
    ItemId::new(format!("i{index}"))
}

fuzz_target!(|input: ReconcileInput| {
    let len = input.len % 64;
    let full: Vec<ItemId> = (0..len).map(id).collect();
    let old: Vec<ItemId> = input.old_view.iter().take(96).map(|&i| id(i)).collect();
    let new: Vec<ItemId> = input.new_view.iter().take(96).map(|&i| id(i)).collect();
    let policy = if input.shift {
        ReconcilePolicy::ShiftInsert
    } else {
        ReconcilePolicy::Swap
    };

    let outcome = reconcile(policy, &full, &old, &new);

    // Output is always a permutation of the full order.
    assert_eq!(outcome.order.len(), full.len());
    let seen: HashSet<&ItemId> = outcome.order.iter().collect();
    assert_eq!(seen.len(), full.len());
    assert!(full.iter().all(|item| seen.contains(item)));

    if !outcome.is_applied() {
        assert_eq!(outcome.order, full);
    } else if policy == ReconcilePolicy::Swap {
        let changed = full
            .iter()
            .zip(&outcome.order)
            .filter(|(before, after)| before != after)
            .count();
        assert!(changed <= 2);
    }
});
