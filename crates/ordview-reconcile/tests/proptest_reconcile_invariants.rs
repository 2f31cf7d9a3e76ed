#![forbid(unsafe_code)]

//! Property tests for filtered-view reconciliation.
//!
//! Validates:
//! - Both policies always return a permutation of the full order.
//! - Swap only touches the slots of the dragged and target items.
//! - Shift-insert only touches slots between the old and new location, and
//!   every other item keeps its relative order.
//! - Shift-insert keeps the visible projection equal to the edited view for
//!   front-ward and adjacent drags; a drag toward the back lands before its
//!   target.
//! - Applying the same swap twice restores the full order.
//! - Mismatched or unchanged views leave the full order untouched.

use std::collections::HashSet;

use ordview_core::{FullOrder, ItemId};
use ordview_reconcile::{
    ReconcilePolicy, apply_shift, apply_swap, detect_move, move_within_view, reconcile,
};
use proptest::prelude::*;

// ============================================================================
// Strategy helpers
// ============================================================================

/// A drop inside a filtered view of a shuffled full order.
#[derive(Debug, Clone)]
struct Drop {
    full: Vec<ItemId>,
    view: Vec<ItemId>,
    from: usize,
    to: usize,
}

impl Drop {
    fn dragged(&self) -> &ItemId {
        &self.view[self.from]
    }

    fn target(&self) -> &ItemId {
        &self.view[self.to]
    }

    fn new_view(&self) -> Vec<ItemId> {
        move_within_view(&self.view, self.dragged(), self.target()).expect("valid drop")
    }
}

fn drop_strategy() -> impl Strategy<Value = Drop> {
    (2usize..40)
        .prop_flat_map(|n| {
            let ids: Vec<ItemId> = (0..n).map(|i| ItemId::new(format!("q{i}"))).collect();
            (
                Just(ids).prop_shuffle(),
                prop::collection::vec(any::<bool>(), n),
                any::<prop::sample::Index>(),
                any::<prop::sample::Index>(),
            )
        })
        .prop_filter_map("view needs two distinct items", |(full, mask, a, b)| {
            let view: Vec<ItemId> = full
                .iter()
                .zip(&mask)
                .filter(|(_, visible)| **visible)
                .map(|(id, _)| id.clone())
                .collect();
            if view.len() < 2 {
                return None;
            }
            let from = a.index(view.len());
            let to = b.index(view.len());
            (from != to).then_some(Drop {
                full,
                view,
                from,
                to,
            })
        })
}

fn policy_strategy() -> impl Strategy<Value = ReconcilePolicy> {
    prop::sample::select(ReconcilePolicy::ALL.to_vec())
}

fn visible_projection(order: &[ItemId], view: &[ItemId]) -> Vec<ItemId> {
    let visible: HashSet<&ItemId> = view.iter().collect();
    order.iter().filter(|id| visible.contains(id)).cloned().collect()
}

fn position(order: &[ItemId], id: &ItemId) -> usize {
    order.iter().position(|candidate| candidate == id).expect("id in order")
}

// ============================================================================
// Permutation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn output_is_a_permutation(drop in drop_strategy(), policy in policy_strategy()) {
        let outcome = reconcile(policy, &drop.full, &drop.view, &drop.new_view());
        prop_assert!(outcome.is_applied());
        let order = FullOrder::new(drop.full.clone()).expect("unique ids");
        prop_assert!(order.is_permutation_of(&outcome.order));
    }
}

// ============================================================================
// Non-disturbance
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn swap_touches_only_dragged_and_target(drop in drop_strategy()) {
        let new_view = drop.new_view();
        let mv = detect_move(&drop.view, &new_view).expect("move detected");
        let next = apply_swap(&drop.full, &drop.view, &new_view);
        let changed: Vec<usize> = (0..next.len()).filter(|&i| next[i] != drop.full[i]).collect();
        prop_assert_eq!(changed.len(), 2);
        for i in changed {
            prop_assert!(next[i] == mv.dragged || next[i] == mv.target);
        }
    }

    #[test]
    fn shift_touches_only_the_span_between_slots(drop in drop_strategy()) {
        let new_view = drop.new_view();
        let mv = detect_move(&drop.view, &new_view).expect("move detected");
        let next = apply_shift(&drop.full, &drop.view, &new_view);

        let before = position(&drop.full, &mv.dragged);
        let after = position(&next, &mv.dragged);
        let (lo, hi) = (before.min(after), before.max(after));
        for i in (0..next.len()).filter(|i| *i < lo || *i > hi) {
            prop_assert_eq!(&next[i], &drop.full[i]);
        }

        let others_before: Vec<&ItemId> = drop.full.iter().filter(|id| **id != mv.dragged).collect();
        let others_after: Vec<&ItemId> = next.iter().filter(|id| **id != mv.dragged).collect();
        prop_assert_eq!(others_before, others_after);
    }
}

// ============================================================================
// Filter consistency
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn shift_projection_matches_edited_view(drop in drop_strategy()) {
        // Drops toward the back land after the target in the view but before
        // it in the full order, so only front-ward and adjacent drops agree.
        prop_assume!(drop.to < drop.from || drop.from + 1 == drop.to);
        let new_view = drop.new_view();
        let next = apply_shift(&drop.full, &drop.view, &new_view);
        prop_assert_eq!(visible_projection(&next, &drop.view), new_view);
    }
}

/// Insert-before a target that sits later in the view leaves the dragged
/// item one slot short of where the view edit put it.
#[test]
fn shift_toward_the_back_lands_before_the_target() {
    let ids = |raw: &[&str]| raw.iter().copied().map(ItemId::from).collect::<Vec<_>>();
    let full = ids(&["a", "h1", "b", "h2", "c"]);
    let view = ids(&["a", "b", "c"]);
    let edited = move_within_view(&view, &ItemId::new("a"), &ItemId::new("c")).expect("drop");
    assert_eq!(edited, ids(&["b", "c", "a"]));

    let next = apply_shift(&full, &view, &edited);
    assert_eq!(next, ids(&["h1", "b", "h2", "a", "c"]));
    assert_eq!(visible_projection(&next, &view), ids(&["b", "a", "c"]));
}

// ============================================================================
// Swap involution and guards
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn swap_twice_restores(drop in drop_strategy()) {
        let new_view = drop.new_view();
        let once = apply_swap(&drop.full, &drop.view, &new_view);
        let twice = apply_swap(&once, &drop.view, &new_view);
        prop_assert_eq!(twice, drop.full);
    }

    #[test]
    fn mismatched_views_are_noops(drop in drop_strategy(), policy in policy_strategy()) {
        let mut longer = drop.new_view();
        longer.push(ItemId::new("extra"));
        let outcome = reconcile(policy, &drop.full, &drop.view, &longer);
        prop_assert_eq!(&outcome.order, &drop.full);
        prop_assert!(!outcome.is_applied());

        let same = reconcile(policy, &drop.full, &drop.view, &drop.view);
        prop_assert_eq!(&same.order, &drop.full);
        prop_assert!(!same.is_applied());
    }
}
