#![forbid(unsafe_code)]

//! Property tests for filtered-view projection.
//!
//! Validates:
//! - The view is a subsequence of the full order (relative order preserved).
//! - Every item in the view satisfies the predicate; every omitted item with
//!   known attributes does not.
//! - The empty predicate is the identity.

use std::collections::HashMap;

use ordview_core::{Attributes, FilterPredicate, FullOrder, ItemId, project};
use proptest::prelude::*;

// ============================================================================
// Strategy helpers
// ============================================================================

const REVIEWS: [&str; 2] = ["Due Diligence", "Periodic Review"];
const PARTICIPANTS: [&str; 2] = ["XY", "PQR"];

fn attributes_strategy() -> impl Strategy<Value = Attributes> {
    (0usize..2, 0usize..2).prop_map(|(r, p)| Attributes::new(REVIEWS[r], PARTICIPANTS[p]))
}

fn predicate_strategy() -> impl Strategy<Value = FilterPredicate> {
    (
        prop::option::of(0usize..2),
        prop::option::of(0usize..2),
    )
        .prop_map(|(review, participant)| {
            let mut predicate = FilterPredicate::ANY;
            if let Some(r) = review {
                predicate = predicate.with_review(REVIEWS[r]);
            }
            if let Some(p) = participant {
                predicate = predicate.with_participant(PARTICIPANTS[p]);
            }
            predicate
        })
}

fn section_strategy() -> impl Strategy<Value = (Vec<ItemId>, HashMap<ItemId, Attributes>)> {
    prop::collection::vec(attributes_strategy(), 0..40).prop_flat_map(|attrs| {
        let ids: Vec<ItemId> = (0..attrs.len()).map(|i| ItemId::new(format!("q{i}"))).collect();
        let catalog: HashMap<ItemId, Attributes> =
            ids.iter().cloned().zip(attrs.into_iter()).collect();
        (Just(ids).prop_shuffle(), Just(catalog))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn view_is_an_ordered_subsequence((full, catalog) in section_strategy(), predicate in predicate_strategy()) {
        let view = project(&full, &catalog, &predicate);
        let mut cursor = full.iter();
        for id in &view {
            prop_assert!(cursor.any(|candidate| candidate == id), "{id} out of order");
        }
    }

    #[test]
    fn membership_matches_predicate((full, catalog) in section_strategy(), predicate in predicate_strategy()) {
        let view = project(&full, &catalog, &predicate);
        for id in &full {
            let expected = predicate.matches(&catalog[id]);
            prop_assert_eq!(view.contains(id), expected);
        }
    }

    #[test]
    fn empty_predicate_is_identity((full, catalog) in section_strategy()) {
        let view = project(&full, &catalog, &FilterPredicate::ANY);
        prop_assert_eq!(&view, &full);
        let order = FullOrder::new(full).expect("generated ids are unique");
        prop_assert!(order.is_permutation_of(&view));
    }
}
