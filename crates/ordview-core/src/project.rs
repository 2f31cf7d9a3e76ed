//! Filtered view projection.

use crate::catalog::AttributeCatalog;
use crate::filter::FilterPredicate;
use crate::id::ItemId;
use crate::order::FullOrder;

/// Ordered subsequence of `full_order` whose items satisfy `predicate`.
///
/// Relative order is preserved. The empty predicate returns `full_order`
/// unchanged without consulting the catalog. An id the catalog does not know
/// is treated as filtered out.
///
/// ```
/// use std::collections::HashMap;
/// use ordview_core::{project, Attributes, FilterPredicate, ItemId};
///
/// let full: Vec<ItemId> = ["q1", "q2", "q3"].into_iter().map(ItemId::from).collect();
/// let mut catalog = HashMap::new();
/// catalog.insert(ItemId::new("q1"), Attributes::new("Due Diligence", "XY"));
/// catalog.insert(ItemId::new("q2"), Attributes::new("Due Diligence", "PQR"));
/// catalog.insert(ItemId::new("q3"), Attributes::new("Due Diligence", "XY"));
///
/// let view = project(&full, &catalog, &FilterPredicate::ANY.with_participant("XY"));
/// assert_eq!(view, vec![ItemId::new("q1"), ItemId::new("q3")]);
/// ```
#[must_use]
pub fn project<C>(full_order: &[ItemId], catalog: &C, predicate: &FilterPredicate) -> Vec<ItemId>
where
    C: AttributeCatalog + ?Sized,
{
    if predicate.is_empty() {
        return full_order.to_vec();
    }
    full_order
        .iter()
        .filter(|id| {
            catalog
                .attributes(id)
                .is_some_and(|attributes| predicate.matches(attributes))
        })
        .cloned()
        .collect()
}

/// [`project`] over a validated [`FullOrder`].
#[must_use]
pub fn project_order<C>(order: &FullOrder, catalog: &C, predicate: &FilterPredicate) -> Vec<ItemId>
where
    C: AttributeCatalog + ?Sized,
{
    project(order.as_slice(), catalog, predicate)
}
