//! Swap policy: a view reorder becomes one transposition in the full order.

use ordview_core::ItemId;

use crate::movement::{FilteredMove, NoopReason, detect_move};
use crate::placement::Placement;

/// Swap the dragged and target items in `full_order`.
///
/// Every other item, visible or hidden, keeps its exact slot. Returns
/// `full_order` unchanged when the views do not describe a move or the
/// identified items are missing from the full order.
///
/// ```
/// use ordview_core::ItemId;
/// use ordview_reconcile::apply_swap;
///
/// let ids = |raw: &[u32]| raw.iter().map(|n| ItemId::new(n.to_string())).collect::<Vec<_>>();
/// let full = ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
/// let next = apply_swap(&full, &ids(&[1, 3, 4, 5]), &ids(&[5, 1, 3, 4]));
/// assert_eq!(next, ids(&[5, 2, 3, 4, 1, 6, 7, 8, 9]));
/// ```
#[must_use]
pub fn apply_swap(full_order: &[ItemId], old_view: &[ItemId], new_view: &[ItemId]) -> Vec<ItemId> {
    detect_move(old_view, new_view)
        .and_then(|mv| swap_move(full_order, &mv))
        .map_or_else(|_| full_order.to_vec(), |placement| placement.order)
}

pub(crate) fn swap_move(full_order: &[ItemId], mv: &FilteredMove) -> Result<Placement, NoopReason> {
    let dragged_pos = locate(full_order, &mv.dragged)?;
    let target_pos = locate(full_order, &mv.target)?;

    let mut order = full_order.to_vec();
    order.swap(dragged_pos, target_pos);
    Ok(Placement {
        order,
        from_position: dragged_pos,
        to_position: target_pos,
    })
}

pub(crate) fn locate(full_order: &[ItemId], id: &ItemId) -> Result<usize, NoopReason> {
    full_order
        .iter()
        .position(|candidate| candidate == id)
        .ok_or_else(|| NoopReason::MissingInFullOrder { id: id.clone() })
}
