//! Shift-insert policy: the dragged item is reinserted before the target.

use ordview_core::ItemId;

use crate::movement::{FilteredMove, NoopReason, detect_move};
use crate::placement::Placement;
use crate::swap::locate;

/// Remove the dragged item and reinsert it immediately before the target.
///
/// Items strictly between the old and new location, hidden ones included,
/// shift by exactly one slot. Returns `full_order` unchanged when the views
/// do not describe a move or the identified items are missing.
///
/// ```
/// use ordview_core::ItemId;
/// use ordview_reconcile::apply_shift;
///
/// let ids = |raw: &[u32]| raw.iter().map(|n| ItemId::new(n.to_string())).collect::<Vec<_>>();
/// let full = ids(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
/// let next = apply_shift(&full, &ids(&[4, 7, 8]), &ids(&[8, 4, 7]));
/// assert_eq!(next, ids(&[1, 2, 3, 8, 4, 5, 6, 7, 9]));
/// ```
#[must_use]
pub fn apply_shift(full_order: &[ItemId], old_view: &[ItemId], new_view: &[ItemId]) -> Vec<ItemId> {
    detect_move(old_view, new_view)
        .and_then(|mv| shift_move(full_order, &mv))
        .map_or_else(|_| full_order.to_vec(), |placement| placement.order)
}

pub(crate) fn shift_move(full_order: &[ItemId], mv: &FilteredMove) -> Result<Placement, NoopReason> {
    let dragged_pos = locate(full_order, &mv.dragged)?;
    locate(full_order, &mv.target)?;

    let mut order = full_order.to_vec();
    let dragged = order.remove(dragged_pos);
    // Target position after removal, not before.
    let insert_at = locate(&order, &mv.target)?;
    order.insert(insert_at, dragged);
    Ok(Placement {
        order,
        from_position: dragged_pos,
        to_position: insert_at,
    })
}
