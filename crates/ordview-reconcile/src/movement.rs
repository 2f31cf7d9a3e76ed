//! Dragged/target identification shared by every policy.

use std::fmt;

use ordview_core::ItemId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Why a reconciliation left the full order untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoopReason {
    /// Old and new views differ in length (filter or data changed mid-drag).
    LengthMismatch { old: usize, new: usize },
    /// The view being reordered is empty.
    EmptyView,
    /// Old and new views are identical.
    NothingMoved,
    /// The new view holds an id the old view does not.
    ForeignItem { id: ItemId },
    /// The dragged or target item is not in the full order.
    MissingInFullOrder { id: ItemId },
    /// A dropped item is not in the view it was dropped on.
    MissingInView { id: ItemId },
    /// The item was dropped onto itself.
    SelfDrop,
}

impl NoopReason {
    /// Whether this no-op points at caller/store desynchronization rather
    /// than an ordinary empty gesture.
    #[must_use]
    pub const fn is_desync(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. }
                | Self::ForeignItem { .. }
                | Self::MissingInFullOrder { .. }
                | Self::MissingInView { .. }
        )
    }
}

impl fmt::Display for NoopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { old, new } => {
                write!(f, "view length changed during drag ({old} -> {new})")
            }
            Self::EmptyView => f.write_str("view is empty"),
            Self::NothingMoved => f.write_str("no item moved"),
            Self::ForeignItem { id } => write!(f, "item {id} is not part of the original view"),
            Self::MissingInFullOrder { id } => write!(f, "item {id} is not in the full order"),
            Self::MissingInView { id } => write!(f, "item {id} is not in the view"),
            Self::SelfDrop => f.write_str("item dropped onto itself"),
        }
    }
}

/// The single move a filtered-view edit is interpreted as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredMove {
    /// Item with the largest index change between the two views.
    pub dragged: ItemId,
    /// Item that occupied the dragged item's new slot in the old view.
    pub target: ItemId,
    /// Dragged item's index in the old view.
    pub from_index: usize,
    /// Dragged item's index in the new view.
    pub to_index: usize,
}

impl FilteredMove {
    #[must_use]
    pub const fn distance(&self) -> usize {
        self.from_index.abs_diff(self.to_index)
    }

    /// Whether the dragged item moved toward the front of the view.
    #[must_use]
    pub const fn is_toward_front(&self) -> bool {
        self.to_index < self.from_index
    }
}

/// Identify the dragged and target items of a view edit.
///
/// The dragged item is the one whose index changed the most. Ties go to the
/// first such item in `new_view` order.
pub fn detect_move(old_view: &[ItemId], new_view: &[ItemId]) -> Result<FilteredMove, NoopReason> {
    if old_view.len() != new_view.len() {
        return Err(NoopReason::LengthMismatch {
            old: old_view.len(),
            new: new_view.len(),
        });
    }
    if old_view.is_empty() {
        return Err(NoopReason::EmptyView);
    }

    let mut old_index: FxHashMap<&ItemId, usize> = FxHashMap::default();
    old_index.reserve(old_view.len());
    for (index, id) in old_view.iter().enumerate() {
        old_index.entry(id).or_insert(index);
    }

    let mut best: Option<(usize, usize, usize)> = None;
    for (new_index, id) in new_view.iter().enumerate() {
        let Some(&old_pos) = old_index.get(id) else {
            return Err(NoopReason::ForeignItem { id: id.clone() });
        };
        let movement = new_index.abs_diff(old_pos);
        let best_movement = best.map_or(0, |(movement, _, _)| movement);
        if movement > best_movement {
            best = Some((movement, old_pos, new_index));
        }
    }

    let (_, from_index, to_index) = best.ok_or(NoopReason::NothingMoved)?;
    Ok(FilteredMove {
        dragged: new_view[to_index].clone(),
        target: old_view[to_index].clone(),
        from_index,
        to_index,
    })
}

/// Apply a drop of `dragged` onto `target` within a view.
///
/// The dragged item is removed and reinserted at the index the target held
/// before the removal, so a downward drop lands after the target and an
/// upward drop lands before it.
pub fn move_within_view(
    view: &[ItemId],
    dragged: &ItemId,
    target: &ItemId,
) -> Result<Vec<ItemId>, NoopReason> {
    if dragged == target {
        return Err(NoopReason::SelfDrop);
    }
    let from = view
        .iter()
        .position(|id| id == dragged)
        .ok_or_else(|| NoopReason::MissingInView {
            id: dragged.clone(),
        })?;
    let to = view
        .iter()
        .position(|id| id == target)
        .ok_or_else(|| NoopReason::MissingInView { id: target.clone() })?;

    let mut next = view.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    Ok(next)
}
