use ordview_core::ItemId;

/// A policy's result before it is wrapped into an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) order: Vec<ItemId>,
    /// Dragged item's full-order position before the move.
    pub(crate) from_position: usize,
    /// Dragged item's full-order position after the move.
    pub(crate) to_position: usize,
}
