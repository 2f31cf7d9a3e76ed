#![forbid(unsafe_code)]

//! Reconciliation of filtered-view reorders onto a full order.
//!
//! A user reorders a *filtered view* (a projection of the section's full
//! order). The engine turns the old/new view pair into a new full order:
//!
//! 1. [`detect_move`] picks the dragged item (largest index change, ties to
//!    the first in the new view) and the target (the item that held the
//!    dragged item's new slot).
//! 2. A [`ReconcilePolicy`] applies the move:
//!    - [`ReconcilePolicy::Swap`] transposes dragged and target.
//!    - [`ReconcilePolicy::ShiftInsert`] reinserts dragged before target,
//!      shifting everything in between (hidden items too) by one slot.
//!
//! Every function is pure. Malformed input is never an error: it produces
//! the full order unchanged, with a [`NoopReason`] when called through
//! [`reconcile`].
//!
//! # Invariants
//! - The output is always a permutation of the input full order.
//! - Swap changes at most two positions.
//! - Shift-insert changes only the positions between the two slots.

mod movement;
mod placement;
mod policy;
mod shift;
mod swap;

pub use movement::{FilteredMove, NoopReason, detect_move, move_within_view};
pub use policy::{
    DropMode, MoveKind, ReconcileChange, ReconcileOutcome, ReconcilePolicy, UnknownPolicy,
    apply_drop, reconcile,
};
pub use shift::apply_shift;
pub use swap::apply_swap;
