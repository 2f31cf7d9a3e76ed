#![forbid(unsafe_code)]

//! Drag interaction for ordview.
//!
//! [`DragMachine`] is the explicit lifecycle of one drag-to-reorder gesture,
//! including the confirmation gate for drops made under an active filter.
//! [`ReorderSession`] drives the machine against an
//! [`OrderStore`](ordview_store::OrderStore): it reconciles accepted drops
//! with the screen's [`ReconcilePolicy`](ordview_reconcile::ReconcilePolicy)
//! and persists them.
//!
//! # Invariants
//! - At most one drop is in flight; a new drag during a commit is ignored.
//! - A filtered drop saves nothing until `confirm()`; `cancel()` never saves.
//! - Ending the drag gesture does not dismiss a pending confirmation.

pub mod config;
pub mod machine;
pub mod session;

pub use config::{ConfigError, ScreenConfig};
pub use machine::{
    DragCancelReason, DragEffect, DragEvent, DragMachine, DragMachineError, DragNoopReason,
    DragState, DragTransition,
};
pub use session::{CommitError, CommitReport, ReorderSession, SessionStep};
