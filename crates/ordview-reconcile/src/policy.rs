//! Policy selection and reconciliation outcomes.

use std::fmt;
use std::str::FromStr;

use ordview_core::ItemId;
use serde::{Deserialize, Serialize};

use crate::movement::{NoopReason, detect_move, move_within_view};
use crate::placement::Placement;
use crate::shift::shift_move;
use crate::swap::{locate, swap_move};

/// Rule for translating a filtered-view edit into a full-order mutation.
///
/// Chosen per screen by the calling context; the engine implements both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcilePolicy {
    /// Transpose dragged and target; nothing else moves.
    #[default]
    Swap,
    /// Reinsert dragged before target; items in between shift by one.
    ShiftInsert,
}

impl ReconcilePolicy {
    pub const ALL: [ReconcilePolicy; 2] = [Self::Swap, Self::ShiftInsert];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::ShiftInsert => "shift_insert",
        }
    }
}

impl fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a policy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown reconcile policy {:?} (expected swap or shift)", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for ReconcilePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "swap" => Ok(Self::Swap),
            "shift" | "shift-insert" | "shift_insert" | "insert" => Ok(Self::ShiftInsert),
            other => Err(UnknownPolicy(other.to_owned())),
        }
    }
}

/// How a drop is turned into a full-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "policy", rename_all = "snake_case")]
pub enum DropMode {
    /// Unfiltered view: the view is the full order, reorder it directly.
    Direct,
    /// Filtered view: reconcile the view edit with a policy.
    Reconcile(ReconcilePolicy),
}

/// Which rule produced an applied change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    Direct,
    Swap,
    ShiftInsert,
}

impl From<ReconcilePolicy> for MoveKind {
    fn from(policy: ReconcilePolicy) -> Self {
        match policy {
            ReconcilePolicy::Swap => Self::Swap,
            ReconcilePolicy::ShiftInsert => Self::ShiftInsert,
        }
    }
}

/// Classification of a reconciliation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ReconcileChange {
    Applied {
        kind: MoveKind,
        dragged: ItemId,
        target: ItemId,
        /// 1-based rank of the dragged item before the change.
        from_rank: usize,
        /// 1-based rank of the dragged item after the change.
        to_rank: usize,
    },
    Unchanged {
        reason: NoopReason,
    },
}

/// New full order plus what happened to produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub order: Vec<ItemId>,
    pub change: ReconcileChange,
}

impl ReconcileOutcome {
    fn unchanged(full_order: &[ItemId], reason: NoopReason) -> Self {
        if reason.is_desync() {
            tracing::warn!(
                target: "ordview.reconcile",
                reason = %reason,
                full_len = full_order.len(),
                "reconciliation skipped: view and full order out of sync"
            );
        } else {
            tracing::debug!(target: "ordview.reconcile", reason = %reason, "reconciliation no-op");
        }
        Self {
            order: full_order.to_vec(),
            change: ReconcileChange::Unchanged { reason },
        }
    }

    fn applied(kind: MoveKind, dragged: ItemId, target: ItemId, placement: Placement) -> Self {
        tracing::debug!(
            target: "ordview.reconcile",
            kind = ?kind,
            dragged = %dragged,
            target_item = %target,
            from_rank = placement.from_position + 1,
            to_rank = placement.to_position + 1,
            "reconciliation applied"
        );
        Self {
            order: placement.order,
            change: ReconcileChange::Applied {
                kind,
                dragged,
                target,
                from_rank: placement.from_position + 1,
                to_rank: placement.to_position + 1,
            },
        }
    }

    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self.change, ReconcileChange::Applied { .. })
    }

    #[must_use]
    pub fn noop_reason(&self) -> Option<&NoopReason> {
        match &self.change {
            ReconcileChange::Unchanged { reason } => Some(reason),
            ReconcileChange::Applied { .. } => None,
        }
    }

    #[must_use]
    pub fn into_order(self) -> Vec<ItemId> {
        self.order
    }
}

/// Reconcile a filtered-view edit onto the full order with `policy`.
///
/// Shape mismatches, unchanged views, and ids missing from the full order
/// yield the full order unchanged with an [`ReconcileChange::Unchanged`]
/// reason; nothing here fails.
#[must_use]
pub fn reconcile(
    policy: ReconcilePolicy,
    full_order: &[ItemId],
    old_view: &[ItemId],
    new_view: &[ItemId],
) -> ReconcileOutcome {
    let _span = tracing::debug_span!(
        "ordview.reconcile",
        policy = %policy,
        full_len = full_order.len(),
        view_len = old_view.len(),
    )
    .entered();

    let mv = match detect_move(old_view, new_view) {
        Ok(mv) => mv,
        Err(reason) => return ReconcileOutcome::unchanged(full_order, reason),
    };
    let placed = match policy {
        ReconcilePolicy::Swap => swap_move(full_order, &mv),
        ReconcilePolicy::ShiftInsert => shift_move(full_order, &mv),
    };
    match placed {
        Ok(placement) => ReconcileOutcome::applied(policy.into(), mv.dragged, mv.target, placement),
        Err(reason) => ReconcileOutcome::unchanged(full_order, reason),
    }
}

/// Turn a drop of `dragged` onto `target` in `view` into a new full order.
///
/// With [`DropMode::Direct`] the full order itself is reordered the way the
/// view would be; both policies agree there. With [`DropMode::Reconcile`] the
/// view edit is derived with [`move_within_view`] and reconciled.
#[must_use]
pub fn apply_drop(
    mode: DropMode,
    full_order: &[ItemId],
    view: &[ItemId],
    dragged: &ItemId,
    target: &ItemId,
) -> ReconcileOutcome {
    match mode {
        DropMode::Direct => match direct_move(full_order, dragged, target) {
            Ok(placement) => {
                ReconcileOutcome::applied(MoveKind::Direct, dragged.clone(), target.clone(), placement)
            }
            Err(reason) => ReconcileOutcome::unchanged(full_order, reason),
        },
        DropMode::Reconcile(policy) => match move_within_view(view, dragged, target) {
            Ok(new_view) => reconcile(policy, full_order, view, &new_view),
            Err(reason) => ReconcileOutcome::unchanged(full_order, reason),
        },
    }
}

fn direct_move(
    full_order: &[ItemId],
    dragged: &ItemId,
    target: &ItemId,
) -> Result<Placement, NoopReason> {
    let order = move_within_view(full_order, dragged, target)?;
    let from_position = locate(full_order, dragged)?;
    let to_position = locate(&order, dragged)?;
    Ok(Placement {
        order,
        from_position,
        to_position,
    })
}
