//! Drag lifecycle machine.
//!
//! ```text
//! Idle -> Dragging <-> HoveringTarget
//!            |              |
//!            +---- drop ----+--> AwaitingConfirmation --confirm--> Committing -> Idle
//!            |              |                                        ^
//!            +-- drop (unfiltered) ---------------------------------+
//! ```
//!
//! Every [`DragMachine::apply_event`] call returns a [`DragTransition`], also
//! for ignored events, whose effect then carries a [`DragNoopReason`]. The
//! machine only decides; reconciling and saving belong to the caller, which
//! reports back with [`DragEvent::CommitFinished`].

use std::fmt;

use ordview_core::{ItemId, SectionId};
use serde::{Deserialize, Serialize};

/// Drag lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        item: ItemId,
        section: SectionId,
    },
    HoveringTarget {
        item: ItemId,
        section: SectionId,
        candidate: ItemId,
    },
    /// A drop under an active filter, waiting for an explicit decision.
    AwaitingConfirmation {
        item: ItemId,
        section: SectionId,
        target: ItemId,
    },
    /// The drop was accepted; the save has not resolved yet.
    Committing {
        item: ItemId,
        section: SectionId,
        target: ItemId,
    },
}

impl DragState {
    /// Item being dragged or pending, if any.
    #[must_use]
    pub fn item(&self) -> Option<&ItemId> {
        match self {
            Self::Idle => None,
            Self::Dragging { item, .. }
            | Self::HoveringTarget { item, .. }
            | Self::AwaitingConfirmation { item, .. }
            | Self::Committing { item, .. } => Some(item),
        }
    }

    #[must_use]
    pub fn section(&self) -> Option<&SectionId> {
        match self {
            Self::Idle => None,
            Self::Dragging { section, .. }
            | Self::HoveringTarget { section, .. }
            | Self::AwaitingConfirmation { section, .. }
            | Self::Committing { section, .. } => Some(section),
        }
    }

    /// Item currently highlighted as a drop candidate.
    #[must_use]
    pub fn highlighted(&self) -> Option<&ItemId> {
        match self {
            Self::HoveringTarget { candidate, .. } => Some(candidate),
            _ => None,
        }
    }
}

/// Input to the machine, raised by the UI surface or the committing caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DragEvent {
    DragStart {
        item: ItemId,
        section: SectionId,
    },
    DragOver {
        candidate: ItemId,
        section: SectionId,
    },
    DragLeave,
    Drop {
        target: ItemId,
        section: SectionId,
        /// Whether a non-empty filter predicate is active.
        filtered: bool,
    },
    Confirm,
    Cancel,
    DragEnd,
    CommitFinished {
        succeeded: bool,
    },
}

impl DragEvent {
    fn validate(&self) -> Result<(), DragMachineError> {
        let (item, section) = match self {
            Self::DragStart { item, section } => (Some(item), Some(section)),
            Self::DragOver { candidate, section } => (Some(candidate), Some(section)),
            Self::Drop {
                target, section, ..
            } => (Some(target), Some(section)),
            _ => (None, None),
        };
        if item.is_some_and(|id| id.as_str().is_empty()) {
            return Err(DragMachineError::EmptyItemId);
        }
        if section.is_some_and(|id| id.as_str().is_empty()) {
            return Err(DragMachineError::EmptySectionId);
        }
        Ok(())
    }
}

/// Why a drag ended without a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragCancelReason {
    /// Explicit `cancel()`, including declining the confirmation.
    UserCanceled,
    /// Dropped onto an item of another section.
    CrossSectionDrop,
    /// Dropped onto itself.
    SelfDrop,
    /// The gesture ended without a drop.
    GestureEnded,
    /// [`DragMachine::force_cancel`].
    Programmatic,
}

/// Explicit diagnostics for events that are safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
    CrossSectionHover,
    HoverOnSelf,
    NoActiveHover,
    NothingToConfirm,
    /// The confirmation dialog outlives the drag gesture.
    ConfirmationPending,
    /// One drop at a time: the previous save has not resolved.
    CommitInFlight,
    NoCommitInFlight,
}

/// Effect emitted by one lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Started {
        item: ItemId,
        section: SectionId,
    },
    Hovered {
        item: ItemId,
        candidate: ItemId,
    },
    HoverCleared {
        item: ItemId,
    },
    ConfirmationRequested {
        item: ItemId,
        section: SectionId,
        target: ItemId,
    },
    /// The caller should reconcile and save now.
    CommitRequested {
        item: ItemId,
        section: SectionId,
        target: ItemId,
        confirmed: bool,
    },
    CommitSettled {
        item: ItemId,
        section: SectionId,
        target: ItemId,
        succeeded: bool,
    },
    Canceled {
        item: Option<ItemId>,
        reason: DragCancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One machine step with a monotonically increasing id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

impl DragTransition {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        matches!(self.effect, DragEffect::Noop { .. })
    }

    /// `(item, section, target)` when this step asks for a commit.
    #[must_use]
    pub fn commit_request(&self) -> Option<(&ItemId, &SectionId, &ItemId)> {
        match &self.effect {
            DragEffect::CommitRequested {
                item,
                section,
                target,
                ..
            } => Some((item, section, target)),
            _ => None,
        }
    }
}

/// Lifecycle machine for drag-to-reorder within one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragMachine {
    state: DragState,
    confirm_when_filtered: bool,
    transition_counter: u64,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DragMachine {
    /// `confirm_when_filtered` routes filtered drops through
    /// [`DragState::AwaitingConfirmation`]. Unfiltered drops always commit
    /// directly.
    #[must_use]
    pub const fn new(confirm_when_filtered: bool) -> Self {
        Self {
            state: DragState::Idle,
            confirm_when_filtered,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn confirm_when_filtered(&self) -> bool {
        self.confirm_when_filtered
    }

    /// Whether the machine is anywhere but Idle.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    #[must_use]
    pub const fn is_committing(&self) -> bool {
        matches!(self.state, DragState::Committing { .. })
    }

    #[must_use]
    pub const fn awaiting_confirmation(&self) -> bool {
        matches!(self.state, DragState::AwaitingConfirmation { .. })
    }

    /// Reset to Idle from any state except Committing.
    ///
    /// Returns `None` when Idle, and when a save is in flight: that state is
    /// only left through [`DragEvent::CommitFinished`].
    pub fn force_cancel(&mut self) -> Option<DragTransition> {
        match &self.state {
            DragState::Idle | DragState::Committing { .. } => None,
            active => {
                let item = active.item().cloned();
                let from = std::mem::take(&mut self.state);
                Some(self.record(
                    from,
                    DragEffect::Canceled {
                        item,
                        reason: DragCancelReason::Programmatic,
                    },
                ))
            }
        }
    }

    /// Apply one event and return the resulting transition.
    pub fn apply_event(&mut self, event: &DragEvent) -> Result<DragTransition, DragMachineError> {
        event.validate()?;

        let from = self.state.clone();
        let (to, effect) = match (&from, event) {
            (DragState::Idle, DragEvent::DragStart { item, section }) => (
                DragState::Dragging {
                    item: item.clone(),
                    section: section.clone(),
                },
                DragEffect::Started {
                    item: item.clone(),
                    section: section.clone(),
                },
            ),
            (DragState::Idle, _) => noop(&from, DragNoopReason::IdleWithoutActiveDrag),

            (
                DragState::Dragging { item, section }
                | DragState::HoveringTarget { item, section, .. },
                DragEvent::DragOver {
                    candidate,
                    section: over_section,
                },
            ) => {
                if over_section != section {
                    noop(&from, DragNoopReason::CrossSectionHover)
                } else if candidate == item {
                    noop(&from, DragNoopReason::HoverOnSelf)
                } else {
                    (
                        DragState::HoveringTarget {
                            item: item.clone(),
                            section: section.clone(),
                            candidate: candidate.clone(),
                        },
                        DragEffect::Hovered {
                            item: item.clone(),
                            candidate: candidate.clone(),
                        },
                    )
                }
            }
            (DragState::HoveringTarget { item, section, .. }, DragEvent::DragLeave) => (
                DragState::Dragging {
                    item: item.clone(),
                    section: section.clone(),
                },
                DragEffect::HoverCleared { item: item.clone() },
            ),
            (DragState::Dragging { .. }, DragEvent::DragLeave) => {
                noop(&from, DragNoopReason::NoActiveHover)
            }
            (
                DragState::Dragging { item, section }
                | DragState::HoveringTarget { item, section, .. },
                DragEvent::Drop {
                    target,
                    section: drop_section,
                    filtered,
                },
            ) => {
                if drop_section != section {
                    cancel(item, DragCancelReason::CrossSectionDrop)
                } else if target == item {
                    cancel(item, DragCancelReason::SelfDrop)
                } else if *filtered && self.confirm_when_filtered {
                    (
                        DragState::AwaitingConfirmation {
                            item: item.clone(),
                            section: section.clone(),
                            target: target.clone(),
                        },
                        DragEffect::ConfirmationRequested {
                            item: item.clone(),
                            section: section.clone(),
                            target: target.clone(),
                        },
                    )
                } else {
                    commit(item, section, target, false)
                }
            }
            (
                DragState::Dragging { item, .. } | DragState::HoveringTarget { item, .. },
                DragEvent::Cancel | DragEvent::DragEnd,
            ) => {
                let reason = if matches!(event, DragEvent::Cancel) {
                    DragCancelReason::UserCanceled
                } else {
                    DragCancelReason::GestureEnded
                };
                cancel(item, reason)
            }
            (DragState::Dragging { .. } | DragState::HoveringTarget { .. }, DragEvent::Confirm) => {
                noop(&from, DragNoopReason::NothingToConfirm)
            }
            (
                DragState::Dragging { .. } | DragState::HoveringTarget { .. },
                DragEvent::DragStart { .. },
            ) => noop(&from, DragNoopReason::DragAlreadyInProgress),
            (
                DragState::Dragging { .. } | DragState::HoveringTarget { .. },
                DragEvent::CommitFinished { .. },
            ) => noop(&from, DragNoopReason::NoCommitInFlight),

            (
                DragState::AwaitingConfirmation {
                    item,
                    section,
                    target,
                },
                DragEvent::Confirm,
            ) => commit(item, section, target, true),
            (DragState::AwaitingConfirmation { item, .. }, DragEvent::Cancel) => {
                cancel(item, DragCancelReason::UserCanceled)
            }
            (DragState::AwaitingConfirmation { .. }, DragEvent::CommitFinished { .. }) => {
                noop(&from, DragNoopReason::NoCommitInFlight)
            }
            (DragState::AwaitingConfirmation { .. }, _) => {
                noop(&from, DragNoopReason::ConfirmationPending)
            }

            (
                DragState::Committing {
                    item,
                    section,
                    target,
                },
                DragEvent::CommitFinished { succeeded },
            ) => (
                DragState::Idle,
                DragEffect::CommitSettled {
                    item: item.clone(),
                    section: section.clone(),
                    target: target.clone(),
                    succeeded: *succeeded,
                },
            ),
            (DragState::Committing { .. }, _) => noop(&from, DragNoopReason::CommitInFlight),
        };

        self.state = to;
        let transition = self.record(from, effect);
        tracing::debug!(
            target: "ordview.drag",
            transition_id = transition.transition_id,
            effect = ?transition.effect,
            "drag transition"
        );
        Ok(transition)
    }

    fn record(&mut self, from: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.clone(),
            effect,
        }
    }
}

fn noop(state: &DragState, reason: DragNoopReason) -> (DragState, DragEffect) {
    (state.clone(), DragEffect::Noop { reason })
}

fn cancel(item: &ItemId, reason: DragCancelReason) -> (DragState, DragEffect) {
    (
        DragState::Idle,
        DragEffect::Canceled {
            item: Some(item.clone()),
            reason,
        },
    )
}

fn commit(
    item: &ItemId,
    section: &SectionId,
    target: &ItemId,
    confirmed: bool,
) -> (DragState, DragEffect) {
    (
        DragState::Committing {
            item: item.clone(),
            section: section.clone(),
            target: target.clone(),
        },
        DragEffect::CommitRequested {
            item: item.clone(),
            section: section.clone(),
            target: target.clone(),
            confirmed,
        },
    )
}

/// Rejected drag events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMachineError {
    EmptyItemId,
    EmptySectionId,
}

impl fmt::Display for DragMachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyItemId => f.write_str("drag event carries an empty item id"),
            Self::EmptySectionId => f.write_str("drag event carries an empty section id"),
        }
    }
}

impl std::error::Error for DragMachineError {}
