//! Reorder session: the drag machine wired to a store and a catalog.
//!
//! The session owns the active filter and the screen configuration. It
//! feeds UI events into [`DragMachine`], and when a step requests a commit it
//! reads the section's full order, projects the current view, reconciles the
//! drop, saves, and reports the settlement back to the machine before
//! returning. Only one commit runs at a time.

use ordview_core::{AttributeCatalog, FilterPredicate, FullOrder, ItemId, SectionId, project};
use ordview_reconcile::{DropMode, ReconcileChange, apply_drop};
use ordview_store::{OrderStore, Revision, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ScreenConfig;
use crate::machine::{DragEvent, DragMachine, DragMachineError, DragTransition};

/// Result of one committed drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub section: SectionId,
    pub dragged: ItemId,
    pub target: ItemId,
    pub before: Vec<ItemId>,
    pub after: Vec<ItemId>,
    pub change: ReconcileChange,
    /// Revision in effect after the commit.
    pub revision: Revision,
    /// Whether a save was issued; no-op reconciliations skip it.
    pub saved: bool,
}

/// One handled UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStep {
    pub transition: DragTransition,
    /// Present when the event led to a commit that succeeded.
    pub commit: Option<CommitReport>,
}

#[derive(Debug, Error)]
pub enum CommitError {
    #[error(transparent)]
    Machine(#[from] DragMachineError),

    #[error("failed to read section {section}: {source}")]
    Load {
        section: SectionId,
        #[source]
        source: StoreError,
    },

    #[error("failed to save section {section}: {source}")]
    Save {
        section: SectionId,
        #[source]
        source: StoreError,
    },

    #[error("no failed commit to retry")]
    NothingToRetry,

    #[error("a drag is in progress")]
    Busy,
}

impl CommitError {
    /// Whether [`ReorderSession::retry_last_commit`] can replay the failure.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Save { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingCommit {
    section: SectionId,
    dragged: ItemId,
    target: ItemId,
}

/// Drives drag-to-reorder against an [`OrderStore`].
pub struct ReorderSession<S, C> {
    store: S,
    catalog: C,
    config: ScreenConfig,
    predicate: FilterPredicate,
    machine: DragMachine,
    failed: Option<PendingCommit>,
}

impl<S: OrderStore, C: AttributeCatalog> ReorderSession<S, C> {
    pub fn new(store: S, catalog: C, config: ScreenConfig) -> Self {
        let machine = DragMachine::new(config.confirm_when_filtered);
        Self {
            store,
            catalog,
            config,
            predicate: FilterPredicate::ANY,
            machine,
            failed: None,
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    #[must_use]
    pub fn machine(&self) -> &DragMachine {
        &self.machine
    }

    #[must_use]
    pub fn predicate(&self) -> &FilterPredicate {
        &self.predicate
    }

    /// Change the active filter. Takes effect for the next drop.
    pub fn set_predicate(&mut self, predicate: FilterPredicate) {
        tracing::debug!(target: "ordview.session", predicate = %predicate, "filter changed");
        self.predicate = predicate;
    }

    /// Whether a failed commit is waiting for [`retry_last_commit`](Self::retry_last_commit).
    #[must_use]
    pub fn has_failed_commit(&self) -> bool {
        self.failed.is_some()
    }

    /// The section's persisted full order, i.e. the last known-good order.
    pub fn full_order(&self, section: &SectionId) -> Result<FullOrder, CommitError> {
        self.store
            .full_order(section)
            .map_err(|source| CommitError::Load {
                section: section.clone(),
                source,
            })
    }

    /// The section's current filtered view for rendering.
    pub fn view(&self, section: &SectionId) -> Result<Vec<ItemId>, CommitError> {
        let full = self.full_order(section)?;
        Ok(project(full.as_slice(), &self.catalog, &self.predicate))
    }

    pub fn drag_start(&mut self, item: ItemId, section: SectionId) -> Result<SessionStep, CommitError> {
        self.handle(DragEvent::DragStart { item, section })
    }

    pub fn drag_over(&mut self, candidate: ItemId, section: SectionId) -> Result<SessionStep, CommitError> {
        self.handle(DragEvent::DragOver { candidate, section })
    }

    pub fn drag_leave(&mut self) -> Result<SessionStep, CommitError> {
        self.handle(DragEvent::DragLeave)
    }

    /// Drop onto `target`. Under an active filter this stops at the
    /// confirmation gate unless the screen disabled it.
    pub fn drop_on(&mut self, target: ItemId, section: SectionId) -> Result<SessionStep, CommitError> {
        let filtered = !self.predicate.is_empty();
        self.handle(DragEvent::Drop {
            target,
            section,
            filtered,
        })
    }

    pub fn confirm(&mut self) -> Result<SessionStep, CommitError> {
        self.handle(DragEvent::Confirm)
    }

    /// Discard the pending drop. Never touches the store.
    pub fn cancel(&mut self) -> Result<SessionStep, CommitError> {
        self.handle(DragEvent::Cancel)
    }

    pub fn drag_end(&mut self) -> Result<SessionStep, CommitError> {
        self.handle(DragEvent::DragEnd)
    }

    /// Replay the last failed commit against the store's current order.
    pub fn retry_last_commit(&mut self) -> Result<CommitReport, CommitError> {
        if self.machine.is_active() {
            return Err(CommitError::Busy);
        }
        let pending = self.failed.take().ok_or(CommitError::NothingToRetry)?;
        tracing::info!(
            target: "ordview.session",
            section = %pending.section,
            dragged = %pending.dragged,
            "retrying failed commit"
        );
        self.execute(&pending)
    }

    fn handle(&mut self, event: DragEvent) -> Result<SessionStep, CommitError> {
        let transition = self.machine.apply_event(&event)?;
        let pending = transition
            .commit_request()
            .map(|(dragged, section, target)| PendingCommit {
                section: section.clone(),
                dragged: dragged.clone(),
                target: target.clone(),
            });
        let Some(pending) = pending else {
            return Ok(SessionStep {
                transition,
                commit: None,
            });
        };

        let result = self.execute(&pending);
        let settled = self.machine.apply_event(&DragEvent::CommitFinished {
            succeeded: result.is_ok(),
        })?;
        tracing::debug!(
            target: "ordview.session",
            transition_id = settled.transition_id,
            succeeded = result.is_ok(),
            "commit settled"
        );
        let report = result?;
        Ok(SessionStep {
            transition,
            commit: Some(report),
        })
    }

    fn execute(&mut self, pending: &PendingCommit) -> Result<CommitReport, CommitError> {
        let _span = tracing::debug_span!(
            "ordview.session.commit",
            section = %pending.section,
            dragged = %pending.dragged,
            target = %pending.target,
        )
        .entered();

        let section = &pending.section;
        let load_error = |source| CommitError::Load {
            section: section.clone(),
            source,
        };
        let before = self.store.full_order(section).map_err(load_error)?.into_vec();
        let revision = self.store.revision(section).map_err(load_error)?;

        let view = project(&before, &self.catalog, &self.predicate);
        let mode = if self.predicate.is_empty() {
            DropMode::Direct
        } else {
            DropMode::Reconcile(self.config.policy)
        };
        let outcome = apply_drop(mode, &before, &view, &pending.dragged, &pending.target);

        if !outcome.is_applied() {
            tracing::debug!(target: "ordview.session", section = %section, "drop left order unchanged");
            return Ok(CommitReport {
                section: section.clone(),
                dragged: pending.dragged.clone(),
                target: pending.target.clone(),
                after: before.clone(),
                before,
                change: outcome.change,
                revision,
                saved: false,
            });
        }

        match self.config.save_retry.save(&self.store, section, &outcome.order) {
            Ok(revision) => {
                self.failed = None;
                tracing::info!(
                    target: "ordview.session",
                    section = %section,
                    revision = %revision,
                    "reorder committed"
                );
                Ok(CommitReport {
                    section: section.clone(),
                    dragged: pending.dragged.clone(),
                    target: pending.target.clone(),
                    before,
                    after: outcome.order,
                    change: outcome.change,
                    revision,
                    saved: true,
                })
            }
            Err(source) => {
                tracing::warn!(
                    target: "ordview.session",
                    section = %section,
                    error = %source,
                    "reorder not saved; keeping last known-good order"
                );
                self.failed = Some(pending.clone());
                Err(CommitError::Save {
                    section: section.clone(),
                    source,
                })
            }
        }
    }
}
