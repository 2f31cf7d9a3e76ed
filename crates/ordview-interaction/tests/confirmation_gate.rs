#![forbid(unsafe_code)]

//! Session-level behavior of the confirmation gate and failed saves.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use ordview_core::{Attributes, FilterPredicate, ItemId, SectionId};
use ordview_interaction::{
    CommitError, DragEffect, DragState, ReorderSession, ScreenConfig,
};
use ordview_reconcile::{MoveKind, ReconcileChange, ReconcilePolicy};
use ordview_store::{
    ItemRecord, MemoryOrderStore, OrderStore, Revision, SectionRecord, SectionSummary, StoreError,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Memory store that counts save calls.
#[derive(Default)]
struct CountingStore {
    inner: MemoryOrderStore,
    saves: AtomicUsize,
}

impl CountingStore {
    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl OrderStore for CountingStore {
    fn section(&self, section: &SectionId) -> Result<SectionRecord, StoreError> {
        self.inner.section(section)
    }

    fn sections(&self) -> Result<Vec<SectionSummary>, StoreError> {
        self.inner.sections()
    }

    fn save_order(&self, section: &SectionId, order: &[ItemId]) -> Result<Revision, StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_order(section, order)
    }

    fn save_order_if(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Revision,
    ) -> Result<Revision, StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_order_if(section, order, expected)
    }

    fn replace_all(&self, sections: Vec<SectionRecord>) -> Result<(), StoreError> {
        self.inner.replace_all(sections)
    }
}

fn nums(raw: &[u32]) -> Vec<ItemId> {
    raw.iter().map(|n| ItemId::new(n.to_string())).collect()
}

fn id(n: u32) -> ItemId {
    ItemId::new(n.to_string())
}

fn section() -> SectionId {
    SectionId::new("s")
}

/// Items 1..=9 in order; `xy` lists the ones with participant "XY".
fn fixture(xy: &[u32]) -> (CountingStore, BTreeMap<ItemId, Attributes>) {
    let record = (1..=9u32).fold(SectionRecord::new("s", "Section"), |record, n| {
        let participant = if xy.contains(&n) { "XY" } else { "PQR" };
        record.with_item(id(n), ItemRecord::new(Attributes::new("Due Diligence", participant)))
    });
    let record = record.with_order(nums(&[1, 2, 3, 4, 5, 6, 7, 8, 9])).expect("valid order");
    let catalog = record.catalog();
    let store = CountingStore::default();
    store.inner.insert_section(record);
    (store, catalog)
}

fn xy_filter() -> FilterPredicate {
    FilterPredicate::ANY.with_participant("XY")
}

// ============================================================================
// Confirmation gate
// ============================================================================

#[test]
fn filtered_drop_saves_only_after_confirm() {
    let (store, catalog) = fixture(&[4, 7, 8]);
    let config = ScreenConfig::default().with_policy(ReconcilePolicy::ShiftInsert);
    let mut session = ReorderSession::new(&store, &catalog, config);
    session.set_predicate(xy_filter());

    session.drag_start(id(8), section()).expect("start");
    session.drag_over(id(4), section()).expect("over");
    let dropped = session.drop_on(id(4), section()).expect("drop");
    assert!(matches!(
        dropped.transition.effect,
        DragEffect::ConfirmationRequested { .. }
    ));
    assert!(dropped.commit.is_none());
    assert_eq!(store.saves(), 0);

    // The dialog survives the end of the drag gesture.
    session.drag_end().expect("drag end");
    assert!(session.machine().awaiting_confirmation());
    assert_eq!(store.saves(), 0);

    let confirmed = session.confirm().expect("confirm");
    let report = confirmed.commit.expect("commit report");
    assert_eq!(store.saves(), 1);
    assert!(report.saved);
    assert_eq!(report.after, nums(&[1, 2, 3, 8, 4, 5, 6, 7, 9]));
    assert_eq!(report.revision, Revision::new(1));
    assert_eq!(session.view(&section()).expect("view"), nums(&[8, 4, 7]));
    assert_eq!(session.machine().state(), &DragState::Idle);
}

#[test]
fn cancel_leaves_store_untouched() {
    let (store, catalog) = fixture(&[1, 3, 4, 5]);
    let mut session = ReorderSession::new(&store, &catalog, ScreenConfig::default());
    session.set_predicate(xy_filter());

    session.drag_start(id(5), section()).expect("start");
    session.drop_on(id(1), section()).expect("drop");
    session.cancel().expect("cancel");

    assert_eq!(store.saves(), 0);
    assert_eq!(
        store.full_order(&section()).expect("order").into_vec(),
        nums(&[1, 2, 3, 4, 5, 6, 7, 8, 9])
    );
    assert!(!session.machine().is_active());
}

#[test]
fn swap_screen_reconciles_with_swap() {
    let (store, catalog) = fixture(&[1, 3, 4, 5]);
    let mut session = ReorderSession::new(&store, &catalog, ScreenConfig::default());
    session.set_predicate(xy_filter());

    session.drag_start(id(5), section()).expect("start");
    session.drop_on(id(1), section()).expect("drop");
    let report = session.confirm().expect("confirm").commit.expect("report");
    assert_eq!(report.after, nums(&[5, 2, 3, 4, 1, 6, 7, 8, 9]));
    assert!(matches!(
        report.change,
        ReconcileChange::Applied { kind: MoveKind::Swap, from_rank: 5, to_rank: 1, .. }
    ));
}

#[test]
fn unfiltered_drop_commits_immediately_and_identically_for_both_policies() {
    let mut results = Vec::new();
    for policy in ReconcilePolicy::ALL {
        let (store, catalog) = fixture(&[]);
        let config = ScreenConfig::default().with_policy(policy);
        let mut session = ReorderSession::new(&store, &catalog, config);
        session.drag_start(id(7), section()).expect("start");
        let dropped = session.drop_on(id(2), section()).expect("drop");
        let report = dropped.commit.expect("committed without confirmation");
        assert_eq!(store.saves(), 1);
        results.push(report.after);
    }
    assert_eq!(results[0], nums(&[1, 7, 2, 3, 4, 5, 6, 8, 9]));
    assert_eq!(results[0], results[1]);
}

#[test]
fn cross_section_drop_is_a_noop() {
    let (store, catalog) = fixture(&[]);
    let mut session = ReorderSession::new(&store, &catalog, ScreenConfig::default());
    session.drag_start(id(1), section()).expect("start");
    let dropped = session.drop_on(id(2), SectionId::new("other")).expect("drop");
    assert!(dropped.commit.is_none());
    assert_eq!(store.saves(), 0);
    assert!(!session.machine().is_active());
}

// ============================================================================
// Save failures
// ============================================================================

#[test]
fn failed_save_keeps_known_good_order_and_can_be_retried() {
    let (store, catalog) = fixture(&[]);
    let mut session = ReorderSession::new(&store, &catalog, ScreenConfig::default());
    store.inner.fail_next_saves(1);

    session.drag_start(id(9), section()).expect("start");
    let err = session.drop_on(id(1), section()).expect_err("save fails");
    assert!(err.is_retryable());
    assert!(matches!(err, CommitError::Save { .. }));
    assert!(session.has_failed_commit());
    assert!(!session.machine().is_active());
    assert_eq!(
        session.full_order(&section()).expect("order").into_vec(),
        nums(&[1, 2, 3, 4, 5, 6, 7, 8, 9])
    );

    let report = session.retry_last_commit().expect("retry succeeds");
    assert_eq!(report.after, nums(&[9, 1, 2, 3, 4, 5, 6, 7, 8]));
    assert!(!session.has_failed_commit());
    assert!(matches!(
        session.retry_last_commit(),
        Err(CommitError::NothingToRetry)
    ));
}

#[test]
fn save_retry_absorbs_transient_failures() {
    let (store, catalog) = fixture(&[]);
    let config = ScreenConfig::default().with_save_retry(ordview_store::SaveRetry::fixed(2, 0));
    let mut session = ReorderSession::new(&store, &catalog, config);
    store.inner.fail_next_saves(2);

    session.drag_start(id(3), section()).expect("start");
    let report = session
        .drop_on(id(1), section())
        .expect("third attempt saves")
        .commit
        .expect("report");
    assert!(report.saved);
    assert_eq!(store.saves(), 3);
}

#[test]
fn retry_is_refused_while_dragging() {
    let (store, catalog) = fixture(&[]);
    let mut session = ReorderSession::new(&store, &catalog, ScreenConfig::default());
    store.inner.fail_next_saves(1);
    session.drag_start(id(2), section()).expect("start");
    session.drop_on(id(1), section()).expect_err("save fails");

    session.drag_start(id(5), section()).expect("new drag");
    assert!(matches!(session.retry_last_commit(), Err(CommitError::Busy)));
    assert!(session.has_failed_commit());
}
