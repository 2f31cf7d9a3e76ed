//! In-process order store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use ordview_core::{ItemId, SectionId};

use crate::error::{Result, StoreError};
use crate::section::{Revision, SectionRecord, SectionSummary};
use crate::store::OrderStore;

/// `RwLock`-guarded map of sections.
///
/// A save validates and swaps the whole order under the write lock, so
/// readers never observe a partial order.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    sections: RwLock<BTreeMap<SectionId, SectionRecord>>,
    injected_failures: AtomicU32,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sections(sections: impl IntoIterator<Item = SectionRecord>) -> Self {
        let map = sections
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            sections: RwLock::new(map),
            injected_failures: AtomicU32::new(0),
        }
    }

    /// Add or replace one section.
    pub fn insert_section(&self, record: SectionRecord) {
        self.write().insert(record.id.clone(), record);
    }

    /// Make the next `count` saves fail with [`StoreError::Unavailable`]
    /// without touching any order.
    pub fn fail_next_saves(&self, count: u32) {
        self.injected_failures.store(count, Ordering::SeqCst);
    }

    fn take_injected_failure(&self) -> bool {
        self.injected_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<SectionId, SectionRecord>> {
        self.sections.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<SectionId, SectionRecord>> {
        self.sections.write().unwrap_or_else(|e| e.into_inner())
    }

    fn commit(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Option<Revision>,
    ) -> Result<Revision> {
        if self.take_injected_failure() {
            tracing::warn!(target: "ordview.store", section = %section, "injected save failure");
            return Err(StoreError::Unavailable(format!(
                "injected failure saving section {section}"
            )));
        }

        let mut sections = self.write();
        let record = sections
            .get_mut(section)
            .ok_or_else(|| StoreError::UnknownSection(section.clone()))?;
        if let Some(expected) = expected
            && record.revision != expected
        {
            return Err(StoreError::RevisionConflict {
                section: section.clone(),
                expected,
                actual: record.revision,
            });
        }
        let validated = record.validate_order(order)?;
        let revision = record.replace_order(validated);
        tracing::debug!(
            target: "ordview.store",
            section = %section,
            revision = %revision,
            len = order.len(),
            "order saved"
        );
        Ok(revision)
    }
}

impl OrderStore for MemoryOrderStore {
    fn section(&self, section: &SectionId) -> Result<SectionRecord> {
        self.read()
            .get(section)
            .cloned()
            .ok_or_else(|| StoreError::UnknownSection(section.clone()))
    }

    fn sections(&self) -> Result<Vec<SectionSummary>> {
        Ok(self.read().values().map(SectionRecord::summary).collect())
    }

    fn save_order(&self, section: &SectionId, order: &[ItemId]) -> Result<Revision> {
        self.commit(section, order, None)
    }

    fn save_order_if(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Revision,
    ) -> Result<Revision> {
        self.commit(section, order, Some(expected))
    }

    fn replace_all(&self, sections: Vec<SectionRecord>) -> Result<()> {
        let map = sections
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        *self.write() = map;
        Ok(())
    }

    fn revision(&self, section: &SectionId) -> Result<Revision> {
        self.read()
            .get(section)
            .map(|record| record.revision)
            .ok_or_else(|| StoreError::UnknownSection(section.clone()))
    }
}
