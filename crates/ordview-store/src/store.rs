//! The order store seam.

use std::collections::BTreeMap;

use ordview_core::{Attributes, FilterPredicate, FullOrder, ItemId, SectionId, project_order};

use crate::error::Result;
use crate::section::{Revision, SectionRecord, SectionSummary};

/// Section-keyed owner of every full order.
///
/// All mutation goes through [`save_order`](OrderStore::save_order) or
/// [`save_order_if`](OrderStore::save_order_if). Both replace the whole order
/// atomically: on error the previously persisted order is untouched. Saving
/// an order that is not a permutation of the section's items is rejected.
pub trait OrderStore: Send + Sync {
    /// Snapshot of one section.
    fn section(&self, section: &SectionId) -> Result<SectionRecord>;

    /// Every section, in id order.
    fn sections(&self) -> Result<Vec<SectionSummary>>;

    /// Replace the section's order, last writer wins. Returns the revision
    /// now in effect.
    fn save_order(&self, section: &SectionId, order: &[ItemId]) -> Result<Revision>;

    /// Replace the section's order only if its revision still equals
    /// `expected`; otherwise fail with
    /// [`StoreError::RevisionConflict`](crate::StoreError::RevisionConflict).
    fn save_order_if(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Revision,
    ) -> Result<Revision>;

    /// Drop every section and install `sections` in their place.
    fn replace_all(&self, sections: Vec<SectionRecord>) -> Result<()>;

    fn full_order(&self, section: &SectionId) -> Result<FullOrder> {
        Ok(self.section(section)?.full_order())
    }

    /// The section's full order projected through `predicate`.
    fn filtered(&self, section: &SectionId, predicate: &FilterPredicate) -> Result<Vec<ItemId>> {
        let record = self.section(section)?;
        Ok(project_order(&record.full_order(), &record, predicate))
    }

    fn revision(&self, section: &SectionId) -> Result<Revision> {
        Ok(self.section(section)?.revision)
    }

    /// The section's item attributes as an owned catalog.
    fn catalog(&self, section: &SectionId) -> Result<BTreeMap<ItemId, Attributes>> {
        Ok(self.section(section)?.catalog())
    }
}

impl<S: OrderStore + ?Sized> OrderStore for &S {
    fn section(&self, section: &SectionId) -> Result<SectionRecord> {
        (**self).section(section)
    }

    fn sections(&self) -> Result<Vec<SectionSummary>> {
        (**self).sections()
    }

    fn save_order(&self, section: &SectionId, order: &[ItemId]) -> Result<Revision> {
        (**self).save_order(section, order)
    }

    fn save_order_if(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Revision,
    ) -> Result<Revision> {
        (**self).save_order_if(section, order, expected)
    }

    fn replace_all(&self, sections: Vec<SectionRecord>) -> Result<()> {
        (**self).replace_all(sections)
    }

    fn full_order(&self, section: &SectionId) -> Result<FullOrder> {
        (**self).full_order(section)
    }

    fn filtered(&self, section: &SectionId, predicate: &FilterPredicate) -> Result<Vec<ItemId>> {
        (**self).filtered(section, predicate)
    }

    fn revision(&self, section: &SectionId) -> Result<Revision> {
        (**self).revision(section)
    }
}

impl<S: OrderStore + ?Sized> OrderStore for std::sync::Arc<S> {
    fn section(&self, section: &SectionId) -> Result<SectionRecord> {
        (**self).section(section)
    }

    fn sections(&self) -> Result<Vec<SectionSummary>> {
        (**self).sections()
    }

    fn save_order(&self, section: &SectionId, order: &[ItemId]) -> Result<Revision> {
        (**self).save_order(section, order)
    }

    fn save_order_if(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Revision,
    ) -> Result<Revision> {
        (**self).save_order_if(section, order, expected)
    }

    fn replace_all(&self, sections: Vec<SectionRecord>) -> Result<()> {
        (**self).replace_all(sections)
    }

    fn full_order(&self, section: &SectionId) -> Result<FullOrder> {
        (**self).full_order(section)
    }

    fn filtered(&self, section: &SectionId, predicate: &FilterPredicate) -> Result<Vec<ItemId>> {
        (**self).filtered(section, predicate)
    }

    fn revision(&self, section: &SectionId) -> Result<Revision> {
        (**self).revision(section)
    }
}
