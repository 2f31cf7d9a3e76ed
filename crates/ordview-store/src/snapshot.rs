//! Flat export of a store's contents.

use ordview_core::{Attributes, ItemId, SectionId};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::section::{ItemStatus, Revision};
use crate::store::OrderStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSection {
    pub id: SectionId,
    pub title: String,
    pub revision: Revision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotItem {
    pub id: ItemId,
    pub section: SectionId,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

/// One `(section, item, rank)` row; `order_index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub section: SectionId,
    pub item: ItemId,
    pub order_index: usize,
}

/// Everything a store holds, as three flat tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub sections: Vec<SnapshotSection>,
    pub items: Vec<SnapshotItem>,
    pub order: Vec<OrderRow>,
}

impl StoreSnapshot {
    /// Capture `store`. Sections without a saved order export their
    /// effective (id-sorted) order.
    pub fn capture<S: OrderStore + ?Sized>(store: &S) -> Result<Self> {
        let mut snapshot = Self::default();
        for summary in store.sections()? {
            let record = store.section(&summary.id)?;
            snapshot.sections.push(SnapshotSection {
                id: record.id.clone(),
                title: record.title.clone(),
                revision: record.revision,
            });
            snapshot
                .items
                .extend(record.items.iter().map(|(id, item)| SnapshotItem {
                    id: id.clone(),
                    section: record.id.clone(),
                    attributes: item.attributes.clone(),
                    text: item.text.clone(),
                    status: item.status,
                }));
            snapshot.order.extend(
                record
                    .full_order()
                    .iter()
                    .enumerate()
                    .map(|(position, id)| OrderRow {
                        section: record.id.clone(),
                        item: id.clone(),
                        order_index: position + 1,
                    }),
            );
        }
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
