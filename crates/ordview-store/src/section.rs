//! Per-section records held by every store backend.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use ordview_core::{AttributeCatalog, Attributes, FullOrder, ItemId, SectionId};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Optimistic-concurrency token, bumped on every save that changes a
/// section's order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(u64);

impl Revision {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status carried alongside an item. Not used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Approved,
    Review,
    Cancelled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl ItemRecord {
    #[must_use]
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            text: None,
            status: None,
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// A section: its items and, once saved, their authoritative order.
///
/// When `order` is `None` the section reads back in item-id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub id: SectionId,
    pub title: String,
    #[serde(default)]
    pub items: BTreeMap<ItemId, ItemRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<FullOrder>,
    #[serde(default)]
    pub revision: Revision,
}

/// Listing entry returned by [`OrderStore::sections`](crate::OrderStore::sections).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub id: SectionId,
    pub title: String,
    pub item_count: usize,
    pub revision: Revision,
}

impl SectionRecord {
    #[must_use]
    pub fn new(id: impl Into<SectionId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: BTreeMap::new(),
            order: None,
            revision: Revision::ZERO,
        }
    }

    #[must_use]
    pub fn with_item(mut self, id: impl Into<ItemId>, item: ItemRecord) -> Self {
        self.items.insert(id.into(), item);
        self
    }

    /// Set the persisted order after checking it covers exactly the items.
    pub fn with_order<I, T>(mut self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        let ids: Vec<ItemId> = ids.into_iter().map(Into::into).collect();
        self.order = Some(self.validate_order(&ids)?);
        Ok(self)
    }

    /// The authoritative order, falling back to item-id order.
    #[must_use]
    pub fn full_order(&self) -> FullOrder {
        match &self.order {
            Some(order) => order.clone(),
            // BTreeMap keys are unique, so this cannot hit a duplicate.
            None => FullOrder::new(self.items.keys().cloned().collect()).unwrap_or_default(),
        }
    }

    /// Check that `order` is a permutation of this section's items.
    pub fn validate_order(&self, order: &[ItemId]) -> Result<FullOrder> {
        let mut seen: BTreeSet<&ItemId> = BTreeSet::new();
        let mut duplicates = Vec::new();
        let mut unexpected = Vec::new();
        for id in order {
            if !seen.insert(id) {
                duplicates.push(id.clone());
            } else if !self.items.contains_key(id) {
                unexpected.push(id.clone());
            }
        }
        let missing: Vec<ItemId> = self
            .items
            .keys()
            .filter(|id| !seen.contains(id))
            .cloned()
            .collect();

        if missing.is_empty() && unexpected.is_empty() && duplicates.is_empty() {
            if let Ok(order) = FullOrder::new(order.to_vec()) {
                return Ok(order);
            }
        }
        Err(StoreError::NotAPermutation {
            section: self.id.clone(),
            missing,
            unexpected,
            duplicates,
        })
    }

    /// Attribute map usable as an [`AttributeCatalog`] outside the store.
    #[must_use]
    pub fn catalog(&self) -> BTreeMap<ItemId, Attributes> {
        self.items
            .iter()
            .map(|(id, item)| (id.clone(), item.attributes.clone()))
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> SectionSummary {
        SectionSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            item_count: self.items.len(),
            revision: self.revision,
        }
    }

    /// Replace the order if it differs, bumping the revision.
    ///
    /// Saving the order already in effect changes nothing.
    pub(crate) fn replace_order(&mut self, order: FullOrder) -> Revision {
        if self.order.as_ref() != Some(&order) {
            self.order = Some(order);
            self.revision = self.revision.next();
        }
        self.revision
    }
}

impl AttributeCatalog for SectionRecord {
    fn attributes(&self, id: &ItemId) -> Option<&Attributes> {
        self.items.get(id).map(|item| &item.attributes)
    }
}
