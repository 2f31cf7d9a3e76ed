//! Attribute lookup seam.
//!
//! The catalog that knows each item's attributes lives outside ordview; the
//! projector only needs point lookups.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::attributes::Attributes;
use crate::id::ItemId;

/// Source of per-item [`Attributes`].
pub trait AttributeCatalog {
    /// Attributes of `id`, or `None` when the catalog does not know it.
    fn attributes(&self, id: &ItemId) -> Option<&Attributes>;
}

impl<S: BuildHasher> AttributeCatalog for HashMap<ItemId, Attributes, S> {
    fn attributes(&self, id: &ItemId) -> Option<&Attributes> {
        self.get(id)
    }
}

impl AttributeCatalog for BTreeMap<ItemId, Attributes> {
    fn attributes(&self, id: &ItemId) -> Option<&Attributes> {
        self.get(id)
    }
}

impl<C: AttributeCatalog + ?Sized> AttributeCatalog for &C {
    fn attributes(&self, id: &ItemId) -> Option<&Attributes> {
        (**self).attributes(id)
    }
}
