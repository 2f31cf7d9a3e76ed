//! The authoritative, duplicate-free ordering of a section's items.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// Errors raised when constructing a [`FullOrder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The same item appears more than once.
    Duplicate { id: ItemId, first: usize, second: usize },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { id, first, second } => write!(
                f,
                "item {id} appears twice in order (positions {first} and {second})"
            ),
        }
    }
}

impl std::error::Error for OrderError {}

/// A gapless, duplicate-free ranked sequence of item ids.
///
/// Ranks are 1-based and contiguous: the item at slice index `i` has rank
/// `i + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemId>", into = "Vec<ItemId>")]
pub struct FullOrder {
    items: Vec<ItemId>,
}

impl FullOrder {
    /// Validate and wrap an ordering.
    pub fn new(items: Vec<ItemId>) -> Result<Self, OrderError> {
        let mut seen: FxHashMap<&ItemId, usize> = FxHashMap::default();
        seen.reserve(items.len());
        for (index, id) in items.iter().enumerate() {
            if let Some(first) = seen.insert(id, index) {
                return Err(OrderError::Duplicate {
                    id: id.clone(),
                    first,
                    second: index,
                });
            }
        }
        Ok(Self { items })
    }

    /// Build from anything yielding id-like values.
    pub fn from_ids<I, T>(ids: I) -> Result<Self, OrderError>
    where
        I: IntoIterator<Item = T>,
        T: Into<ItemId>,
    {
        Self::new(ids.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.items.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ItemId> {
        self.items
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.position_of(id).is_some()
    }

    /// 0-based slice position.
    #[must_use]
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|candidate| candidate == id)
    }

    /// 1-based rank.
    #[must_use]
    pub fn rank_of(&self, id: &ItemId) -> Option<usize> {
        self.position_of(id).map(|position| position + 1)
    }

    /// Whether `other` holds exactly the same ids, in any order.
    #[must_use]
    pub fn is_permutation_of(&self, other: &[ItemId]) -> bool {
        if self.items.len() != other.len() {
            return false;
        }
        let mine: FxHashSet<&ItemId> = self.items.iter().collect();
        let mut theirs: FxHashSet<&ItemId> = FxHashSet::default();
        other
            .iter()
            .all(|id| mine.contains(id) && theirs.insert(id))
    }
}

impl TryFrom<Vec<ItemId>> for FullOrder {
    type Error = OrderError;

    fn try_from(items: Vec<ItemId>) -> Result<Self, Self::Error> {
        Self::new(items)
    }
}

impl From<FullOrder> for Vec<ItemId> {
    fn from(order: FullOrder) -> Self {
        order.items
    }
}

impl<'a> IntoIterator for &'a FullOrder {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl AsRef<[ItemId]> for FullOrder {
    fn as_ref(&self) -> &[ItemId] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().copied().map(ItemId::from).collect()
    }

    #[test]
    fn ranks_are_one_based() {
        let order = FullOrder::from_ids(["a", "b", "c"]).expect("valid order");
        assert_eq!(order.rank_of(&ItemId::new("a")), Some(1));
        assert_eq!(order.rank_of(&ItemId::new("c")), Some(3));
        assert_eq!(order.position_of(&ItemId::new("c")), Some(2));
        assert_eq!(order.rank_of(&ItemId::new("z")), None);
    }

    #[test]
    fn duplicates_are_rejected_with_positions() {
        let err = FullOrder::from_ids(["a", "b", "a"]).expect_err("duplicate");
        assert_eq!(
            err,
            OrderError::Duplicate {
                id: ItemId::new("a"),
                first: 0,
                second: 2
            }
        );
        assert!(err.to_string().contains("positions 0 and 2"));
    }

    #[test]
    fn permutation_check_ignores_order_but_not_membership() {
        let order = FullOrder::from_ids(["a", "b", "c"]).expect("valid order");
        assert!(order.is_permutation_of(&ids(&["c", "a", "b"])));
        assert!(!order.is_permutation_of(&ids(&["a", "b"])));
        assert!(!order.is_permutation_of(&ids(&["a", "b", "d"])));
        assert!(!order.is_permutation_of(&ids(&["a", "a", "b"])));
    }

    #[test]
    fn serde_round_trips_as_plain_array_and_validates() {
        let order = FullOrder::from_ids(["x", "y"]).expect("valid order");
        let json = serde_json::to_string(&order).expect("serialize");
        assert_eq!(json, r#"["x","y"]"#);
        assert!(serde_json::from_str::<FullOrder>(r#"["x","x"]"#).is_err());
    }
}
