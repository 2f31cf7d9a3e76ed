//! Filter predicates: conjunctions of attribute-equality constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attributes::{Attributes, Dimension, Geography, ParticipantCategory, ReviewCategory};

/// A conjunction of at most one equality constraint per [`Dimension`].
///
/// The empty predicate ([`FilterPredicate::ANY`]) matches every item; a view
/// projected through it is "unfiltered".
///
/// ```
/// use ordview_core::{Attributes, FilterPredicate};
///
/// let xy = FilterPredicate::ANY.with_participant("XY");
/// assert!(xy.matches(&Attributes::new("Due Diligence", "XY")));
/// assert!(!xy.matches(&Attributes::new("Due Diligence", "PQR")));
/// assert!(FilterPredicate::ANY.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPredicate {
    pub review: Option<ReviewCategory>,
    pub participant: Option<ParticipantCategory>,
    pub geography: Option<Geography>,
}

impl FilterPredicate {
    /// The empty predicate.
    pub const ANY: Self = Self {
        review: None,
        participant: None,
        geography: None,
    };

    /// Whether no constraint is set (filter inactive).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.review.is_none() && self.participant.is_none() && self.geography.is_none()
    }

    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.constraints().count()
    }

    #[must_use]
    pub fn with_review(mut self, value: impl Into<String>) -> Self {
        self.review = Some(ReviewCategory::new(value));
        self
    }

    #[must_use]
    pub fn with_participant(mut self, value: impl Into<String>) -> Self {
        self.participant = Some(ParticipantCategory::new(value));
        self
    }

    #[must_use]
    pub fn with_geography(mut self, value: impl Into<String>) -> Self {
        self.geography = Some(Geography::new(value));
        self
    }

    /// Set the constraint for `dimension`, replacing any previous value.
    #[must_use]
    pub fn with(self, dimension: Dimension, value: impl Into<String>) -> Self {
        match dimension {
            Dimension::Review => self.with_review(value),
            Dimension::Participant => self.with_participant(value),
            Dimension::Geography => self.with_geography(value),
        }
    }

    /// Active constraints in dimension order.
    pub fn constraints(&self) -> impl Iterator<Item = (Dimension, &str)> + '_ {
        let review = self
            .review
            .as_ref()
            .map(|v| (Dimension::Review, v.as_str()));
        let participant = self
            .participant
            .as_ref()
            .map(|v| (Dimension::Participant, v.as_str()));
        let geography = self
            .geography
            .as_ref()
            .map(|v| (Dimension::Geography, v.as_str()));
        review.into_iter().chain(participant).chain(geography)
    }

    /// Whether `attributes` satisfies every constraint.
    #[must_use]
    pub fn matches(&self, attributes: &Attributes) -> bool {
        self.constraints()
            .all(|(dimension, required)| attributes.value(dimension) == Some(required))
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("*");
        }
        let mut first = true;
        for (dimension, value) in self.constraints() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{dimension}={value}")?;
        }
        Ok(())
    }
}
