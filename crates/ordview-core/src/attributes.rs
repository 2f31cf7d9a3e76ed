//! Categorical attributes attached to items.
//!
//! Every item carries the same fixed tuple of dimensions. Attributes decide
//! filtered-view membership only; they never influence ordering.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! category {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

category! {
    /// Review category, e.g. `Due Diligence` or `Periodic Review`.
    ReviewCategory
}

category! {
    /// Participant category, e.g. `XY` or `PQR`.
    ParticipantCategory
}

category! {
    /// Geography (country) an item applies to.
    Geography
}

/// One filterable dimension of [`Attributes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Review,
    Participant,
    Geography,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Review, Self::Participant, Self::Geography];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Participant => "participant",
            Self::Geography => "geography",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a dimension name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDimension(pub String);

impl fmt::Display for UnknownDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown dimension {:?} (expected review, participant, or geography)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDimension {}

impl FromStr for Dimension {
    type Err = UnknownDimension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "review" | "review_type" | "review-type" => Ok(Self::Review),
            "participant" | "participant_type" | "participant-type" => Ok(Self::Participant),
            "geography" | "country" => Ok(Self::Geography),
            other => Err(UnknownDimension(other.to_owned())),
        }
    }
}

/// The fixed attribute tuple of an item.
///
/// An unset dimension never satisfies an equality constraint on that
/// dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub review: Option<ReviewCategory>,
    pub participant: Option<ParticipantCategory>,
    pub geography: Option<Geography>,
}

impl Attributes {
    #[must_use]
    pub fn new(review: impl Into<String>, participant: impl Into<String>) -> Self {
        Self {
            review: Some(ReviewCategory::new(review)),
            participant: Some(ParticipantCategory::new(participant)),
            geography: None,
        }
    }

    #[must_use]
    pub fn with_geography(mut self, geography: impl Into<String>) -> Self {
        self.geography = Some(Geography::new(geography));
        self
    }

    /// Value of one dimension, if set.
    #[must_use]
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Review => self.review.as_ref().map(ReviewCategory::as_str),
            Dimension::Participant => self.participant.as_ref().map(ParticipantCategory::as_str),
            Dimension::Geography => self.geography.as_ref().map(Geography::as_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_parses_aliases() {
        assert_eq!("country".parse::<Dimension>(), Ok(Dimension::Geography));
        assert_eq!("Review".parse::<Dimension>(), Ok(Dimension::Review));
        assert_eq!(
            "participant-type".parse::<Dimension>(),
            Ok(Dimension::Participant)
        );
        assert!("status".parse::<Dimension>().is_err());
    }

    #[test]
    fn value_reads_each_dimension() {
        let attrs = Attributes::new("Due Diligence", "XY").with_geography("SG");
        assert_eq!(attrs.value(Dimension::Review), Some("Due Diligence"));
        assert_eq!(attrs.value(Dimension::Participant), Some("XY"));
        assert_eq!(attrs.value(Dimension::Geography), Some("SG"));
        assert_eq!(Attributes::default().value(Dimension::Review), None);
    }
}
