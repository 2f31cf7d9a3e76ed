use std::path::PathBuf;

use ordview_core::{ItemId, SectionId};
use thiserror::Error;

use crate::section::Revision;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    #[error(
        "order for section {section} is not a permutation of its items \
         (missing {missing:?}, unexpected {unexpected:?}, duplicated {duplicates:?})"
    )]
    NotAPermutation {
        section: SectionId,
        missing: Vec<ItemId>,
        unexpected: Vec<ItemId>,
        duplicates: Vec<ItemId>,
    },

    #[error("section {section} changed underneath the save (expected revision {expected}, found {actual})")]
    RevisionConflict {
        section: SectionId,
        expected: Revision,
        actual: Revision,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported store file version {found} in {path} (expected {expected})")]
    UnsupportedVersion {
        path: PathBuf,
        found: u64,
        expected: u64,
    },
}

impl StoreError {
    /// Whether retrying the same save may succeed without re-reading state.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
