//! JSON-file order store.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "saved_at_ms": 1760745600000,
//!   "sections": [
//!     {
//!       "id": "sec-1",
//!       "title": "Customer Onboarding",
//!       "items": { "sec-1-xy-q1": { "attributes": { "review": "Due Diligence", "participant": "XY" } } },
//!       "order": ["sec-1-xy-q1"],
//!       "revision": 3
//!     }
//!   ]
//! }
//! ```
//!
//! # Atomic Writes
//!
//! Every mutation writes the whole document to a sibling temp file and
//! renames it over the original. A failed write removes the temp file and
//! leaves the document at its prior state.
//!
//! # Sharing a File
//!
//! Several stores may open the same path. Reads and saves always start from
//! the document on disk, never from what this instance last saw: a save
//! replaces only its own section, and the revision checked by
//! [`save_order_if`](OrderStore::save_order_if) is the one on disk. The lock
//! held by one store serializes its own writers; writers in other stores
//! are last-writer-wins per section.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockWriteGuard};

use ordview_core::{ItemId, SectionId};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::section::{Revision, SectionRecord, SectionSummary};
use crate::store::OrderStore;

/// Current file format version.
pub const FORMAT_VERSION: u64 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u64,
    #[serde(default)]
    saved_at_ms: u64,
    sections: Vec<SectionRecord>,
}

type SectionMap = BTreeMap<SectionId, SectionRecord>;

/// Order store persisted as one JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    sections: RwLock<SectionMap>,
}

impl JsonFileStore {
    /// Open the store at `path`.
    ///
    /// - **Missing file** opens an empty store (not an error).
    /// - **Corrupted file** returns [`StoreError::Json`].
    /// - **Version mismatch** returns [`StoreError::UnsupportedVersion`].
    /// - **Inconsistent order** returns [`StoreError::NotAPermutation`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sections = load(&path)?;
        tracing::debug!(
            target: "ordview.store",
            path = %path.display(),
            sections = sections.len(),
            "file store opened"
        );
        Ok(Self {
            path,
            sections: RwLock::new(sections),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> RwLockWriteGuard<'_, SectionMap> {
        self.sections.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Reload the document into the cache and keep the cache locked.
    fn refresh(&self) -> Result<RwLockWriteGuard<'_, SectionMap>> {
        let mut sections = self.write();
        *sections = load(&self.path)?;
        Ok(sections)
    }

    fn commit(
        &self,
        section: &SectionId,
        order: &[ItemId],
        expected: Option<Revision>,
    ) -> Result<Revision> {
        let mut sections = self.refresh()?;
        let current = sections
            .get(section)
            .ok_or_else(|| StoreError::UnknownSection(section.clone()))?;
        if let Some(expected) = expected
            && current.revision != expected
        {
            return Err(StoreError::RevisionConflict {
                section: section.clone(),
                expected,
                actual: current.revision,
            });
        }
        let validated = current.validate_order(order)?;

        let mut next = sections.clone();
        let revision = match next.get_mut(section) {
            Some(record) => record.replace_order(validated),
            None => return Err(StoreError::UnknownSection(section.clone())),
        };
        persist(&self.path, &next).inspect_err(|err| {
            tracing::warn!(
                target: "ordview.store",
                section = %section,
                error = %err,
                "save failed; prior order kept"
            );
        })?;
        *sections = next;
        tracing::debug!(
            target: "ordview.store",
            section = %section,
            revision = %revision,
            path = %self.path.display(),
            "order saved"
        );
        Ok(revision)
    }
}

impl OrderStore for JsonFileStore {
    fn section(&self, section: &SectionId) -> Result<SectionRecord> {
        self.refresh()?
            .get(section)
            .cloned()
            .ok_or_else(|| StoreError::UnknownSection(section.clone()))
    }

    fn sections(&self) -> Result<Vec<SectionSummary>> {
        Ok(self.refresh()?.values().map(SectionRecord::summary).collect())
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
        let mut next = SectionMap::new();
        for record in sections {
            check_record(&record)?;
            next.insert(record.id.clone(), record);
        }
        let mut guard = self.write();
        persist(&self.path, &next)?;
        *guard = next;
        Ok(())
    }
}

fn check_record(record: &SectionRecord) -> Result<()> {
    if let Some(order) = &record.order {
        record.validate_order(order.as_slice())?;
    }
    Ok(())
}

fn load(path: &Path) -> Result<SectionMap> {
    if !path.exists() {
        return Ok(SectionMap::new());
    }
    let contents = std::fs::read_to_string(path)?;
    let file: StoreFile = serde_json::from_str(&contents)?;
    if file.version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: file.version,
            expected: FORMAT_VERSION,
        });
    }
    let mut sections = SectionMap::new();
    for record in file.sections {
        check_record(&record)?;
        sections.insert(record.id.clone(), record);
    }
    Ok(sections)
}

/// Write-to-temp-then-rename. The parent directory must already exist.
fn persist(path: &Path, sections: &SectionMap) -> Result<()> {
    let file = StoreFile {
        version: FORMAT_VERSION,
        saved_at_ms: now_unix_ms(),
        sections: sections.values().cloned().collect(),
    };
    let json = serde_json::to_string_pretty(&file)?;
    let temp = path.with_extension("json.tmp");
    std::fs::write(&temp, json)?;
    if let Err(err) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(err.into());
    }
    Ok(())
}

fn now_unix_ms() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
