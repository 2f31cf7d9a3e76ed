#![forbid(unsafe_code)]

//! Section-keyed order storage for ordview.
//!
//! Every section owns one full order. [`OrderStore`] is the only way to read
//! or replace it; a save swaps the whole order or nothing. Two backends ship
//! here:
//!
//! - [`MemoryOrderStore`]: `RwLock`-guarded, with a fault-injection hook for
//!   exercising the save-failure path.
//! - [`JsonFileStore`]: one JSON document written with temp-file-then-rename.
//!
//! Sections that have never been saved read back in item-id order.

pub mod error;
pub mod file;
pub mod memory;
pub mod retry;
pub mod section;
pub mod seed;
pub mod snapshot;
pub mod store;

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryOrderStore;
pub use retry::{SaveBackoff, SaveRetry};
pub use section::{ItemRecord, ItemStatus, Revision, SectionRecord, SectionSummary};
pub use seed::{demo_sections, reset_with_demo_data};
pub use snapshot::{OrderRow, SnapshotItem, SnapshotSection, StoreSnapshot};
pub use store::OrderStore;
