#![forbid(unsafe_code)]

//! ordview public facade crate.
//!
//! Re-exports the common types of the component crates and offers a
//! prelude for wiring a reorder screen:
//!
//! ```no_run
//! use ordview::prelude::*;
//!
//! fn run() -> ordview::Result<()> {
//!     let store = MemoryOrderStore::with_sections(demo_sections()?);
//!     let section = SectionId::new("sec-1");
//!     let catalog = store.catalog(&section)?;
//!     let mut session = ReorderSession::new(&store, catalog, ScreenConfig::default());
//!     session.set_predicate(FilterPredicate::ANY.with_participant("XY"));
//!     session.drag_start(ItemId::new("sec-1-xy-q5"), section.clone())?;
//!     session.drop_on(ItemId::new("sec-1-xy-q1"), section)?;
//!     session.confirm()?;
//!     Ok(())
//! }
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use ordview_core::{
    AttributeCatalog, Attributes, Dimension, FilterPredicate, FullOrder, ItemId, OrderError,
    SectionId, project, project_order,
};

// --- Reconcile re-exports --------------------------------------------------

pub use ordview_reconcile::{
    DropMode, FilteredMove, MoveKind, NoopReason, ReconcileChange, ReconcileOutcome,
    ReconcilePolicy, apply_drop, apply_shift, apply_swap, detect_move, move_within_view, reconcile,
};

// --- Store re-exports ------------------------------------------------------

pub use ordview_store::{
    JsonFileStore, MemoryOrderStore, OrderStore, Revision, SaveRetry, SectionRecord,
    StoreError, StoreSnapshot, demo_sections, reset_with_demo_data,
};

// --- Interaction re-exports ------------------------------------------------

pub use ordview_interaction::{
    CommitError, CommitReport, ConfigError, DragMachine, DragState, ReorderSession, ScreenConfig,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for ordview applications.
#[derive(Debug)]
pub enum Error {
    /// Reading or writing an order store failed.
    Store(StoreError),
    /// A drop could not be committed.
    Commit(CommitError),
    /// Screen configuration could not be loaded.
    Config(ConfigError),
    /// An order contained duplicates.
    Order(OrderError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Commit(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Order(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Commit(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Order(err) => Some(err),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<CommitError> for Error {
    fn from(err: CommitError) -> Self {
        Self::Commit(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<OrderError> for Error {
    fn from(err: OrderError) -> Self {
        Self::Order(err)
    }
}

/// Standard result type for ordview APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AttributeCatalog, Attributes, CommitReport, Error, FilterPredicate, FullOrder, ItemId,
        JsonFileStore, MemoryOrderStore, OrderStore, ReconcilePolicy, ReorderSession, Result,
        ScreenConfig, SectionId, demo_sections,
    };

    pub use crate::{core, interaction, reconcile, store};
}

pub use ordview_core as core;
pub use ordview_interaction as interaction;
pub use ordview_reconcile as reconcile;
pub use ordview_store as store;
