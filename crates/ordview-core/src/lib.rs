#![forbid(unsafe_code)]

//! Core value types for ordview.
//!
//! A *section* owns exactly one authoritative ordering of its items (the
//! [`FullOrder`]). Users edit that ordering through a *filtered view*: the
//! subsequence of items whose categorical [`Attributes`] satisfy the active
//! [`FilterPredicate`]. This crate holds the identifiers, the attribute and
//! predicate types, the attribute catalog seam, and the projector that derives
//! a filtered view from a full order.
//!
//! # Role in ordview
//! `ordview-core` is the leaf crate. The reconciliation engine
//! (`ordview-reconcile`), the store (`ordview-store`), and the drag machine
//! (`ordview-interaction`) all speak in these types.

pub mod attributes;
pub mod catalog;
pub mod filter;
pub mod id;
pub mod order;
pub mod project;

pub use attributes::{
    Attributes, Dimension, Geography, ParticipantCategory, ReviewCategory, UnknownDimension,
};
pub use catalog::AttributeCatalog;
pub use filter::FilterPredicate;
pub use id::{ItemId, SectionId};
pub use order::{FullOrder, OrderError};
pub use project::{project, project_order};
