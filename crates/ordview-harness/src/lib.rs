#![forbid(unsafe_code)]

//! Command-line reference application for ordview.
//!
//! Works against a [`JsonFileStore`](ordview::JsonFileStore) document:
//!
//! ```text
//! ordview seed --store orders.json
//! ordview show --store orders.json --section sec-1 --filter participant=XY
//! ordview drag --store orders.json --section sec-1 \
//!     --item sec-1-xy-q5 --target sec-1-xy-q1 --filter participant=XY --yes
//! ordview export --store orders.json --output snapshot.json
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::{Cli, Commands, run, run_from_env, run_with_output};
pub use error::{HarnessError, Result};
