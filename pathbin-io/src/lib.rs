//! # Input/Output utilities for variation graphs and bin tables.
//!
//! This small crate reads variation graphs from GFA files (plain or gzip'd, or from
//! stdin) into a [`pathbin_core::models::VariationGraph`], and writes bin tables as
//! tab-separated reports.
//!
pub mod error;
pub mod gfa;
pub mod tsv;
pub mod utils;

// re-expose core functions
pub use error::*;
pub use gfa::*;
pub use tsv::*;
pub use utils::*;
