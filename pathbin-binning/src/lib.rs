//! Positional binning of variation graph paths.
//!
//! This crate summarises how each path of a variation graph traverses the graph,
//! in a fixed number of positional bins per path:
//!
//! - mean coverage of every bin,
//! - the fraction of the bin traversed on the reverse strand,
//! - the mean absolute graph coordinate covered by the bin.
//!
//! Paths can be grouped by the prefix of their name before a delimiter (for example
//! the sample in `sample#haplotype#contig`), in which case the bins of all paths in
//! a group are folded into covered-length weighted means.
//!
//! # Example
//!
//! ```no_run
//! use pathbin_binning::{produce_table, BinningOptions};
//! use pathbin_core::models::VariationGraph;
//!
//! let mut graph = VariationGraph::new();
//! graph.add_node("1", 10).unwrap();
//! graph.add_path("sample1#hap1#chr1", [("1", false)]).unwrap();
//!
//! let options = BinningOptions::with_bins(2).delimiter("#").aggregate(true);
//! let table = produce_table(&graph, &options).unwrap();
//! ```

pub mod aggregator;
pub mod binner;
pub mod consts;
pub mod engine;
pub mod errors;
pub mod models;

// re-exports
pub use aggregator::{GroupAccumulator, aggregate};
pub use binner::PathBinner;
pub use engine::{BinningOptions, produce_table};
pub use errors::BinningError;
pub use models::{BinLayout, BinRow, BinStat, BinTable, GroupKey};
