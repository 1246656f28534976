//! # Core models for pathbin
//!
//! Variation graphs are consumed only through their embedded paths: each path is an
//! ordered sequence of [`models::PathTraversalStep`]s, and every node has an absolute
//! coordinate in the graph's linear layout. The [`models::PathGraph`] trait captures
//! that capability; [`models::VariationGraph`] is the in-memory implementation used by
//! the GFA loader and the tests.
pub mod errors;
pub mod models;

pub use errors::GraphError;
