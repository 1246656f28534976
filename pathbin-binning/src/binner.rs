//! Positional binning of a single path.
//!
//! A path's traversed bases are laid out in path-local coordinates `[0, length)`
//! and split into the bins of a [`BinLayout`]. The steps and the bins are walked
//! together in one pass: every overlap between a step and a bin adds its length
//! to the bin's coverage, to its reverse-strand tally when the step is reverse,
//! and its absolute graph coordinates to the position sum.

use log::debug;

use pathbin_core::models::{PathGraph, PathTraversalStep};

use crate::errors::{BinningError, Result};
use crate::models::{BinLayout, BinStat};

#[derive(Debug, Clone, Default)]
struct BinAccumulator {
    coverage: u64,
    reverse: u64,
    // twice the sum of overlap * midpoint, kept integral so results are exact
    position_x2: u128,
}

impl BinAccumulator {
    ///
    /// Add `overlap` bases of a step whose graph span starts at `graph_start`.
    /// Returns `None` when the position sum leaves the u128 range.
    ///
    fn add(&mut self, graph_start: u64, overlap: u64, is_reverse: bool) -> Option<()> {
        // graph_start + overlap fits u64, so each term stays below 2^128
        let (start, span) = (graph_start as u128, overlap as u128);
        self.position_x2 = self
            .position_x2
            .checked_add(span * (2 * start + span))?;

        self.coverage += overlap;
        if is_reverse {
            self.reverse += overlap;
        }
        Some(())
    }

    fn finish(&self, bin_index: u64, bin_length: u64) -> BinStat {
        if self.coverage == 0 || bin_length == 0 {
            return BinStat {
                bin_index,
                ..Default::default()
            };
        }

        let covered = self.coverage as f64;
        BinStat {
            bin_index,
            mean_coverage: covered / bin_length as f64,
            mean_orientation: self.reverse as f64 / covered,
            mean_position: self.position_x2 as f64 / (2.0 * covered),
            covered_length: self.coverage,
        }
    }
}

///
/// Bins the traversal steps of one path.
///
/// Holds the graph-wide context needed to turn node handles into absolute
/// coordinates, so the same binner can be shared by all worker threads.
///
pub struct PathBinner<'g, G: PathGraph> {
    graph: &'g G,
    layout: BinLayout,
    total_graph_length: u64,
}

impl<'g, G: PathGraph> PathBinner<'g, G> {
    pub fn new(graph: &'g G, layout: BinLayout) -> Result<Self> {
        layout.validate()?;
        Ok(PathBinner {
            graph,
            layout,
            total_graph_length: graph.total_length(),
        })
    }

    ///
    /// Compute the bins of a path.
    ///
    /// # Arguments
    /// - path: name of a path enumerated by the graph
    pub fn bin_path(&self, path: &str) -> Result<Vec<BinStat>> {
        let length = self
            .graph
            .path_length(path)?
            .ok_or_else(|| BinningError::UnknownPath(path.to_string()))?;
        let steps = self
            .graph
            .traversal_steps(path)
            .ok_or_else(|| BinningError::UnknownPath(path.to_string()))?;

        debug!("Binning path {} ({} bp, {})", path, length, self.layout);

        self.bin_steps(path, steps, length)
    }

    ///
    /// Compute the bins of an arbitrary step sequence whose lengths sum to `length`.
    ///
    pub fn bin_steps(
        &self,
        path: &str,
        steps: impl Iterator<Item = PathTraversalStep>,
        length: u64,
    ) -> Result<Vec<BinStat>> {
        let num_bins = self.layout.num_bins(length)?;
        let mut accumulators = Vec::new();
        accumulators.try_reserve_exact(num_bins).map_err(|e| {
            BinningError::InvalidParameter(format!("cannot allocate {} bins: {}", num_bins, e))
        })?;
        accumulators.resize(num_bins, BinAccumulator::default());

        let mut bin = 0;
        let mut bin_end = self.layout.boundary(1, length);
        let mut offset = 0u64;

        for step in steps {
            let node_start = self.node_start(path, &step)?;
            if step.length == 0 {
                continue;
            }

            let step_end = offset
                .checked_add(step.length)
                .filter(|&end| end <= length)
                .ok_or_else(|| BinningError::LengthMismatch {
                    path: path.to_string(),
                    expected: length,
                    found: offset.saturating_add(step.length),
                })?;

            let mut cursor = offset;
            while cursor < step_end {
                // empty bins are skipped, they keep zero coverage
                while bin_end <= cursor {
                    bin += 1;
                    bin_end = self.layout.boundary(bin + 1, length);
                }

                let end = step_end.min(bin_end);
                let overlap = end - cursor;
                let graph_start = if step.is_reverse {
                    node_start + (step_end - end)
                } else {
                    node_start + (cursor - offset)
                };
                accumulators[bin]
                    .add(graph_start, overlap, step.is_reverse)
                    .ok_or_else(|| BinningError::GraphConsistency {
                        path: path.to_string(),
                        node: step.node,
                        reason: format!("position sum of bin {} overflows", bin + 1),
                    })?;

                cursor = end;
            }

            offset = step_end;
        }

        if offset != length {
            return Err(BinningError::LengthMismatch {
                path: path.to_string(),
                expected: length,
                found: offset,
            });
        }

        Ok(accumulators
            .iter()
            .enumerate()
            .map(|(i, acc)| acc.finish(i as u64 + 1, self.layout.bin_length(i, length)))
            .collect())
    }

    // absolute coordinate of the step's node, validated against the graph's extent
    fn node_start(&self, path: &str, step: &PathTraversalStep) -> Result<u64> {
        let start = self
            .graph
            .node_offset(step.node)
            .ok_or_else(|| BinningError::GraphConsistency {
                path: path.to_string(),
                node: step.node,
                reason: "node is outside the graph".to_string(),
            })?;

        let within_graph = start
            .checked_add(step.length)
            .is_some_and(|end| end <= self.total_graph_length);
        if !within_graph {
            return Err(BinningError::GraphConsistency {
                path: path.to_string(),
                node: step.node,
                reason: format!(
                    "node of {} bp at {} runs beyond the graph length of {} bp",
                    step.length, start, self.total_graph_length
                ),
            });
        }

        Ok(start)
    }
}
