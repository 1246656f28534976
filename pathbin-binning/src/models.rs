use std::fmt::{self, Display};

use crate::consts::NOT_APPLICABLE;
use crate::errors::{BinningError, Result};

/// How a path's traversed length is partitioned into bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinLayout {
    /// Exactly `n` bins per path, boundaries at `floor(i * length / n)`.
    Count(u64),
    /// Bins of `w` bases each, the last one possibly shorter.
    Width(u64),
}

impl BinLayout {
    pub fn validate(&self) -> Result<()> {
        match self {
            BinLayout::Count(0) => Err(BinningError::InvalidParameter(
                "number of bins must be at least 1".to_string(),
            )),
            BinLayout::Width(0) => Err(BinningError::InvalidParameter(
                "bin width must be at least 1".to_string(),
            )),
            BinLayout::Count(n) if usize::try_from(*n).is_err() => Err(
                BinningError::InvalidParameter(format!("{} bins do not fit in memory", n)),
            ),
            _ => Ok(()),
        }
    }

    ///
    /// Number of bins produced for a path of the given length. Fails when the
    /// count does not fit the platform's address space.
    ///
    pub fn num_bins(&self, length: u64) -> Result<usize> {
        let n = match *self {
            BinLayout::Count(n) => n,
            BinLayout::Width(w) => length.div_ceil(w).max(1),
        };
        usize::try_from(n).map_err(|_| {
            BinningError::InvalidParameter(format!("{} bins do not fit in memory", n))
        })
    }

    ///
    /// Path-local start of bin `index` (0-based). `boundary(num_bins)` equals `length`.
    ///
    /// # Arguments
    /// - index: bin index, `0..=num_bins`
    /// - length: traversed length of the path
    pub fn boundary(&self, index: usize, length: u64) -> u64 {
        match *self {
            BinLayout::Count(n) => ((index as u128 * length as u128) / n as u128) as u64,
            BinLayout::Width(w) => (index as u64).saturating_mul(w).min(length),
        }
    }

    ///
    /// Length of bin `index` (0-based).
    ///
    pub fn bin_length(&self, index: usize, length: u64) -> u64 {
        self.boundary(index + 1, length) - self.boundary(index, length)
    }
}

impl Display for BinLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinLayout::Count(n) => write!(f, "{} bins per path", n),
            BinLayout::Width(w) => write!(f, "bins of {} bp", w),
        }
    }
}

///
/// Statistics of one bin of one path (or one group of paths).
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinStat {
    /// 1-based position among the path's bins, in traversal order
    pub bin_index: u64,
    /// Covered bases divided by the bin length
    pub mean_coverage: f64,
    /// Fraction of the covered bases traversed on the reverse strand
    pub mean_orientation: f64,
    /// Mean absolute graph coordinate of the covered bases
    pub mean_position: f64,
    /// Number of covered bases, used as the weight when folding paths together
    pub covered_length: u64,
}

impl BinStat {
    pub fn is_covered(&self) -> bool {
        self.mean_coverage > 0.0
    }
}

///
/// Prefix/suffix pair derived from a path name by splitting at the first
/// occurrence of a delimiter.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub prefix: String,
    pub suffix: String,
}

impl GroupKey {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        GroupKey {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    ///
    /// The "ungrouped" key: both fields set to the sentinel.
    ///
    pub fn not_applicable() -> Self {
        GroupKey::new(NOT_APPLICABLE, NOT_APPLICABLE)
    }

    pub fn is_not_applicable(&self) -> bool {
        self.prefix == NOT_APPLICABLE && self.suffix == NOT_APPLICABLE
    }
}

impl Default for GroupKey {
    fn default() -> Self {
        GroupKey::not_applicable()
    }
}

///
/// One row group of the output table: a path (or a group of paths) and its bins.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinRow {
    pub name: String,
    pub key: GroupKey,
    pub bins: Vec<BinStat>,
}

///
/// Ordered mapping from path (or group) name to its bins. Row order follows the
/// graph's path enumeration order, groups follow the order of their first member.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinTable {
    pub layout: BinLayout,
    pub grouped: bool,
    pub rows: Vec<BinRow>,
}

impl BinTable {
    pub fn new(layout: BinLayout, rows: Vec<BinRow>) -> Self {
        BinTable {
            layout,
            grouped: false,
            rows,
        }
    }

    pub fn get(&self, name: &str) -> Option<&BinRow> {
        self.rows.iter().find(|row| row.name == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    ///
    /// Iterate every bin of every row, in table order.
    ///
    pub fn iter_bins(&self) -> impl Iterator<Item = (&BinRow, &BinStat)> {
        self.rows
            .iter()
            .flat_map(|row| row.bins.iter().map(move |bin| (row, bin)))
    }
}
