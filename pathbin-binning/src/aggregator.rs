//! Delimiter-based path grouping.
//!
//! Path names such as `sample1#hap1#chr1` are split at the first delimiter into a
//! [`GroupKey`]. When aggregation is enabled, paths sharing a prefix are folded
//! into a single row whose bins are the covered-length weighted means of the
//! members' bins.

use fxhash::FxHashMap;
use log::{debug, info};
use rayon::prelude::*;

use crate::consts::NOT_APPLICABLE;
use crate::errors::{BinningError, Result};
use crate::models::{BinLayout, BinRow, BinStat, BinTable, GroupKey};

impl GroupKey {
    ///
    /// Derive the key of a path name.
    ///
    /// The name is split at the first occurrence of the delimiter. Both fields
    /// are the sentinel when aggregation is disabled, when no (or an empty)
    /// delimiter is configured, or when the name does not contain it.
    ///
    /// # Arguments
    /// - name: the path name
    /// - delimiter: optional delimiter string
    /// - aggregate: whether aggregation by delimiter is enabled
    pub fn derive(name: &str, delimiter: Option<&str>, aggregate: bool) -> Self {
        if !aggregate {
            return GroupKey::not_applicable();
        }

        match delimiter
            .filter(|d| !d.is_empty())
            .and_then(|d| name.split_once(d))
        {
            Some((prefix, suffix)) => GroupKey::new(prefix, suffix),
            None => GroupKey::not_applicable(),
        }
    }

    ///
    /// Name of the group a path is folded into: the prefix, or the full path
    /// name when the path carries no key.
    ///
    pub fn group_name<'a>(&'a self, path: &'a str) -> &'a str {
        if self.is_not_applicable() {
            path
        } else {
            &self.prefix
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct RunningMean {
    weight: u64,
    coverage: f64,
    orientation: f64,
    position: f64,
}

impl RunningMean {
    fn update(&mut self, bin: &BinStat) {
        if bin.covered_length == 0 {
            return;
        }

        self.weight += bin.covered_length;
        let share = bin.covered_length as f64 / self.weight as f64;
        self.coverage += share * (bin.mean_coverage - self.coverage);
        self.orientation += share * (bin.mean_orientation - self.orientation);
        self.position += share * (bin.mean_position - self.position);
    }

    fn finish(&self, bin_index: u64) -> BinStat {
        BinStat {
            bin_index,
            mean_coverage: self.coverage,
            mean_orientation: self.orientation,
            mean_position: self.position,
            covered_length: self.weight,
        }
    }
}

///
/// Accumulator of a single group. Members are folded one by one, in path order.
///
#[derive(Debug)]
pub struct GroupAccumulator {
    name: String,
    layout: BinLayout,
    bins: Vec<RunningMean>,
    members: usize,
}

impl GroupAccumulator {
    pub fn new(name: &str, layout: BinLayout) -> Self {
        GroupAccumulator {
            name: name.to_string(),
            layout,
            bins: Vec::new(),
            members: 0,
        }
    }

    ///
    /// Fold the bins of one member path into the group, aligned by bin index.
    ///
    /// With a fixed bin count all members must agree on it. With a fixed bin
    /// width the bins are aligned windows, so the longest member sets the
    /// group's bin count and shorter members add no weight past their end.
    ///
    pub fn fold(&mut self, bins: &[BinStat]) -> Result<()> {
        match self.layout {
            BinLayout::Count(_) if self.members > 0 && bins.len() != self.bins.len() => {
                return Err(BinningError::GroupBinCountMismatch {
                    group: self.name.clone(),
                    expected: self.bins.len(),
                    found: bins.len(),
                });
            }
            _ => {}
        }

        if bins.len() > self.bins.len() {
            self.bins.resize(bins.len(), RunningMean::default());
        }
        for (acc, bin) in self.bins.iter_mut().zip(bins) {
            acc.update(bin);
        }
        self.members += 1;

        Ok(())
    }

    pub fn members(&self) -> usize {
        self.members
    }

    pub fn finish(self) -> Vec<BinStat> {
        self.bins
            .iter()
            .enumerate()
            .map(|(i, acc)| acc.finish(i as u64 + 1))
            .collect()
    }
}

///
/// Fold a per-path table into a per-group table.
///
/// When `aggregate` is false the table is returned unchanged. Otherwise rows are
/// grouped by [`GroupKey::group_name`]; groups appear in the order of their first
/// member and are folded in parallel, one task per group.
///
/// # Arguments
/// - table: the per-path table, rows annotated with their derived keys
/// - aggregate: whether to fold paths into groups
pub fn aggregate(table: BinTable, aggregate: bool) -> Result<BinTable> {
    if !aggregate || table.grouped {
        return Ok(table);
    }

    let layout = table.layout;
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut groups: Vec<(String, bool, Vec<BinRow>)> = Vec::new();

    for row in table.rows {
        let group = row.key.group_name(&row.name).to_string();
        let keyed = !row.key.is_not_applicable();
        match index.get(&group) {
            Some(&ind) => groups[ind].2.push(row),
            None => {
                index.insert(group.clone(), groups.len());
                groups.push((group, keyed, vec![row]));
            }
        }
    }

    info!("Folding paths into {} groups", groups.len());

    let rows = groups
        .into_par_iter()
        .map(|(group, keyed, members)| -> Result<BinRow> {
            let mut acc = GroupAccumulator::new(&group, layout);
            for member in &members {
                acc.fold(&member.bins)?;
            }
            debug!("Group {} folded {} paths", group, acc.members());

            let key = if keyed {
                GroupKey::new(&group, NOT_APPLICABLE)
            } else {
                GroupKey::not_applicable()
            };
            Ok(BinRow {
                name: group,
                key,
                bins: acc.finish(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BinTable {
        layout,
        grouped: true,
        rows,
    })
}
