use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;

use pathbin_core::models::PathGraph;

use crate::aggregator::aggregate;
use crate::binner::PathBinner;
use crate::consts::DEFAULT_NUM_BINS;
use crate::errors::{BinningError, Result};
use crate::models::{BinLayout, BinRow, BinTable, GroupKey};

///
/// Options of a binning run.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BinningOptions {
    /// Bin count or bin width
    pub layout: BinLayout,
    /// Delimiter splitting path names into prefix and suffix
    pub delimiter: Option<String>,
    /// Fold paths sharing a prefix into one group
    pub aggregate: bool,
    /// Worker threads, the global rayon pool is used when unset
    pub threads: Option<usize>,
    /// Show a progress bar over paths
    pub progress: bool,
}

impl Default for BinningOptions {
    fn default() -> Self {
        BinningOptions {
            layout: BinLayout::Count(DEFAULT_NUM_BINS),
            delimiter: None,
            aggregate: false,
            threads: None,
            progress: false,
        }
    }
}

impl BinningOptions {
    pub fn with_bins(num_bins: u64) -> Self {
        BinningOptions {
            layout: BinLayout::Count(num_bins),
            ..Default::default()
        }
    }

    pub fn delimiter(mut self, delimiter: &str) -> Self {
        self.delimiter = Some(delimiter.to_string());
        self
    }

    pub fn aggregate(mut self, aggregate: bool) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    ///
    /// Reject configurations that cannot produce a meaningful table. Runs before
    /// any path is read.
    ///
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;

        if self.aggregate && self.delimiter.as_deref().is_none_or(str::is_empty) {
            return Err(BinningError::InvalidParameter(
                "aggregation by delimiter requires a non-empty delimiter".to_string(),
            ));
        }

        if self.threads == Some(0) {
            return Err(BinningError::InvalidParameter(
                "number of threads must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// Bin every path of a graph and optionally fold the rows into groups.
///
/// Paths are binned in parallel; the resulting rows keep the graph's path
/// enumeration order. The first failing path aborts the run.
///
/// # Arguments
/// - graph: the graph whose paths are binned
/// - options: binning options, validated before the graph is touched
pub fn produce_table<G: PathGraph>(graph: &G, options: &BinningOptions) -> Result<BinTable> {
    options.validate()?;

    match options.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| run(graph, options))
        }
        None => run(graph, options),
    }
}

fn run<G: PathGraph>(graph: &G, options: &BinningOptions) -> Result<BinTable> {
    let binner = PathBinner::new(graph, options.layout)?;
    let paths = graph.path_names();

    info!(
        "Binning {} paths over a {} bp graph ({})",
        paths.len(),
        graph.total_length(),
        options.layout
    );

    let bar = if options.progress {
        let bar = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} paths") {
            bar.set_style(style);
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let delimiter = options.delimiter.as_deref();
    let rows = paths
        .par_iter()
        .map(|name| -> Result<BinRow> {
            let bins = binner.bin_path(name)?;
            if bins.iter().all(|b| b.covered_length == 0) {
                warn!("Path {} has no covered bases", name);
            }
            bar.inc(1);

            Ok(BinRow {
                name: name.clone(),
                key: GroupKey::derive(name, delimiter, options.aggregate),
                bins,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    bar.finish_and_clear();

    aggregate(BinTable::new(options.layout, rows), options.aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pathbin_core::models::{NodeId, PathTraversalStep, VariationGraph};
    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::consts::NOT_APPLICABLE;

    #[fixture]
    fn pangenome() -> VariationGraph {
        let mut graph = VariationGraph::new();
        for (name, length) in [("1", 8), ("2", 4), ("3", 4), ("4", 8)] {
            graph.add_node(name, length).unwrap();
        }
        graph
            .add_path("sample1#hap1#chr1", [("1", false), ("2", false), ("4", false)])
            .unwrap();
        graph
            .add_path("sample1#hap2#chr1", [("1", false), ("3", true), ("4", false)])
            .unwrap();
        graph
            .add_path("sample2#hap1#chr1", [("4", true), ("3", true), ("1", true)])
            .unwrap();
        graph.add_path("reference", [("1", false), ("2", false), ("3", false), ("4", false)]).unwrap();
        graph
    }

    #[rstest]
    fn test_zero_bins_is_rejected_before_reading(pangenome: VariationGraph) {
        let result = produce_table(&pangenome, &BinningOptions::with_bins(0));
        let err = result.unwrap_err();
        assert!(matches!(err, BinningError::InvalidParameter(_)));
        assert!(err.is_configuration_error());
    }

    #[rstest]
    #[case(BinningOptions::with_bins(4).aggregate(true))]
    #[case(BinningOptions::with_bins(4).delimiter("").aggregate(true))]
    #[case(BinningOptions::with_bins(4).threads(0))]
    fn test_invalid_options(#[case] options: BinningOptions) {
        assert!(matches!(
            options.validate(),
            Err(BinningError::InvalidParameter(_))
        ));
    }

    #[rstest]
    fn test_per_path_table(pangenome: VariationGraph) {
        let options = BinningOptions::with_bins(4).delimiter("#");
        let table = produce_table(&pangenome, &options).unwrap();

        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["sample1#hap1#chr1", "sample1#hap2#chr1", "sample2#hap1#chr1", "reference"]
        );
        assert!(!table.grouped);
        for row in &table.rows {
            assert_eq!(row.bins.len(), 4);
            assert_eq!(row.key.prefix, NOT_APPLICABLE);
            assert_eq!(row.key.suffix, NOT_APPLICABLE);
        }

        let reversed = table.get("sample2#hap1#chr1").unwrap();
        assert!(reversed.bins.iter().all(|b| b.mean_orientation == 1.0));
        assert!(reversed.bins[0].mean_position > reversed.bins[3].mean_position);
    }

    #[rstest]
    fn test_grouped_table(pangenome: VariationGraph) {
        let options = BinningOptions::with_bins(4).delimiter("#").aggregate(true);
        let table = produce_table(&pangenome, &options).unwrap();

        let names: Vec<&str> = table.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sample1", "sample2", "reference"]);
        assert!(table.grouped);

        let sample1 = table.get("sample1").unwrap();
        assert_eq!(sample1.key, GroupKey::new("sample1", NOT_APPLICABLE));
        assert_eq!(sample1.bins.len(), 4);
        // 20 bp per haplotype, 5 bp per bin, two haplotypes
        assert!(sample1.bins.iter().all(|b| b.covered_length == 10));
        // hap2 walks node 3 in reverse at path offsets [8, 12)
        assert!(sample1.bins[2].mean_orientation > 0.0);
        assert_eq!(sample1.bins[0].mean_orientation, 0.0);

        assert!(table.get("reference").unwrap().key.is_not_applicable());
    }

    #[rstest]
    fn test_threads_and_idempotence(pangenome: VariationGraph) {
        let options = BinningOptions::with_bins(7).delimiter("#").aggregate(true);
        let first = produce_table(&pangenome, &options).unwrap();
        let second = produce_table(&pangenome, &options.clone().threads(3)).unwrap();
        let third = produce_table(&pangenome, &options.threads(1)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[rstest]
    fn test_width_layout(pangenome: VariationGraph) {
        let options = BinningOptions {
            layout: BinLayout::Width(6),
            ..Default::default()
        };
        let table = produce_table(&pangenome, &options).unwrap();

        // 20 bp haplotypes -> 4 bins, 24 bp reference -> 4 bins
        assert_eq!(table.get("sample1#hap1#chr1").unwrap().bins.len(), 4);
        assert_eq!(table.get("reference").unwrap().bins.len(), 4);
        assert_eq!(table.get("sample1#hap1#chr1").unwrap().bins[3].covered_length, 2);
    }

    #[rstest]
    fn test_unallocatable_bin_count_is_a_configuration_error(pangenome: VariationGraph) {
        let err = produce_table(&pangenome, &BinningOptions::with_bins(u64::MAX)).unwrap_err();
        assert!(matches!(err, BinningError::InvalidParameter(_)));
        assert!(err.is_configuration_error());
    }

    /// Two paths over a single 4 bp node; the second one steps onto a node the
    /// graph has no coordinate for.
    struct DanglingStepGraph;

    impl PathGraph for DanglingStepGraph {
        fn path_names(&self) -> Vec<String> {
            vec!["intact".to_string(), "dangling".to_string()]
        }

        fn traversal_steps(&self, path: &str) -> Option<impl Iterator<Item = PathTraversalStep> + '_> {
            let steps = match path {
                "intact" => vec![PathTraversalStep::forward(0, 4)],
                "dangling" => vec![PathTraversalStep::forward(0, 4), PathTraversalStep::reverse(1, 4)],
                _ => return None,
            };
            Some(steps.into_iter())
        }

        fn node_offset(&self, node: NodeId) -> Option<u64> {
            (node == 0).then_some(0)
        }

        fn total_length(&self) -> u64 {
            4
        }
    }

    #[rstest]
    #[case(BinningOptions::with_bins(2))]
    #[case(BinningOptions::with_bins(2).threads(2))]
    #[case(BinningOptions::with_bins(2).delimiter("#").aggregate(true))]
    fn test_failing_path_aborts_the_run(#[case] options: BinningOptions) {
        match produce_table(&DanglingStepGraph, &options) {
            Err(BinningError::GraphConsistency { path, node, .. }) => {
                assert_eq!(path, "dangling");
                assert_eq!(node, 1);
            }
            other => panic!("expected a graph consistency error, got {:?}", other),
        }
    }
}
