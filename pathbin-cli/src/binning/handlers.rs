use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use pathbin_binning::consts::DEFAULT_NUM_BINS;
use pathbin_binning::{BinLayout, BinningOptions, produce_table};
use pathbin_io::{BinTableWrite, read_gfa};

///
/// Map command-line options onto validated binning options.
///
pub fn get_binning_options(matches: &ArgMatches) -> Result<BinningOptions> {
    let layout = match matches.get_one::<u64>("bin-width") {
        Some(&width) => BinLayout::Width(width),
        None => BinLayout::Count(
            matches
                .get_one::<u64>("num-bins")
                .copied()
                .unwrap_or(DEFAULT_NUM_BINS),
        ),
    };

    let options = BinningOptions {
        layout,
        delimiter: matches.get_one::<String>("path-delim").cloned(),
        aggregate: matches.get_flag("aggregate-delim"),
        threads: matches.get_one::<usize>("threads").copied(),
        progress: matches.get_flag("progress"),
    };
    options.validate().context("Invalid binning options")?;

    Ok(options)
}

pub fn run_bin(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("idx")
        .context("An input graph is required")?;
    let include_empty = matches.get_flag("include-empty");

    let options = get_binning_options(matches)?;

    let graph = read_gfa(input).with_context(|| format!("Failed to load graph from {}", input))?;
    let table = produce_table(&graph, &options).context("Failed to bin paths")?;

    match matches.get_one::<String>("out") {
        Some(out) => {
            table
                .write_tsv_file(out, include_empty)
                .with_context(|| format!("Failed to write report to {}", out))?;
            info!("Wrote {} rows to {}", table.len(), out);
        }
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            table
                .write_tsv(&mut writer, include_empty)
                .context("Failed to write report to stdout")?;
        }
    }

    Ok(())
}
