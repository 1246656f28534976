use clap::{Arg, ArgAction, Command, value_parser};

pub const BIN_CMD: &str = "bin";

pub fn create_bin_cli() -> Command {
    Command::new(BIN_CMD)
        .about("Bin the paths of a variation graph and report per-bin coverage, inversion and position.")
        .arg(
            Arg::new("idx")
                .short('i')
                .long("idx")
                .value_name("FILE")
                .required(true)
                .help("Input graph in GFA format, optionally gzip'd; '-' reads from stdin"),
        )
        .arg(
            Arg::new("out")
                .short('o')
                .long("out")
                .value_name("FILE")
                .help("Write the TSV report to this file (default: stdout)"),
        )
        .arg(
            Arg::new("path-delim")
                .short('D')
                .long("path-delim")
                .value_name("STRING")
                .help("Delimiter splitting path names into prefix and suffix at its first occurrence; takes effect with -a, otherwise both columns report NA"),
        )
        .arg(
            Arg::new("aggregate-delim")
                .short('a')
                .long("aggregate-delim")
                .action(ArgAction::SetTrue)
                .requires("path-delim")
                .help("Fold paths sharing the prefix before the delimiter into one group"),
        )
        .arg(
            Arg::new("num-bins")
                .short('n')
                .long("num-bins")
                .value_name("N")
                .value_parser(value_parser!(u64))
                .conflicts_with("bin-width")
                .help("Number of bins per path [default: 10]"),
        )
        .arg(
            Arg::new("bin-width")
                .short('w')
                .long("bin-width")
                .value_name("BP")
                .value_parser(value_parser!(u64))
                .help("Width of each bin in bp, instead of a fixed number of bins"),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of threads (default: all cores)"),
        )
        .arg(
            Arg::new("include-empty")
                .long("include-empty")
                .action(ArgAction::SetTrue)
                .help("Also report bins with zero coverage"),
        )
        .arg(
            Arg::new("progress")
                .short('P')
                .long("progress")
                .action(ArgAction::SetTrue)
                .help("Show a progress bar over paths"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase logging verbosity (-v info, -vv debug)"),
        )
}
