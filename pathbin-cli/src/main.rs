mod binning;

use anyhow::Result;
use clap::Command;
use log::LevelFilter;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "pathbin";
    pub const BIN_NAME: &str = "pathbin";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Positional summaries of the paths of a variation graph.")
        .subcommand_required(true)
        .subcommand(binning::cli::create_bin_cli())
}

fn init_logger(verbosity: u8) {
    env_logger::Builder::new()
        .filter_level(match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        })
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // PATH BINNING
        //
        Some((binning::cli::BIN_CMD, matches)) => {
            init_logger(matches.get_count("verbose"));
            binning::handlers::run_bin(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
