use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use pathbin_binning::BinTable;

/// Column header of a bin report.
pub const TSV_HEADER: [&str; 7] = [
    "path.name",
    "path.prefix",
    "path.suffix",
    "bin",
    "mean.cov",
    "mean.inv",
    "mean.pos",
];

pub trait BinTableWrite {
    ///
    /// Write the table as a tab-separated report, one line per bin.
    ///
    /// # Arguments
    /// - writer: destination of the report
    /// - include_empty: also write bins with zero mean coverage
    fn write_tsv<W: Write>(&self, writer: &mut W, include_empty: bool) -> std::io::Result<()>;

    ///
    /// Write the report to a file, creating parent directories as needed.
    ///
    /// # Arguments
    /// - path: the path to the file to dump to
    /// - include_empty: also write bins with zero mean coverage
    fn write_tsv_file<T: AsRef<Path>>(&self, path: T, include_empty: bool) -> std::io::Result<()>;
}

impl BinTableWrite for BinTable {
    fn write_tsv<W: Write>(&self, writer: &mut W, include_empty: bool) -> std::io::Result<()> {
        writeln!(writer, "{}", TSV_HEADER.join("\t"))?;

        for (row, bin) in self.iter_bins() {
            if !include_empty && !bin.is_covered() {
                continue;
            }
            writeln!(
                writer,
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.name,
                row.key.prefix,
                row.key.suffix,
                bin.bin_index,
                bin.mean_coverage,
                bin.mean_orientation,
                bin.mean_position
            )?;
        }

        writer.flush()
    }

    fn write_tsv_file<T: AsRef<Path>>(&self, path: T, include_empty: bool) -> std::io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_tsv(&mut writer, include_empty)
    }
}
