/// Placeholder reported in the prefix/suffix columns of ungrouped rows.
pub const NOT_APPLICABLE: &str = "NA";

pub const DEFAULT_NUM_BINS: u64 = 10;
