use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use pathbin_core::models::{PathGraph, VariationGraph};

use crate::error::{GfaError, Result};
use crate::utils::get_dynamic_reader;

const SEGMENT_LENGTH_TAG: &str = "LN:i:";
const MISSING_FIELD: &str = "*";

type Steps = Vec<(String, bool)>;

///
/// Read a variation graph from a GFA file.
///
/// The file may be gzip'd; `-` reads from stdin.
///
/// # Arguments
/// - path: path to the GFA file
pub fn read_gfa<P: AsRef<Path>>(path: P) -> Result<VariationGraph> {
    let path = path.as_ref();
    info!("Loading graph from {}", path.display());

    let reader = get_dynamic_reader(path)?;
    parse_gfa(reader)
}

///
/// Parse GFA 1.x records into a variation graph.
///
/// Segments (`S`) become nodes in file order, so their cumulative lengths define
/// the graph's linear coordinates. Paths (`P`) and walks (`W`) become paths; a
/// walk is named `sample#haplotype#sequence`. Paths may reference segments
/// declared later in the file. All other record types are skipped.
///
/// # Arguments
/// - reader: buffered reader over the GFA text
pub fn parse_gfa<R: BufRead>(reader: R) -> Result<VariationGraph> {
    let mut graph = VariationGraph::new();
    let mut paths: Vec<(String, Steps)> = Vec::new();

    for (ind, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = ind + 1;
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        match fields[0] {
            "S" => {
                let (name, length) = parse_segment(&fields, line_no)?;
                graph.add_node(name, length)?;
            }
            "P" => paths.push(parse_path(&fields, line_no)?),
            "W" => paths.push(parse_walk(&fields, line_no)?),
            _ => {}
        }
    }

    debug!("Resolving {} paths over {} segments", paths.len(), graph.node_count());
    for (name, steps) in paths {
        graph.add_path(&name, steps)?;
    }

    info!(
        "Loaded {} segments ({} bp) and {} paths",
        graph.node_count(),
        graph.total_length(),
        graph.path_count()
    );

    Ok(graph)
}

fn parse_error(line: usize, reason: impl Into<String>) -> GfaError {
    GfaError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_segment<'a>(fields: &[&'a str], line: usize) -> Result<(&'a str, u64)> {
    if fields.len() < 3 {
        return Err(parse_error(line, "segment record needs a name and a sequence"));
    }

    let name = fields[1];
    let sequence = fields[2];
    if sequence != MISSING_FIELD {
        return Ok((name, sequence.len() as u64));
    }

    let tag = fields[3..]
        .iter()
        .find_map(|f| f.strip_prefix(SEGMENT_LENGTH_TAG))
        .ok_or_else(|| parse_error(line, format!("segment {name} has no sequence and no LN tag")))?;
    let length = tag
        .parse::<u64>()
        .map_err(|e| parse_error(line, format!("invalid LN tag on segment {name}: {e}")))?;

    Ok((name, length))
}

fn parse_path(fields: &[&str], line: usize) -> Result<(String, Steps)> {
    if fields.len() < 3 {
        return Err(parse_error(line, "path record needs a name and a segment list"));
    }

    let name = fields[1].to_string();
    if fields[2] == MISSING_FIELD {
        return Ok((name, Vec::new()));
    }

    let steps = fields[2]
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|step| {
            if let Some(node) = step.strip_suffix('+') {
                Ok((node.to_string(), false))
            } else if let Some(node) = step.strip_suffix('-') {
                Ok((node.to_string(), true))
            } else {
                Err(parse_error(line, format!("step {step} has no orientation")))
            }
        })
        .collect::<Result<Steps>>()?;

    Ok((name, steps))
}

fn parse_walk(fields: &[&str], line: usize) -> Result<(String, Steps)> {
    if fields.len() < 7 {
        return Err(parse_error(line, "walk record needs sample, haplotype, sequence, start, end and walk"));
    }

    let name = format!("{}#{}#{}", fields[1], fields[2], fields[3]);
    let walk = fields[6];
    if walk == MISSING_FIELD {
        return Ok((name, Vec::new()));
    }

    let mut steps = Steps::new();
    let mut rest = walk;
    while !rest.is_empty() {
        let is_reverse = match rest.as_bytes()[0] {
            b'>' => false,
            b'<' => true,
            _ => return Err(parse_error(line, format!("walk of {name} has a step without orientation"))),
        };
        rest = &rest[1..];
        let end = rest.find(['>', '<']).unwrap_or(rest.len());
        if end == 0 {
            return Err(parse_error(line, format!("walk of {name} has an empty segment name")));
        }
        steps.push((rest[..end].to_string(), is_reverse));
        rest = &rest[end..];
    }

    Ok((name, steps))
}
