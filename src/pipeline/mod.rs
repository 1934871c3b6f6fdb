//! The conversion pipeline:
//!
//! ```text
//! load (+dedup) -> sort nodes, edges by second -> pass 1 (relabel second, degrees, mapping)
//!               -> sort edges by first -> pass 2 (relabel first, write) -> done
//! ```
//!
//! Every stage consumes the output of the previous one exactly once, in sorted
//! order. Only the node collection is read twice.

pub mod dedup;
pub mod files;
mod load;
pub mod relabel;

pub use dedup::{DedupFilter, DedupSummary};
pub use files::{convert_files, FileConversion};

use std::{io::Write, time::Instant};

use anyhow::Context;
use tracing::{debug, info};

use crate::{
    edgelist::EdgeSink,
    extsort::{ExternalSorter, SorterConfig},
    graph::*,
    report::ConversionReport,
};

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub remove_multi_edges: bool,
    pub sorter: SorterConfig,
}

/// Relabels `edges` to dense ranks and forwards them, sorted by `(first, second)`,
/// to the sink returned by `open_output`.
///
/// `expected_edges` is only used for progress reports. `open_output` is called
/// once the final number of edges is known and receives it as size hint. If
/// `mapping` is given, it receives the original id of every node in rank order.
pub fn convert<I, S, F>(
    edges: I,
    expected_edges: NumEdges,
    options: &ConvertOptions,
    open_output: F,
    mapping: Option<&mut dyn Write>,
) -> anyhow::Result<(ConversionReport, S)>
where
    I: Iterator<Item = std::io::Result<Edge>>,
    S: EdgeSink,
    F: FnOnce(NumEdges) -> std::io::Result<S>,
{
    let config = &options.sorter;

    let start = Instant::now();
    let mut nodes = ExternalSorter::<Node, Ascending>::new("nodes", config.clone());
    let mut by_second = ExternalSorter::<Edge, BySecond>::new("edges-by-second", config.clone());

    let loaded = load::load_edges(
        edges,
        expected_edges,
        options.remove_multi_edges,
        config,
        &mut nodes,
        &mut by_second,
    )?;
    let number_of_edges = by_second.size();

    nodes.sort().context("Failed to sort nodes")?;
    by_second.sort().context("Failed to sort edges by second node")?;
    info!(
        "Load and sort finished in {:.1}s; {} node occurrences, {} edges",
        start.elapsed().as_secs_f64(),
        nodes.size(),
        number_of_edges
    );

    let start = Instant::now();
    let mut by_first = ExternalSorter::<Edge, ByFirst>::new("edges-by-first", config.clone());
    let (pass, rewound_nodes) = relabel::relabel_second(
        nodes.stream().context("Failed to read nodes")?,
        by_second.stream().context("Failed to read edges")?,
        &mut by_first,
        mapping,
    )?;
    drop(by_second);

    by_first.sort().context("Failed to sort edges by first node")?;
    info!(
        "First join finished in {:.1}s; {} nodes",
        start.elapsed().as_secs_f64(),
        pass.number_of_nodes
    );

    let total_in_degree = pass.distribution.total_in_degree();
    let total_out_degree = pass.distribution.total_out_degree();

    assert_eq!(pass.distribution.number_of_nodes(), pass.number_of_nodes);
    assert_eq!(total_in_degree, total_out_degree);
    assert_eq!(total_in_degree + total_out_degree, nodes.size());
    assert_eq!(total_in_degree + total_out_degree, 2 * number_of_edges);

    let start = Instant::now();
    let mut output = open_output(number_of_edges).context("Failed to open output")?;
    let written = relabel::relabel_first(
        rewound_nodes,
        by_first.stream().context("Failed to read edges")?,
        &mut output,
    )?;
    assert_eq!(written, number_of_edges);
    debug!(
        "Second join finished in {:.1}s",
        start.elapsed().as_secs_f64()
    );

    let report = ConversionReport {
        input_edges: loaded.input_edges,
        removed_duplicates: loaded.removed_duplicates,
        number_of_edges,
        number_of_nodes: pass.number_of_nodes,
        largest_input_id: pass.largest_input_id,
        degree_distribution: pass.distribution,
        total_in_degree,
        total_out_degree,
    };

    Ok((report, output))
}
