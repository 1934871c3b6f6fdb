use anyhow::Context;
use tracing::info;

use super::dedup::DedupFilter;
use crate::{
    extsort::{ExternalSorter, SorterConfig},
    graph::*,
    progress::ProgressReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct LoadSummary {
    pub input_edges: NumEdges,
    pub removed_duplicates: Option<NumEdges>,
}

/// Feeds both endpoints of every (kept) edge into `nodes` and the edge itself
/// into `by_second`.
pub(super) fn load_edges<I>(
    edges: I,
    expected_edges: NumEdges,
    remove_multi_edges: bool,
    config: &SorterConfig,
    nodes: &mut ExternalSorter<Node, Ascending>,
    by_second: &mut ExternalSorter<Edge, BySecond>,
) -> anyhow::Result<LoadSummary>
where
    I: Iterator<Item = std::io::Result<Edge>>,
{
    let mut progress = ProgressReport::new("edges", expected_edges);

    let mut push = |edge: Edge| -> std::io::Result<()> {
        nodes.push(edge.first())?;
        nodes.push(edge.second())?;
        by_second.push(edge)
    };

    if !remove_multi_edges {
        for edge in edges {
            let edge = edge.context("Failed to read input edge")?;
            push(edge).context("Failed to buffer edge")?;
            progress.update();
        }

        info!(
            "Loaded {} edges in {:.1}s",
            progress.items(),
            progress.elapsed().as_secs_f64()
        );

        return Ok(LoadSummary {
            input_edges: progress.items(),
            removed_duplicates: None,
        });
    }

    let mut filter = DedupFilter::new(config.clone());
    for edge in edges {
        let edge = edge.context("Failed to read input edge")?;
        filter.push(edge).context("Failed to buffer edge")?;
        progress.update();
    }

    info!(
        "Loaded {} edges in {:.1}s; removing duplicates",
        progress.items(),
        progress.elapsed().as_secs_f64()
    );

    let summary = filter
        .finish(push)
        .context("Failed to remove duplicate edges")?;

    assert_eq!(summary.input_edges, progress.items());
    assert_eq!(by_second.size(), summary.distinct_edges);

    Ok(LoadSummary {
        input_edges: summary.input_edges,
        removed_duplicates: Some(summary.removed),
    })
}
