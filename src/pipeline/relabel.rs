//! The two merge-join passes that replace node ids by their ranks.
//!
//! Both passes walk the sorted node collection in lockstep with a sorted edge
//! stream, so the id to rank mapping never has to be held in memory. Pass one
//! joins on `second`, pass two on `first`.

use std::io::Write;

use anyhow::Context;

use crate::{
    degree::{DegreeDistribution, DirectedDegree},
    edgelist::EdgeSink,
    extsort::{ExternalSorter, SortedStream},
    graph::*,
    unique::UniqueStream,
};

pub type NodeStream<'a> = SortedStream<'a, Node, Ascending>;

#[derive(Debug, Clone)]
pub struct SecondPass {
    pub number_of_nodes: NumNodes,
    pub largest_input_id: Option<Node>,
    pub distribution: DegreeDistribution,
}

/// Tracks the node currently at the head of the node stream until it is closed.
struct NodeCloser<'m> {
    distribution: DegreeDistribution,
    in_degree: Degree,
    largest_input_id: Option<Node>,
    mapping: Option<&'m mut dyn Write>,
}

impl NodeCloser<'_> {
    fn close<I>(&mut self, nodes: &UniqueStream<I, Node>) -> std::io::Result<()>
    where
        I: Iterator<Item = std::io::Result<Node>>,
    {
        let total = nodes.degree();
        assert!(
            self.in_degree <= total,
            "node {} is target of {} edges but occurs only {} times",
            nodes.id(),
            self.in_degree,
            total
        );

        self.distribution
            .record(DirectedDegree::new(self.in_degree, total - self.in_degree));
        self.in_degree = 0;
        self.largest_input_id = Some(nodes.id());

        if let Some(mapping) = self.mapping.as_mut() {
            writeln!(mapping, "{}", nodes.id())?;
        }

        Ok(())
    }
}

/// Pass one: rewrites `second` to its rank, pushes the result into `by_first`
/// and accounts the degree of every node. Returns the node stream rewound to
/// its start.
pub fn relabel_second<'a>(
    nodes: NodeStream<'a>,
    edges: SortedStream<'_, Edge, BySecond>,
    by_first: &mut ExternalSorter<Edge, ByFirst>,
    mapping: Option<&mut dyn Write>,
) -> anyhow::Result<(SecondPass, NodeStream<'a>)> {
    let mut nodes = UniqueStream::new(nodes).context("Failed to read node collection")?;
    let mut closer = NodeCloser {
        distribution: DegreeDistribution::new(),
        in_degree: 0,
        largest_input_id: None,
        mapping,
    };

    for edge in edges {
        let mut edge = edge.context("Failed to read edges sorted by second")?;

        while !nodes.is_empty() && nodes.id() < edge.second() {
            closer.close(&nodes).context("Failed to write mapping")?;
            nodes.advance().context("Failed to read node collection")?;
        }

        assert!(
            !nodes.is_empty() && nodes.id() == edge.second(),
            "edge endpoint {} is missing from the node collection",
            edge.second()
        );

        closer.in_degree += 1;
        edge.1 = nodes.rank();
        by_first.push(edge).context("Failed to buffer relabeled edge")?;
    }

    // flush the nodes without incoming edges past the last target
    while !nodes.is_empty() {
        closer.close(&nodes).context("Failed to write mapping")?;
        nodes.advance().context("Failed to read node collection")?;
    }

    if let Some(mapping) = closer.mapping.as_mut() {
        mapping.flush().context("Failed to write mapping")?;
    }

    let number_of_nodes = nodes.rank();
    let mut source = nodes.into_source();
    source.rewind().context("Failed to rewind node collection")?;

    Ok((
        SecondPass {
            number_of_nodes,
            largest_input_id: closer.largest_input_id,
            distribution: closer.distribution,
        },
        source,
    ))
}

/// Pass two: rewrites `first` to its rank and forwards the edge to `output`.
pub fn relabel_first<S: EdgeSink>(
    nodes: NodeStream<'_>,
    edges: SortedStream<'_, Edge, ByFirst>,
    output: &mut S,
) -> anyhow::Result<NumEdges> {
    let mut nodes = UniqueStream::new(nodes).context("Failed to read node collection")?;
    let mut written = 0;

    for edge in edges {
        let mut edge = edge.context("Failed to read edges sorted by first")?;

        while !nodes.is_empty() && nodes.id() < edge.first() {
            nodes.advance().context("Failed to read node collection")?;
        }

        assert!(
            !nodes.is_empty() && nodes.id() == edge.first(),
            "edge endpoint {} is missing from the node collection",
            edge.first()
        );

        edge.0 = nodes.rank();
        output.push(edge).context("Failed to write output edge")?;
        written += 1;
    }

    Ok(written)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::extsort::SorterConfig;

    fn sorted<T: crate::record::Record, O: SortOrder<T>>(items: &[T]) -> ExternalSorter<T, O> {
        let mut sorter = ExternalSorter::new("test", SorterConfig::default());
        for &x in items {
            sorter.push(x).unwrap();
        }
        sorter.sort().unwrap();
        sorter
    }

    #[test]
    fn second_pass_counts_degrees() {
        // 7 has no incoming edges and 9 no outgoing ones
        let edges = [Edge(7, 3), Edge(3, 9), Edge(7, 9)];
        let nodes = sorted::<Node, Ascending>(&[7, 3, 3, 9, 7, 9]);
        let by_second = sorted::<Edge, BySecond>(&edges);
        let mut by_first = ExternalSorter::new("test", SorterConfig::default());

        let mut mapping: Vec<u8> = Vec::new();
        let (pass, mut rewound) = relabel_second(
            nodes.stream().unwrap(),
            by_second.stream().unwrap(),
            &mut by_first,
            Some(&mut mapping),
        )
        .unwrap();

        assert_eq!(pass.number_of_nodes, 3);
        assert_eq!(pass.largest_input_id, Some(9));
        assert_eq!(String::from_utf8(mapping).unwrap(), "3\n7\n9\n");

        let dist = &pass.distribution;
        assert_eq!(dist.count(DirectedDegree::new(1, 1)), 1);
        assert_eq!(dist.count(DirectedDegree::new(0, 2)), 1);
        assert_eq!(dist.count(DirectedDegree::new(2, 0)), 1);

        assert_eq!(rewound.next().unwrap().unwrap(), 3);

        by_first.sort().unwrap();
        let relabeled: Vec<Edge> = by_first.stream().unwrap().map(Result::unwrap).collect();
        assert_eq!(relabeled, vec![Edge(3, 2), Edge(7, 0), Edge(7, 2)]);
    }

    #[test]
    fn first_pass_relabels_sources() {
        let nodes = sorted::<Node, Ascending>(&[10, 20, 20, 30]);
        let by_first = sorted::<Edge, ByFirst>(&[Edge(30, 0), Edge(10, 1), Edge(20, 2)]);

        let mut output: Vec<Edge> = Vec::new();
        let written =
            relabel_first(nodes.stream().unwrap(), by_first.stream().unwrap(), &mut output)
                .unwrap();

        assert_eq!(written, 3);
        assert_eq!(output, vec![Edge(0, 1), Edge(1, 2), Edge(2, 0)]);
    }

    #[test]
    #[should_panic(expected = "missing from the node collection")]
    fn second_pass_rejects_unknown_endpoint() {
        let nodes = sorted::<Node, Ascending>(&[1, 2]);
        let by_second = sorted::<Edge, BySecond>(&[Edge(1, 5)]);
        let mut by_first = ExternalSorter::new("test", SorterConfig::default());

        let _ = relabel_second(
            nodes.stream().unwrap(),
            by_second.stream().unwrap(),
            &mut by_first,
            None,
        );
    }

    #[test]
    #[should_panic(expected = "missing from the node collection")]
    fn first_pass_rejects_unknown_endpoint() {
        let nodes = sorted::<Node, Ascending>(&[1, 3]);
        let by_first = sorted::<Edge, ByFirst>(&[Edge(2, 0)]);

        let _ = relabel_first(
            nodes.stream().unwrap(),
            by_first.stream().unwrap(),
            &mut Vec::<Edge>::new(),
        );
    }
}
