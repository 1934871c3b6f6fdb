use tracing::info;

use crate::{
    extsort::{ExternalSorter, SorterConfig},
    graph::*,
    unique::UniqueStream,
};

pub type Result<T> = std::io::Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupSummary {
    pub input_edges: NumEdges,
    pub distinct_edges: NumEdges,
    pub removed: NumEdges,
}

/// Removes repeated edges by sorting them lexicographically and keeping one
/// edge per run.
pub struct DedupFilter {
    sorter: ExternalSorter<Edge, ByFirst>,
}

impl DedupFilter {
    pub fn new(config: SorterConfig) -> Self {
        Self {
            sorter: ExternalSorter::new("dedup", config),
        }
    }

    pub fn push(&mut self, edge: Edge) -> Result<()> {
        self.sorter.push(edge)
    }

    /// Emits every distinct edge once, in `(first, second)` order.
    pub fn finish(mut self, mut emit: impl FnMut(Edge) -> Result<()>) -> Result<DedupSummary> {
        self.sorter.sort()?;
        let input_edges = self.sorter.size();

        let mut removed = 0;
        let mut distinct_edges = 0;

        let mut stream = UniqueStream::new(self.sorter.stream()?)?;
        while !stream.is_empty() {
            removed += stream.degree() - 1;
            distinct_edges += 1;
            emit(stream.id())?;
            stream.advance()?;
        }

        assert_eq!(
            removed + distinct_edges,
            input_edges,
            "duplicate filter lost track of edges"
        );

        let percentage = if input_edges > 0 {
            100.0 * removed as f64 / input_edges as f64
        } else {
            0.0
        };
        info!("Removed {removed} ({percentage:.4}%) edge duplicates");

        Ok(DedupSummary {
            input_edges,
            distinct_edges,
            removed,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dedup(edges: &[Edge], config: SorterConfig) -> (Vec<Edge>, DedupSummary) {
        let mut filter = DedupFilter::new(config);
        for &e in edges {
            filter.push(e).unwrap();
        }

        let mut kept = Vec::new();
        let summary = filter
            .finish(|e| {
                kept.push(e);
                Ok(())
            })
            .unwrap();
        (kept, summary)
    }

    #[test]
    fn keeps_one_copy() {
        let (kept, summary) = dedup(
            &[Edge(5, 2), Edge(2, 5), Edge(2, 5), Edge(5, 2), Edge(2, 5), Edge(1, 1)],
            SorterConfig::default(),
        );

        assert_eq!(kept, vec![Edge(1, 1), Edge(2, 5), Edge(5, 2)]);
        assert_eq!(
            summary,
            DedupSummary {
                input_edges: 6,
                distinct_edges: 3,
                removed: 3
            }
        );
    }

    #[test]
    fn across_spilled_runs() {
        let edges: Vec<Edge> = (0..50u64).map(|i| Edge(i % 4, i % 3)).collect();
        let (kept, summary) = dedup(&edges, SorterConfig::with_memory_bytes(64));

        let mut expected = edges.clone();
        expected.sort();
        expected.dedup();

        assert_eq!(kept, expected);
        assert_eq!(summary.removed, 50 - 12);
    }

    #[test]
    fn nothing_to_remove() {
        let (kept, summary) = dedup(&[], SorterConfig::default());
        assert!(kept.is_empty());
        assert_eq!(summary.removed, 0);
    }
}
