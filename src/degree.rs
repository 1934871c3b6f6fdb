use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::{Degree, NumNodes};

/// Number of edges entering (`in_degree`) and leaving (`out_degree`) a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DirectedDegree {
    pub in_degree: Degree,
    pub out_degree: Degree,
}

impl DirectedDegree {
    pub fn new(in_degree: Degree, out_degree: Degree) -> Self {
        Self {
            in_degree,
            out_degree,
        }
    }

    pub fn total(&self) -> Degree {
        self.in_degree + self.out_degree
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DegreeBucket {
    pub in_degree: Degree,
    pub out_degree: Degree,
    pub count: NumNodes,
}

/// Histogram of directed degrees, ordered by `(in, out)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegreeDistribution {
    counts: BTreeMap<DirectedDegree, NumNodes>,
}

impl DegreeDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, degree: DirectedDegree) {
        *self.counts.entry(degree).or_insert(0) += 1;
    }

    pub fn count(&self, degree: DirectedDegree) -> NumNodes {
        self.counts.get(&degree).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DirectedDegree, NumNodes)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }

    pub fn buckets(&self) -> Vec<DegreeBucket> {
        self.iter()
            .map(|(d, count)| DegreeBucket {
                in_degree: d.in_degree,
                out_degree: d.out_degree,
                count,
            })
            .collect()
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.counts.values().sum()
    }

    pub fn total_in_degree(&self) -> Degree {
        self.iter().map(|(d, c)| d.in_degree * c).sum()
    }

    pub fn total_out_degree(&self) -> Degree {
        self.iter().map(|(d, c)| d.out_degree * c).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn histogram() {
        let mut dist = DegreeDistribution::new();
        dist.record(DirectedDegree::new(1, 2));
        dist.record(DirectedDegree::new(0, 1));
        dist.record(DirectedDegree::new(1, 2));
        dist.record(DirectedDegree::new(3, 0));

        assert_eq!(dist.number_of_nodes(), 4);
        assert_eq!(dist.count(DirectedDegree::new(1, 2)), 2);
        assert_eq!(dist.count(DirectedDegree::new(2, 1)), 0);
        assert_eq!(dist.total_in_degree(), 5);
        assert_eq!(dist.total_out_degree(), 5);

        let keys: Vec<_> = dist.iter().map(|(d, _)| (d.in_degree, d.out_degree)).collect();
        assert_eq!(keys, vec![(0, 1), (1, 2), (3, 0)]);

        assert_eq!(
            dist.buckets()[1],
            DegreeBucket {
                in_degree: 1,
                out_degree: 2,
                count: 2
            }
        );
    }
}
