pub mod order;

pub use order::{Ascending, ByFirst, BySecond, SortOrder};

pub type Node = u64;
pub type Rank = Node;
pub type Degree = u64;

pub type NumNodes = Node;
pub type NumEdges = u64;

/// A directed edge; `Edge(a, b)` and `Edge(b, a)` are distinct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(pub Node, pub Node);

impl Edge {
    pub fn first(&self) -> Node {
        self.0
    }

    pub fn second(&self) -> Node {
        self.1
    }
}
