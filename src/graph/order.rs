use super::{Edge, Node};

/// A strict total order used by the external sorter and its merge phase.
///
/// Orders are zero-sized markers so that a sorter's type names the order it
/// produces, e.g. `ExternalSorter<Edge, BySecond>`.
pub trait SortOrder<T> {
    fn less(a: &T, b: &T) -> bool;

    fn sort_slice(items: &mut [T]) {
        items.sort_unstable_by(|a, b| {
            if Self::less(a, b) {
                std::cmp::Ordering::Less
            } else if Self::less(b, a) {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Equal
            }
        });
    }
}

/// Ascending numeric order of node ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ascending;

impl SortOrder<Node> for Ascending {
    #[inline]
    fn less(a: &Node, b: &Node) -> bool {
        a < b
    }

    fn sort_slice(items: &mut [Node]) {
        items.sort_unstable();
    }
}

/// Lexicographic by `(first, second)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByFirst;

impl SortOrder<Edge> for ByFirst {
    #[inline]
    fn less(a: &Edge, b: &Edge) -> bool {
        (a.0, a.1) < (b.0, b.1)
    }

    fn sort_slice(items: &mut [Edge]) {
        items.sort_unstable();
    }
}

/// Lexicographic by `(second, first)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BySecond;

impl SortOrder<Edge> for BySecond {
    #[inline]
    fn less(a: &Edge, b: &Edge) -> bool {
        (a.1, a.0) < (b.1, b.0)
    }

    fn sort_slice(items: &mut [Edge]) {
        items.sort_unstable_by_key(|e| (e.1, e.0));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn edge_orders() {
        let mut edges = vec![Edge(2, 1), Edge(1, 3), Edge(1, 1), Edge(3, 1)];

        ByFirst::sort_slice(&mut edges);
        assert_eq!(edges, vec![Edge(1, 1), Edge(1, 3), Edge(2, 1), Edge(3, 1)]);

        BySecond::sort_slice(&mut edges);
        assert_eq!(edges, vec![Edge(1, 1), Edge(2, 1), Edge(3, 1), Edge(1, 3)]);

        assert!(BySecond::less(&Edge(9, 1), &Edge(0, 2)));
        assert!(!BySecond::less(&Edge(1, 1), &Edge(1, 1)));
    }

    #[test]
    fn default_sort_slice_uses_less() {
        struct Descending;
        impl SortOrder<Node> for Descending {
            fn less(a: &Node, b: &Node) -> bool {
                a > b
            }
        }

        let mut nodes = vec![3, 9, 1, 9];
        Descending::sort_slice(&mut nodes);
        assert_eq!(nodes, vec![9, 9, 3, 1]);
    }
}
