use crate::graph::{Degree, Rank};

pub type Result<T> = std::io::Result<T>;

/// Cursor over a sorted source that collapses runs of equal elements.
///
/// The stream always points at the current run: [`id`](Self::id) is its
/// representative, [`degree`](Self::degree) its length and [`rank`](Self::rank)
/// the number of distinct values before it. Once the source is exhausted,
/// [`is_empty`](Self::is_empty) turns true and `rank` equals the number of
/// distinct values.
pub struct UniqueStream<I, T> {
    source: I,
    lookahead: Option<T>,
    id: T,
    degree: Degree,
    rank: Rank,
    empty: bool,
}

impl<I, T> UniqueStream<I, T>
where
    I: Iterator<Item = Result<T>>,
    T: Copy + PartialEq + Default,
{
    pub fn new(source: I) -> Result<Self> {
        let mut stream = Self {
            source,
            lookahead: None,
            id: T::default(),
            degree: 0,
            rank: 0,
            empty: false,
        };
        stream.fetch()?;
        Ok(stream)
    }

    /// Moves to the next run. A no-op on an exhausted stream.
    pub fn advance(&mut self) -> Result<()> {
        if self.empty {
            return Ok(());
        }

        self.fetch()?;
        self.rank += 1;
        Ok(())
    }

    pub fn id(&self) -> T {
        self.id
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Gives back the source; its position is somewhere past the current run.
    pub fn into_source(self) -> I {
        self.source
    }

    fn fetch(&mut self) -> Result<()> {
        let first = match self.lookahead.take() {
            Some(x) => x,
            None => match self.source.next() {
                Some(x) => x?,
                None => {
                    self.empty = true;
                    self.degree = 0;
                    return Ok(());
                }
            },
        };

        self.id = first;
        self.degree = 1;

        for x in self.source.by_ref() {
            let x = x?;
            if x != first {
                self.lookahead = Some(x);
                break;
            }
            self.degree += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::Edge;

    fn stream_of<T: Copy>(items: &[T]) -> impl Iterator<Item = Result<T>> + '_ {
        items.iter().copied().map(Ok)
    }

    #[test]
    fn collapses_runs() {
        let items = [1u64, 1, 1, 4, 7, 7];
        let mut stream = UniqueStream::new(stream_of(&items)).unwrap();

        let mut runs = Vec::new();
        while !stream.is_empty() {
            runs.push((stream.id(), stream.degree(), stream.rank()));
            stream.advance().unwrap();
        }

        assert_eq!(runs, vec![(1, 3, 0), (4, 1, 1), (7, 2, 2)]);
        assert_eq!(stream.rank(), 3);

        stream.advance().unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.rank(), 3);
    }

    #[test]
    fn empty_source() {
        let stream = UniqueStream::new(stream_of::<u64>(&[])).unwrap();
        assert!(stream.is_empty());
        assert_eq!(stream.rank(), 0);
        assert_eq!(stream.degree(), 0);
    }

    #[test]
    fn edges() {
        let items = [Edge(2, 5), Edge(2, 5), Edge(5, 2)];
        let mut stream = UniqueStream::new(stream_of(&items)).unwrap();

        assert_eq!((stream.id(), stream.degree()), (Edge(2, 5), 2));
        stream.advance().unwrap();
        assert_eq!((stream.id(), stream.degree()), (Edge(5, 2), 1));
        stream.advance().unwrap();
        assert!(stream.is_empty());
    }

    #[test]
    fn propagates_errors() {
        let items = vec![
            Ok(1u64),
            Ok(1),
            Err(std::io::Error::new(std::io::ErrorKind::Other, "broken")),
        ];
        assert!(UniqueStream::new(items.into_iter()).is_err());
    }
}
