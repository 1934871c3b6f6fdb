use std::{marker::PhantomData, slice};

use itertools::structs::KMergeBy;

use super::{
    run::{Run, RunReader},
    Result,
};
use crate::{graph::SortOrder, record::Record};

type MergeLess<T> = fn(&Result<T>, &Result<T>) -> bool;

// Errors sort first so that they surface as soon as they happen.
fn merge_less<T, O: SortOrder<T>>(a: &Result<T>, b: &Result<T>) -> bool {
    match (a, b) {
        (Ok(a), Ok(b)) => O::less(a, b),
        (Err(_), _) => true,
        (Ok(_), Err(_)) => false,
    }
}

enum Source<'a, T> {
    Memory(&'a [T]),
    Runs(&'a [Run]),
}

enum Cursor<'a, T: Record> {
    Memory(slice::Iter<'a, T>),
    Runs(KMergeBy<RunReader<T>, MergeLess<T>>),
}

/// Forward-only view of the sorted output of an [`ExternalSorter`](super::ExternalSorter).
pub struct SortedStream<'a, T: Record, O: SortOrder<T>> {
    source: Source<'a, T>,
    cursor: Cursor<'a, T>,
    _order: PhantomData<O>,
}

impl<'a, T: Record, O: SortOrder<T>> SortedStream<'a, T, O> {
    pub(super) fn from_memory(items: &'a [T]) -> Result<Self> {
        Self::start(Source::Memory(items))
    }

    pub(super) fn from_runs(runs: &'a [Run]) -> Result<Self> {
        Self::start(Source::Runs(runs))
    }

    fn start(source: Source<'a, T>) -> Result<Self> {
        let cursor = Self::open(&source)?;
        Ok(Self {
            source,
            cursor,
            _order: PhantomData,
        })
    }

    fn open(source: &Source<'a, T>) -> Result<Cursor<'a, T>> {
        Ok(match *source {
            Source::Memory(items) => Cursor::Memory(items.iter()),
            Source::Runs(runs) => {
                let readers = runs
                    .iter()
                    .map(|run| {
                        run.open().map_err(|e| {
                            std::io::Error::new(
                                e.kind(),
                                format!("cannot open run {}: {e}", run.path().display()),
                            )
                        })
                    })
                    .collect::<Result<Vec<RunReader<T>>>>()?;

                Cursor::Runs(itertools::kmerge_by(
                    readers,
                    merge_less::<T, O> as MergeLess<T>,
                ))
            }
        })
    }

    /// Restarts the stream at the smallest element.
    pub fn rewind(&mut self) -> Result<()> {
        self.cursor = Self::open(&self.source)?;
        Ok(())
    }
}

impl<T: Record, O: SortOrder<T>> Iterator for SortedStream<'_, T, O> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.cursor {
            Cursor::Memory(iter) => iter.next().copied().map(Ok),
            Cursor::Runs(merge) => merge.next(),
        }
    }
}
