use std::{
    fs::File,
    io::BufReader,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use super::{Result, IO_BUFFER_BYTES};
use crate::record::Record;

/// A sorted batch that was spilled to disk.
#[derive(Debug)]
pub(super) struct Run {
    path: PathBuf,
    len: u64,
}

impl Run {
    pub(super) fn new(path: PathBuf, len: u64) -> Self {
        Self { path, len }
    }

    pub(super) fn path(&self) -> &Path {
        &self.path
    }

    pub(super) fn len(&self) -> u64 {
        self.len
    }

    pub(super) fn open<T: Record>(&self) -> Result<RunReader<T>> {
        Ok(RunReader {
            reader: BufReader::with_capacity(IO_BUFFER_BYTES, File::open(&self.path)?),
            remaining: self.len,
            _type: PhantomData,
        })
    }
}

/// Reads the records of a run from its start.
pub(super) struct RunReader<T> {
    reader: BufReader<File>,
    remaining: u64,
    _type: PhantomData<T>,
}

impl<T: Record> Iterator for RunReader<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        match T::read_from(&mut self.reader) {
            Ok(item) => {
                self.remaining -= 1;
                Some(Ok(item))
            }
            Err(e) => {
                // a broken run cannot be resumed
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining as usize;
        (len, Some(len))
    }
}
