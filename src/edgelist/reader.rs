use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use tracing::warn;

use crate::{graph::*, record::Record};

pub type Result<T> = std::io::Result<T>;

const READ_BUFFER_BYTES: usize = 1 << 20;

/// Sequential reader of a headerless file of `(first, second)` records.
pub struct EdgeFileReader<R> {
    reader: R,
    number_of_edges: NumEdges,
    remaining: NumEdges,
}

impl EdgeFileReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let bytes = file.metadata()?.len();

        let reader = Self::new(BufReader::with_capacity(READ_BUFFER_BYTES, file), bytes);
        let trailing = bytes % Edge::SIZE as u64;
        if trailing != 0 {
            warn!(
                "{} ends with {trailing} bytes that do not form a complete edge; ignoring them",
                path.display()
            );
        }

        Ok(reader)
    }
}

impl<R: Read> EdgeFileReader<R> {
    /// `length_in_bytes` determines how many records are read.
    pub fn new(reader: R, length_in_bytes: u64) -> Self {
        let number_of_edges = length_in_bytes / Edge::SIZE as u64;
        Self {
            reader,
            number_of_edges,
            remaining: number_of_edges,
        }
    }

    pub fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }
}

impl<R: Read> Iterator for EdgeFileReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        let edge = Edge::read_from(&mut self.reader);
        if edge.is_err() {
            self.remaining = 0;
        }

        Some(edge)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining as usize;
        (len, Some(len))
    }
}
