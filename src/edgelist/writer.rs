use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::{debug, error};

use crate::{graph::*, record::Record};

pub type Result<T> = std::io::Result<T>;

const WRITE_BUFFER_BYTES: usize = 1 << 20;

/// Receives the relabeled edges one at a time.
pub trait EdgeSink {
    fn push(&mut self, edge: Edge) -> Result<()>;
}

impl EdgeSink for Vec<Edge> {
    fn push(&mut self, edge: Edge) -> Result<()> {
        Vec::push(self, edge);
        Ok(())
    }
}

impl<S: EdgeSink + ?Sized> EdgeSink for &mut S {
    fn push(&mut self, edge: Edge) -> Result<()> {
        (**self).push(edge)
    }
}

/// Writes edges as fixed-size binary records.
///
/// The writer must be closed with [`finish`](Self::finish): only then is the
/// buffer flushed and the file truncated to exactly the written records.
/// Dropping it unfinished leaves a file that may be padded or incomplete.
pub struct BinaryEdgeWriter {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    edges_written: NumEdges,
}

impl BinaryEdgeWriter {
    /// `size_hint` edges are reserved upfront; zero skips the reservation.
    pub fn create(path: impl AsRef<Path>, size_hint: NumEdges) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::options()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;

        if size_hint > 0 {
            file.set_len(size_hint * Edge::SIZE as u64)?;
        }

        Ok(Self {
            path,
            writer: Some(BufWriter::with_capacity(WRITE_BUFFER_BYTES, file)),
            edges_written: 0,
        })
    }

    pub fn edges_written(&self) -> NumEdges {
        self.edges_written
    }

    /// Flushes, truncates the file to the records written and returns their number.
    pub fn finish(mut self) -> Result<NumEdges> {
        let Some(writer) = self.writer.take() else {
            return Ok(self.edges_written);
        };

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.set_len(self.edges_written * Edge::SIZE as u64)?;
        file.sync_all()?;

        debug!(
            "Closed {} with {} edges",
            self.path.display(),
            self.edges_written
        );
        Ok(self.edges_written)
    }
}

impl EdgeSink for BinaryEdgeWriter {
    fn push(&mut self, edge: Edge) -> Result<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "writer already finished",
            ));
        };

        edge.write_to(writer)?;
        self.edges_written += 1;
        Ok(())
    }
}

impl Drop for BinaryEdgeWriter {
    fn drop(&mut self) {
        if self.writer.is_some() && !std::thread::panicking() {
            error!(
                "Binary output {} dropped without being finished; its content is incomplete",
                self.path.display()
            );
        }
    }
}

/// Writes one `first<TAB>second` line per edge.
pub struct TextEdgeWriter<W: Write> {
    writer: W,
    edges_written: NumEdges,
}

impl TextEdgeWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufWriter::with_capacity(
            WRITE_BUFFER_BYTES,
            File::create(path)?,
        )))
    }
}

impl<W: Write> TextEdgeWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            edges_written: 0,
        }
    }

    pub fn finish(mut self) -> Result<NumEdges> {
        self.writer.flush()?;
        Ok(self.edges_written)
    }
}

impl<W: Write> EdgeSink for TextEdgeWriter<W> {
    fn push(&mut self, Edge(first, second): Edge) -> Result<()> {
        writeln!(self.writer, "{first}\t{second}")?;
        self.edges_written += 1;
        Ok(())
    }
}

/// Fans edges out to the requested output files.
#[derive(Default)]
pub struct OutputSinks {
    binary: Option<BinaryEdgeWriter>,
    text: Option<TextEdgeWriter<BufWriter<File>>>,
}

impl OutputSinks {
    pub fn create(
        binary: Option<&Path>,
        text: Option<&Path>,
        size_hint: NumEdges,
    ) -> Result<Self> {
        Ok(Self {
            binary: binary
                .map(|p| BinaryEdgeWriter::create(p, size_hint))
                .transpose()?,
            text: text.map(TextEdgeWriter::create).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.binary.is_none() && self.text.is_none()
    }

    pub fn finish(self) -> Result<()> {
        if let Some(binary) = self.binary {
            binary.finish()?;
        }
        if let Some(text) = self.text {
            text.finish()?;
        }
        Ok(())
    }
}

impl EdgeSink for OutputSinks {
    fn push(&mut self, edge: Edge) -> Result<()> {
        if let Some(binary) = self.binary.as_mut() {
            binary.push(edge)?;
        }
        if let Some(text) = self.text.as_mut() {
            text.push(edge)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::edgelist::EdgeFileReader;

    #[test]
    fn binary_is_truncated_to_written_edges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let mut writer = BinaryEdgeWriter::create(&path, 100).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 100 * 16);

        for i in 0..10 {
            writer.push(Edge(i, 10 - i)).unwrap();
        }
        assert_eq!(writer.finish().unwrap(), 10);
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 10 * 16);

        let edges: Vec<Edge> = EdgeFileReader::open(&path)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(edges, (0..10).map(|i| Edge(i, 10 - i)).collect::<Vec<_>>());
    }

    #[test]
    fn binary_grows_beyond_hint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let mut writer = BinaryEdgeWriter::create(&path, 1).unwrap();
        for i in 0..3 {
            writer.push(Edge(i, i)).unwrap();
        }
        assert_eq!(writer.edges_written(), 3);
        writer.finish().unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 3 * 16);
    }

    #[test]
    fn text_format() {
        let mut buffer = Vec::new();
        let mut writer = TextEdgeWriter::new(&mut buffer);
        writer.push(Edge(0, 1)).unwrap();
        writer.push(Edge(18446744073709551615, 7)).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "0\t1\n18446744073709551615\t7\n"
        );
    }

    #[test]
    fn fan_out() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("out.bin");
        let txt = dir.path().join("out.txt");

        let mut sinks = OutputSinks::create(Some(&bin), Some(&txt), 0).unwrap();
        assert!(!sinks.is_empty());
        sinks.push(Edge(1, 0)).unwrap();
        sinks.finish().unwrap();

        assert_eq!(std::fs::metadata(&bin).unwrap().len(), 16);
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "1\t0\n");

        assert!(OutputSinks::default().is_empty());
    }
}
