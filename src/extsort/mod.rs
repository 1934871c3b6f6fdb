//! Bounded-memory external sorting.
//!
//! An [`ExternalSorter`] ingests elements in any order, sorts them in batches
//! of at most [`SorterConfig::memory_bytes`] and spills each batch as a run
//! file into a private temporary directory. After [`ExternalSorter::sort`],
//! [`ExternalSorter::stream`] merges the runs on the fly and yields the
//! elements in the order `O`. A stream can be rewound to its start any number
//! of times; the run files live until the sorter is dropped.
//!
//! If all elements fit into a single batch, nothing is written to disk. If
//! there are more than [`SorterConfig::max_fan_in`] runs, groups of runs are
//! merged into longer runs before streaming starts.

mod run;
mod stream;

pub use stream::SortedStream;

use std::{
    fs::File,
    io::{BufWriter, ErrorKind, Write},
    marker::PhantomData,
    path::PathBuf,
};

use itertools::Itertools;
use tempfile::TempDir;
use tracing::debug;

use crate::{graph::SortOrder, record::Record};
use run::Run;

pub type Result<T> = std::io::Result<T>;

const IO_BUFFER_BYTES: usize = 1 << 16;
const MAX_INITIAL_CAPACITY: usize = 1 << 16;

#[derive(Debug, Clone)]
pub struct SorterConfig {
    /// Upper bound on the bytes held by the in-memory batch.
    pub memory_bytes: usize,
    /// Parent directory of the spill directory; system temp dir if `None`.
    pub tmp_dir: Option<PathBuf>,
    /// Maximum number of runs read at the same time.
    pub max_fan_in: usize,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            memory_bytes: 1 << 28,
            tmp_dir: None,
            max_fan_in: 128,
        }
    }
}

impl SorterConfig {
    pub fn with_memory_bytes(memory_bytes: usize) -> Self {
        Self {
            memory_bytes,
            ..Default::default()
        }
    }

    fn batch_size<T>(&self) -> usize {
        (self.memory_bytes / std::mem::size_of::<T>().max(1)).max(1)
    }
}

pub struct ExternalSorter<T: Record, O: SortOrder<T>> {
    name: &'static str,
    config: SorterConfig,
    batch_size: usize,
    batch: Vec<T>,
    runs: Vec<Run>,
    next_run_id: usize,
    dir: Option<TempDir>,
    size: u64,
    sorted: bool,
    _order: PhantomData<O>,
}

impl<T: Record, O: SortOrder<T>> ExternalSorter<T, O> {
    /// `name` only shows up in log messages.
    pub fn new(name: &'static str, config: SorterConfig) -> Self {
        let batch_size = config.batch_size::<T>();
        Self {
            name,
            config,
            batch_size,
            batch: Vec::with_capacity(batch_size.min(MAX_INITIAL_CAPACITY)),
            runs: Vec::new(),
            next_run_id: 0,
            dir: None,
            size: 0,
            sorted: false,
            _order: PhantomData,
        }
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.sorted {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("sorter {} is already sorted", self.name),
            ));
        }

        // capacity never exceeds batch_size
        if self.batch.len() == self.batch.capacity() {
            let additional = self
                .batch
                .capacity()
                .max(1)
                .min(self.batch_size - self.batch.len());
            self.batch.reserve_exact(additional);
        }

        self.batch.push(item);
        self.size += 1;

        if self.batch.len() >= self.batch_size {
            self.spill()?;
        }

        Ok(())
    }

    /// Finishes ingestion; afterwards only [`Self::stream`] is allowed.
    pub fn sort(&mut self) -> Result<()> {
        if self.sorted {
            return Ok(());
        }

        if self.runs.is_empty() {
            O::sort_slice(&mut self.batch);
        } else {
            self.spill()?;
            self.batch = Vec::new();
            self.merge_runs()?;
        }

        self.sorted = true;
        debug!(
            "Sorter {}: {} elements sorted in {} run(s)",
            self.name,
            self.size,
            self.runs.len().max(1)
        );
        Ok(())
    }

    /// Returns a forward-only stream over all elements, starting at the smallest.
    pub fn stream(&self) -> Result<SortedStream<'_, T, O>> {
        if !self.sorted {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("sorter {} has not been sorted yet", self.name),
            ));
        }

        if self.runs.is_empty() {
            SortedStream::from_memory(&self.batch)
        } else {
            SortedStream::from_runs(&self.runs)
        }
    }

    /// Number of elements pushed so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub fn number_of_runs(&self) -> usize {
        self.runs.len()
    }

    fn spill(&mut self) -> Result<()> {
        if self.batch.is_empty() {
            return Ok(());
        }

        O::sort_slice(&mut self.batch);

        let path = self.next_run_path()?;
        let mut writer = BufWriter::with_capacity(IO_BUFFER_BYTES, File::create(&path)?);
        for item in &self.batch {
            item.write_to(&mut writer)?;
        }
        writer.flush()?;

        debug!(
            "Sorter {}: spilled run {} with {} elements to {}",
            self.name,
            self.runs.len(),
            self.batch.len(),
            path.display()
        );

        self.runs.push(Run::new(path, self.batch.len() as u64));
        self.batch.clear();
        Ok(())
    }

    /// Merges groups of runs until at most `max_fan_in` runs are left.
    fn merge_runs(&mut self) -> Result<()> {
        let fan_in = self.config.max_fan_in.max(2);

        while self.runs.len() > fan_in {
            let runs = std::mem::take(&mut self.runs);
            let number_of_runs = runs.len();

            for group in &runs.into_iter().chunks(fan_in) {
                let group: Vec<Run> = group.collect();
                if group.len() == 1 {
                    self.runs.extend(group);
                    continue;
                }

                let path = self.next_run_path()?;
                let mut writer = BufWriter::with_capacity(IO_BUFFER_BYTES, File::create(&path)?);
                for item in SortedStream::<T, O>::from_runs(&group)? {
                    item?.write_to(&mut writer)?;
                }
                writer.flush()?;

                for run in &group {
                    std::fs::remove_file(run.path())?;
                }

                self.runs
                    .push(Run::new(path, group.iter().map(Run::len).sum()));
            }

            debug!(
                "Sorter {}: merged {} runs into {}",
                self.name,
                number_of_runs,
                self.runs.len()
            );
        }

        Ok(())
    }

    fn next_run_path(&mut self) -> Result<PathBuf> {
        let id = self.next_run_id;
        self.next_run_id += 1;
        Ok(self.spill_dir()?.join(format!("{id:06x}")))
    }

    fn spill_dir(&mut self) -> Result<PathBuf> {
        if let Some(dir) = &self.dir {
            return Ok(dir.path().to_path_buf());
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("edge_relabel_");
        let dir = match &self.config.tmp_dir {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let path = dir.path().to_path_buf();
        self.dir = Some(dir);
        Ok(path)
    }
}
