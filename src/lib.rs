//! Relabels arbitrarily large directed edge lists to dense node ranks using
//! only sequential scans and external sorting.

pub mod degree;
pub mod edgelist;
pub mod extsort;
pub mod graph;
pub mod pipeline;
pub mod progress;
pub mod record;
pub mod report;
pub mod unique;

pub use graph::{Edge, Node};
pub use pipeline::{convert, convert_files, ConvertOptions, FileConversion};
pub use report::ConversionReport;
