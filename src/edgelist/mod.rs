pub mod reader;
pub mod writer;

pub use reader::EdgeFileReader;
pub use writer::{BinaryEdgeWriter, EdgeSink, OutputSinks, TextEdgeWriter};
