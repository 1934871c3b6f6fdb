use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use tracing::info;

use super::{convert, ConvertOptions};
use crate::{
    edgelist::{EdgeFileReader, OutputSinks},
    report::ConversionReport,
};

/// Paths and options of a conversion between files.
#[derive(Debug, Clone, Default)]
pub struct FileConversion {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub text_output: Option<PathBuf>,
    pub map_file: Option<PathBuf>,
    pub options: ConvertOptions,
}

impl FileConversion {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.input.as_os_str().is_empty()
            || (self.output.is_none() && self.text_output.is_none())
        {
            bail!("Need input and output files");
        }
        Ok(())
    }
}

/// Reads the binary edge list at `input` and writes the requested outputs.
///
/// Nothing is read or written if the configuration is incomplete.
pub fn convert_files(conversion: &FileConversion) -> anyhow::Result<ConversionReport> {
    conversion.validate()?;

    let input = &conversion.input;
    let reader = EdgeFileReader::open(input)
        .with_context(|| format!("Failed to open input file {}", input.display()))?;
    let input_edges = reader.number_of_edges();
    info!("Input file {} contains {input_edges} edges", input.display());

    let mut mapping = match &conversion.map_file {
        Some(path) => Some(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create mapping file {}", path.display())
        })?)),
        None => None,
    };

    let (report, sinks) = convert(
        reader,
        input_edges,
        &conversion.options,
        |number_of_edges| {
            OutputSinks::create(
                conversion.output.as_deref(),
                conversion.text_output.as_deref(),
                number_of_edges,
            )
        },
        mapping.as_mut().map(|w| w as &mut dyn Write),
    )?;

    sinks.finish().context("Failed to close output files")?;
    if let Some(mut mapping) = mapping {
        mapping.flush().context("Failed to close mapping file")?;
    }

    Ok(report)
}
