use std::path::PathBuf;

use anyhow::{anyhow, Context};
use dotenv::dotenv;
use structopt::StructOpt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_relabel::{convert_files, extsort::SorterConfig, ConvertOptions, FileConversion};

#[derive(StructOpt)]
#[structopt(
    name = "relabel",
    about = "Relabels a binary edge list to dense node ranks and reports its degree distribution"
)]
struct Opts {
    /// Binary input: pairs of little-endian u64 node ids
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,

    /// Binary output in the input's layout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Output with one tab-separated edge per line
    #[structopt(short = "a", long, parse(from_os_str))]
    text_output: Option<PathBuf>,

    /// Original id of every node, one line per rank
    #[structopt(short, long, parse(from_os_str))]
    map_file: Option<PathBuf>,

    /// Remove repeated edges
    #[structopt(short, long)]
    clean_multi_edges: bool,

    /// Memory budget of each external sorter in MiB
    #[structopt(long, default_value = "256")]
    sort_memory_mb: usize,

    /// Directory for the sorters' temporary files
    #[structopt(long, parse(from_os_str))]
    tmp_dir: Option<PathBuf>,

    /// Also write the report as JSON to this file
    #[structopt(long, parse(from_os_str))]
    report_json: Option<PathBuf>,
}

impl Opts {
    fn sort_memory_bytes(&self) -> anyhow::Result<usize> {
        self.sort_memory_mb
            .max(1)
            .checked_mul(1 << 20)
            .ok_or_else(|| anyhow!("Sort memory of {} MiB is too large", self.sort_memory_mb))
    }

    fn conversion(&self) -> anyhow::Result<FileConversion> {
        let conversion = FileConversion {
            input: self.input.clone().unwrap_or_default(),
            output: self.output.clone(),
            text_output: self.text_output.clone(),
            map_file: self.map_file.clone(),
            options: ConvertOptions {
                remove_multi_edges: self.clean_multi_edges,
                sorter: SorterConfig {
                    memory_bytes: self.sort_memory_bytes()?,
                    tmp_dir: self.tmp_dir.clone(),
                    ..Default::default()
                },
            },
        };
        conversion.validate()?;
        Ok(conversion)
    }
}

fn run(opts: &Opts, conversion: &FileConversion) -> anyhow::Result<()> {
    let report = convert_files(conversion)?;
    print!("{report}");

    if let Some(path) = &opts.report_json {
        let json = report.to_json().context("Failed to encode report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    Ok(())
}

fn main() {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_relabel=info,relabel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opts = Opts::from_args();
    let conversion = match opts.conversion() {
        Ok(conversion) => conversion,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&opts, &conversion) {
        error!("Conversion failed: {err:?}");
        std::process::exit(1);
    }

    info!("Done");
}
