//! The `veil encode` and `veil decode` commands.

mod batch;
mod setup;
pub mod types;

pub use types::ReportFormat;

use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use veil_core::{Config, Direction, ImageTransformer, OutputRecord, OutputWriter};

use batch::transform_batch;
use setup::setup_transformer;

/// Arguments shared by `encode` and `decode`.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Image file or directory to transform
    #[arg(required = true)]
    pub input: PathBuf,

    /// Password keying the permutation
    #[arg(short = 'P', long, env = "VEIL_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Directory for transformed images (defaults to next to each input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Suffix appended to output file stems (overrides config)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Replace existing output files
    #[arg(long)]
    pub overwrite: bool,

    /// Key the codec with the SHA-256 hex digest of the password
    #[arg(long)]
    pub prehash: bool,

    /// Number of parallel workers (overrides config)
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Write the JSON report to a file instead of stdout
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Report format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Pretty-print JSON reports
    #[arg(long)]
    pub pretty: bool,
}

/// Manual Default impl for constructing TransformArgs outside of clap.
impl Default for TransformArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            password: None,
            output_dir: None,
            suffix: None,
            overwrite: false,
            prehash: false,
            parallel: None,
            report: None,
            format: None,
            pretty: false,
        }
    }
}

/// Everything a run needs, assembled by setup_transformer().
pub struct TransformContext {
    transformer: ImageTransformer,
    direction: Direction,
    parallel: usize,
    format: ReportFormat,
    pretty: bool,
}

/// Execute `encode` or `decode` with the config loaded at startup.
pub async fn execute(
    args: TransformArgs,
    direction: Direction,
    config: Config,
) -> anyhow::Result<()> {
    let ctx = setup_transformer(&args, direction, config)?;

    let files = ctx.transformer.discover(&args.input, direction);
    if files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to {}", files.len(), direction);

    if args.input.is_file() {
        transform_single(ctx, &args).await
    } else {
        transform_batch(ctx, &args, files).await
    }
}

/// Transform a single file and report it.
async fn transform_single(ctx: TransformContext, args: &TransformArgs) -> anyhow::Result<()> {
    let record = ctx.transformer.transform(&args.input, ctx.direction).await?;
    tracing::info!("Wrote {:?}", record.output_path);

    let record = OutputRecord::Ok(Box::new(record));
    if let Some(report_path) = &args.report {
        let file = File::create(report_path)?;
        let mut writer = OutputWriter::new(BufWriter::new(file), ctx.format.to_core(), ctx.pretty);
        writer.write(&record)?;
        writer.flush()?;
        tracing::info!("Report written to {:?}", report_path);
    } else {
        let pretty = ctx.pretty && ctx.format == ReportFormat::Json;
        println!("{}", veil_core::output::to_json(&record, pretty)?);
    }

    Ok(())
}
