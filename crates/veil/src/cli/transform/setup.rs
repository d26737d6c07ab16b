//! Transformer setup: config overrides and password resolution.

use veil_core::config::Config;
use veil_core::output::OutputFormat as CoreOutputFormat;
use veil_core::{Direction, ImageTransformer, KeyDerivation};

use super::types::ReportFormat;
use super::{TransformArgs, TransformContext};

/// Validate input, layer flags over `config`, and assemble a run.
pub fn setup_transformer(
    args: &TransformArgs,
    direction: Direction,
    config: Config,
) -> anyhow::Result<TransformContext> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    let Some(password) = args.password.as_deref() else {
        anyhow::bail!(
            "No password given.\n\n  Hint: Pass --password or set the VEIL_PASSWORD environment variable."
        );
    };

    let config = apply_overrides(config, args, direction)?;

    let format = match args.format {
        Some(format) => format,
        None => CoreOutputFormat::parse(&config.output.format)
            .map(ReportFormat::from_core)
            .unwrap_or(ReportFormat::Json),
    };

    Ok(TransformContext {
        transformer: ImageTransformer::new(&config, password),
        direction,
        parallel: config.processing.parallel_workers,
        format,
        pretty: args.pretty || config.output.pretty,
    })
}

/// Layer CLI flags over the loaded config.
fn apply_overrides(
    mut config: Config,
    args: &TransformArgs,
    direction: Direction,
) -> anyhow::Result<Config> {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if args.overwrite {
        config.output.overwrite = true;
    }
    if args.prehash {
        config.codec.key_derivation = KeyDerivation::Sha256;
    }
    if let Some(parallel) = args.parallel {
        if parallel == 0 {
            anyhow::bail!("--parallel must be at least 1");
        }
        config.processing.parallel_workers = parallel;
    }
    if let Some(suffix) = &args.suffix {
        if suffix.is_empty() {
            anyhow::bail!("--suffix must not be empty");
        }
        match direction {
            Direction::Encode => config.output.encode_suffix = suffix.clone(),
            Direction::Decode => config.output.decode_suffix = suffix.clone(),
        }
    }
    Ok(config)
}
