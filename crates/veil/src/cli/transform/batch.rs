//! Batch transforms: directory traversal with progress and streaming reports.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use veil_core::pipeline::{BatchResult, BatchRunner, DiscoveredFile};
use veil_core::{FailedFile, OutputRecord, OutputWriter, ProcessingStats};

use super::types::ReportFormat;
use super::{TransformArgs, TransformContext};

/// Transform a directory of images with a progress bar.
///
/// JSONL reports are written as results arrive; JSON reports are collected
/// and written as one array at the end.
pub async fn transform_batch(
    ctx: TransformContext,
    args: &TransformArgs,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<()> {
    let total = files.len() as u64;
    let progress = create_progress_bar(total);
    let start_time = Instant::now();

    let sink: Box<dyn Write> = match &args.report {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };
    let mut writer = OutputWriter::new(sink, ctx.format.to_core(), ctx.pretty);
    let streaming = ctx.format == ReportFormat::Jsonl;

    let direction = ctx.direction;
    let runner = BatchRunner::new(Arc::new(ctx.transformer), ctx.parallel);
    let paths: Vec<PathBuf> = files.into_iter().map(|f| f.path).collect();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<BatchResult>();
    let handle = tokio::spawn(async move {
        runner
            .run(&paths, direction, move |result| {
                let _ = tx.send(result);
            })
            .await
    });

    let mut stats = ProcessingStats::default();
    let mut collected: Vec<OutputRecord> = Vec::new();

    while let Some(result) = rx.recv().await {
        let record = match result {
            BatchResult::Success(record) => {
                stats.succeeded += 1;
                stats.bytes_written += record.output_size;
                OutputRecord::Ok(record)
            }
            BatchResult::Failure(path, error) => {
                stats.failed += 1;
                progress.suspend(|| tracing::error!("Failed: {:?} - {}", path, error));
                OutputRecord::Failed(FailedFile {
                    input_path: path,
                    error: error.to_string(),
                })
            }
        };

        if streaming {
            writer.write(&record)?;
        } else {
            collected.push(record);
        }

        progress.inc(1);
        let elapsed = start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let rate = (stats.succeeded + stats.failed) as f64 / elapsed;
            progress.set_message(format!("{:.1} img/sec", rate));
        }
    }

    let (succeeded, failed) = handle.await?;
    tracing::debug!("Batch finished: {succeeded} succeeded, {failed} failed");

    if !streaming {
        writer.write_all(&collected)?;
    }
    writer.flush()?;
    let tally = writer.tally();
    if let Some(report_path) = &args.report {
        tracing::info!("Report written to {:?} ({} record(s))", report_path, tally.total());
    }
    tracing::debug!("Report holds {} ok, {} failed", tally.ok, tally.failed);

    let elapsed = start_time.elapsed();
    stats.total_seconds = elapsed.as_secs_f64();
    stats.images_per_second = if stats.total_seconds > 0.0 {
        stats.succeeded as f64 / stats.total_seconds
    } else {
        0.0
    };

    progress.finish_and_clear();
    print_summary(&stats, elapsed);

    if stats.succeeded == 0 && stats.failed > 0 {
        anyhow::bail!("All {} image(s) failed", stats.failed);
    }
    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after a batch.
fn print_summary(stats: &ProcessingStats, elapsed: Duration) {
    let total = stats.succeeded + stats.failed;
    let mb_written = stats.bytes_written as f64 / 1_000_000.0;
    let throughput = if elapsed.as_secs_f64() > 0.0 {
        mb_written / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", stats.images_per_second);
    eprintln!("    Written:      {:>7.1} MB/sec", throughput);
    eprintln!("  ====================================");
}
