//! Concurrent batch transforms.
//!
//! One tokio task per file, bounded by a semaphore. Results are delivered via
//! a callback as they complete so the CLI can stream JSONL lines and tick a
//! progress bar without waiting for the whole batch.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::processor::ImageTransformer;
use crate::codec::Direction;
use crate::error::PipelineError;
use crate::types::TransformRecord;

/// Result of transforming a single file in a batch.
#[derive(Debug)]
pub enum BatchResult {
    Success(Box<TransformRecord>),
    Failure(PathBuf, PipelineError),
}

/// Runs a shared [`ImageTransformer`] over many files.
pub struct BatchRunner {
    transformer: Arc<ImageTransformer>,
    parallel: usize,
}

impl BatchRunner {
    /// `parallel` is clamped to at least one worker.
    pub fn new(transformer: Arc<ImageTransformer>, parallel: usize) -> Self {
        Self {
            transformer,
            parallel: parallel.max(1),
        }
    }

    /// Transform every path, calling `on_result` as each one finishes.
    ///
    /// A failing file never aborts the batch. Returns `(succeeded, failed)`.
    pub async fn run<F>(
        &self,
        paths: &[PathBuf],
        direction: Direction,
        on_result: F,
    ) -> (usize, usize)
    where
        F: Fn(BatchResult) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.parallel));
        let on_result = Arc::new(on_result);
        let mut handles = Vec::with_capacity(paths.len());

        for path in paths {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    tracing::warn!("Batch semaphore closed unexpectedly, stopping batch");
                    break;
                }
            };

            let transformer = self.transformer.clone();
            let on_result = on_result.clone();
            let path = path.clone();

            let handle = tokio::spawn(async move {
                let result = match transformer.transform(&path, direction).await {
                    Ok(record) => BatchResult::Success(Box::new(record)),
                    Err(e) => {
                        tracing::warn!("Failed to {} {:?}: {}", direction, path, e);
                        BatchResult::Failure(path, e)
                    }
                };
                let success = matches!(&result, BatchResult::Success(_));
                drop(permit); // Release concurrency permit before callback
                on_result(result);
                success
            });

            handles.push(handle);
        }

        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for handle in handles {
            match handle.await {
                Ok(true) => succeeded += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    tracing::error!("Transform task panicked: {e}");
                    failed += 1;
                }
            }
        }

        (succeeded, failed)
    }
}
