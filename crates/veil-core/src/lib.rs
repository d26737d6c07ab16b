//! Veil Core - password-keyed pixel scrambling for images.
//!
//! Veil hides the content of an image by permuting its pixel columns and rows
//! under a password. The transform is exactly reversible with the same
//! password and never changes a channel value, so scrambled images must be
//! stored losslessly (Veil always writes PNG).
//!
//! # Architecture
//!
//! ```text
//! Image → Validate → Decode → Permute (columns, then rows) → PNG → JSON record
//! ```
//!
//! The [`codec`] module is pure and synchronous; [`pipeline`] wraps it with
//! file handling, limits and bounded concurrency.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//! use veil_core::{Config, Direction, Veil};
//!
//! #[tokio::main]
//! async fn main() -> veil_core::Result<()> {
//!     let veil = Veil::new(Config::load()?);
//!     let transformer = veil.transformer("hunter2");
//!
//!     let record = transformer.transform(Path::new("./cat.jpg"), Direction::Encode).await?;
//!     println!("Wrote {:?}", record.output_path);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use codec::{Direction, KeyDerivation, KeyedPermutationCodec, PasswordKey, PixelGrid};
pub use config::Config;
pub use error::{CodecError, ConfigError, PipelineError, PipelineResult, Result, VeilError};
pub use output::{OutputFormat, OutputWriter, ReportTally};
pub use pipeline::{BatchResult, BatchRunner, ImageTransformer};
pub use types::{FailedFile, OutputRecord, ProcessingStats, TransformRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Entry point holding the loaded configuration.
pub struct Veil {
    config: Config,
}

impl Veil {
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing Veil v{}", VERSION);
        Self { config }
    }

    /// Create a Veil instance from the config file, or defaults if absent.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(Config::load()?))
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Codec for `password` under the configured key derivation.
    pub fn codec(&self, password: &str) -> KeyedPermutationCodec {
        KeyedPermutationCodec::new(PasswordKey::derive(
            password,
            self.config.codec.key_derivation,
        ))
    }

    /// File transformer for `password`.
    pub fn transformer(&self, password: &str) -> ImageTransformer {
        ImageTransformer::with_codec(&self.config, self.codec(password))
    }

    /// Batch runner sized by `processing.parallel_workers`.
    pub fn batch_runner(&self, password: &str) -> BatchRunner {
        BatchRunner::new(
            std::sync::Arc::new(self.transformer(password)),
            self.config.processing.parallel_workers,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_codec_follows_key_derivation() {
        let mut config = Config::default();
        config.codec.key_derivation = KeyDerivation::Sha256;
        let veil = Veil::new(config);

        let hashed = veil.codec("test");
        let expected = PasswordKey::new(codec::sha256_hex("test"));
        assert_eq!(hashed.key(), &expected);
        assert_eq!(veil.config().processing.parallel_workers, 4);
    }
}
