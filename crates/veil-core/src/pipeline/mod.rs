//! Image processing pipeline components.
//!
//! This module contains all the stages of the file pipeline:
//! - **discovery**: Find image files in directories
//! - **validate**: Pre-decode validation
//! - **decode**: Load and decode images from various formats
//! - **encode**: Lossless PNG output and output naming
//! - **hash**: BLAKE3 content hashes of written files
//! - **processor**: Orchestrates one file through every stage
//! - **batch**: Bounded concurrent transforms over many files

pub mod batch;
pub mod decode;
pub mod discovery;
pub mod encode;
pub mod hash;
pub mod processor;
pub mod validate;

// Re-exports for convenient access
pub use batch::{BatchResult, BatchRunner};
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::{encode_png, OutputPlanner};
pub use hash::Hasher;
pub use processor::ImageTransformer;
pub use validate::Validator;
