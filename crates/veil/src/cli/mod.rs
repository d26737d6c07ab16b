//! Command handlers for the `veil` binary.

pub mod config;
pub mod tables;
pub mod transform;
