//! Library components of the `cellflat` exporter.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
