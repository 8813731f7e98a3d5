//! Library side of the `lineage-rules` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
