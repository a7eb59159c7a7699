/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Bytes, Megabytes};
use crate::engine::Phase;
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

/// Probe operation result
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Front-end configuration errors, raised before the probe runs
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Please, choose at least one test")]
    #[diagnostic(
        code(config::no_test_selected),
        help("Pass --ram to run the RAM overselling test.")
    )]
    NoTestSelected,

    #[error("Use only one of these args: remfree or alloc")]
    #[diagnostic(
        code(config::conflicting_modes),
        help("--remfree {remain_free_mb} and --alloc {alloc_mb} were both given. Keep one.")
    )]
    ConflictingModes {
        remain_free_mb: Megabytes,
        alloc_mb: Megabytes,
    },

    #[error("Invalid chunk size: {0}")]
    #[diagnostic(
        code(config::invalid_chunk_size),
        help("Use 'mib', 'page' or 'pages:N' with N > 0.")
    )]
    InvalidChunkSize(String),
}

/// Errors that stop a probe run
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProbeError {
    #[error("Out of memory: chunk of {requested} bytes refused after {allocated} bytes in {chunks} chunks")]
    #[diagnostic(
        code(probe::out_of_memory),
        help("The host could not back the requested allocation. This is the condition the probe looks for.")
    )]
    OutOfMemory {
        requested: Bytes,
        allocated: Bytes,
        chunks: usize,
    },

    #[error("Cannot determine OS page size: {0}")]
    #[diagnostic(code(probe::page_size))]
    PageSize(String),

    #[error("Chunk size overflows: {pages} pages of {page_size} bytes")]
    #[diagnostic(
        code(probe::chunk_overflow),
        help("Pick a smaller page multiple.")
    )]
    ChunkOverflow { pages: usize, page_size: usize },

    #[error("Invalid phase transition: {from} -> {to}")]
    #[diagnostic(code(probe::phase_order))]
    PhaseOrder { from: Phase, to: Phase },

    #[error("Memory pool already released")]
    #[diagnostic(code(probe::pool_released))]
    PoolReleased,

    #[error("Latency histogram unavailable: {0}")]
    #[diagnostic(code(probe::histogram))]
    Histogram(String),
}

impl From<hdrhistogram::errors::CreationError> for ProbeError {
    fn from(err: hdrhistogram::errors::CreationError) -> Self {
        ProbeError::Histogram(err.to_string())
    }
}
