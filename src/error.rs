//! # Error Types
//!
//! This module defines error types used throughout the qrsplit library.

use thiserror::Error;

/// Main error type for qrsplit operations
#[derive(Debug, Error)]
pub enum QrSplitError {
    /// Rejected before any work begins (bad version, missing input, bad paths)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Symbol version outside 1..=40
    #[error("Invalid QR version {0} (expected 1-40)")]
    InvalidVersion(u8),

    /// A chunk does not fit the symbol it was sized for.
    ///
    /// This means the capacity table and the encoding mode disagree and is
    /// never expected under a correct configuration.
    #[error("Chunk {index} is {len} bytes, exceeds symbol capacity of {capacity} bytes")]
    PayloadTooLarge {
        index: usize,
        len: usize,
        capacity: usize,
    },

    /// More chunks than a 6-digit file name can number
    #[error("Chunk index {0} does not fit in 6 digits")]
    IndexOverflow(usize),

    /// QR symbol construction failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// Image rendering or saving failed
    #[error("Image error: {0}")]
    Image(String),

    /// Encoder thread pool could not be started
    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for qrsplit operations
pub type Result<T> = std::result::Result<T, QrSplitError>;
