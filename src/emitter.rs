//! # Emitter
//!
//! Writes rendered symbols to `{output_dir}/qr_{index:06}.png`.
//!
//! Zero padding makes filename order equal chunk order, so
//! `cat out/qr_*` reassembles the payload once each image is decoded.
//! An index that needs a seventh digit is an error rather than a silently
//! mis-sorting filename.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{QrSplitError, Result};
use crate::symbol::RenderedSymbol;

/// Filename prefix for output images
pub const IMAGE_PREFIX: &str = "qr";

/// Largest index that fits the 6-digit filename field
pub const MAX_INDEX: usize = 999_999;

/// Writes numbered images into one directory.
#[derive(Debug, Clone)]
pub struct Emitter {
    output_dir: PathBuf,
}

impl Emitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Create the output directory and its parents. Safe to repeat.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Path for the image at `index`.
    ///
    /// ```
    /// use qrsplit::emitter::Emitter;
    ///
    /// let emitter = Emitter::new("out");
    /// assert!(emitter.path_for(42)?.ends_with("qr_000042.png"));
    /// assert!(emitter.path_for(1_000_000).is_err());
    /// # Ok::<(), qrsplit::QrSplitError>(())
    /// ```
    pub fn path_for(&self, index: usize) -> Result<PathBuf> {
        if index > MAX_INDEX {
            return Err(QrSplitError::IndexOverflow(index));
        }
        Ok(self
            .output_dir
            .join(format!("{}_{:06}.png", IMAGE_PREFIX, index)))
    }

    /// Write `symbol` as PNG under its index, creating the directory if needed.
    pub fn emit(&self, index: usize, symbol: &RenderedSymbol) -> Result<PathBuf> {
        let path = self.path_for(index)?;
        self.prepare()?;
        symbol
            .image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| QrSplitError::Image(format!("Failed to save {}: {}", path.display(), e)))?;
        debug!(index, path = %path.display(), "wrote symbol");
        Ok(path)
    }
}
