//! # Run Configuration
//!
//! Settings for one split run, checked by [`SplitConfig::validate`] before
//! anything touches the filesystem.
//!
//! ## Defaults
//!
//! | Setting | Default |
//! |---------|---------|
//! | `output_dir` | `./out` |
//! | `version` | 40 |
//! | `hex` | off |
//! | `jobs` | 1 |
//! | `temp_dir` | system temp directory |
//!
//! ## Usage
//!
//! ```no_run
//! use qrsplit::config::SplitConfig;
//!
//! let config = SplitConfig {
//!     hex: true,
//!     version: 25,
//!     ..SplitConfig::new("backup.tar")
//! };
//! config.validate()?;
//! # Ok::<(), qrsplit::QrSplitError>(())
//! ```

use std::fs;
use std::path::PathBuf;

use crate::capacity::{MAX_VERSION, MIN_VERSION};
use crate::error::{QrSplitError, Result};

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "./out";

/// Default QR version (largest symbol, fewest images)
pub const DEFAULT_VERSION: u8 = MAX_VERSION;

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// File to split
    pub input: PathBuf,
    /// Where images are written
    pub output_dir: PathBuf,
    /// QR symbol version (1-40)
    pub version: u8,
    /// Hex-transcode first and use alphanumeric capacity
    pub hex: bool,
    /// Encoder threads
    pub jobs: usize,
    /// Directory for the transient hex file
    pub temp_dir: Option<PathBuf>,
}

impl SplitConfig {
    /// Defaults for everything but the input path.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            version: DEFAULT_VERSION,
            hex: false,
            jobs: 1,
            temp_dir: None,
        }
    }

    /// Reject settings that would fail mid-run. Has no side effects.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_VERSION..=MAX_VERSION).contains(&self.version) {
            return Err(invalid(format!(
                "QR version must be between {} and {}, got {}",
                MIN_VERSION, MAX_VERSION, self.version
            )));
        }

        if self.jobs == 0 {
            return Err(invalid("jobs must be at least 1".to_string()));
        }

        match fs::metadata(&self.input) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(invalid(format!(
                    "input {} is not a regular file",
                    self.input.display()
                )));
            }
            Err(e) => {
                return Err(invalid(format!(
                    "cannot read input {}: {}",
                    self.input.display(),
                    e
                )));
            }
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(invalid(format!(
                "output path {} exists and is not a directory",
                self.output_dir.display()
            )));
        }

        if let Some(dir) = &self.temp_dir {
            if !dir.is_dir() {
                return Err(invalid(format!(
                    "temp directory {} does not exist",
                    dir.display()
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: String) -> QrSplitError {
    QrSplitError::InvalidConfiguration(msg)
}
