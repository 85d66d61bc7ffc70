//! # Hex Transcoding
//!
//! Rewrites an input file as uppercase hexadecimal text so every chunk can be
//! carried in the QR alphanumeric class.
//!
//! The output lives in a [`TransientHexFile`]: a temp file owned by whoever
//! called [`transcode`]. It is removed by [`TransientHexFile::cleanup`], or on
//! drop if an early return skips the explicit cleanup.
//!
//! ## Streaming
//!
//! Input is read in [`BLOCK_SIZE`] blocks and each block is written as
//! `2 * BLOCK_SIZE` hex characters, so memory use does not grow with the
//! input.
//!
//! ```text
//! 0x00 0xAB 0xFF  →  "00ABFF"
//! ```

use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::error::Result;

/// Bytes read per block while transcoding
pub const BLOCK_SIZE: usize = 64 * 1024;

const TEMP_PREFIX: &str = "qrsplit-";
const TEMP_SUFFIX: &str = ".hex";

/// Hex-transcoded copy of the input, deleted when the run ends.
#[derive(Debug)]
pub struct TransientHexFile {
    path: TempPath,
    len: u64,
}

impl TransientHexFile {
    /// Location of the hex text.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of hex characters written (twice the input length).
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True when the input was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Delete the file.
    ///
    /// A file that is already gone counts as cleaned up.
    pub fn cleanup(self) -> Result<()> {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => {
                debug!(path = %shown, "removed transient hex file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %shown, "transient hex file already removed");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Transcode `input` into a new temp file.
///
/// The file is created in `temp_dir`, or in the system temp directory when
/// `None`. On failure nothing is left behind.
pub fn transcode(input: &Path, temp_dir: Option<&Path>) -> Result<TransientHexFile> {
    let reader = File::open(input)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(TEMP_SUFFIX);
    let temp = match temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let (file, path) = temp.into_parts();

    let mut writer = BufWriter::new(file);
    let len = transcode_stream(reader, &mut writer)?;
    writer.flush()?;

    debug!(path = %path.display(), hex_chars = len, "transcoded input to hex");
    Ok(TransientHexFile { path, len })
}

/// Copy `reader` to `writer` as uppercase hex, returning characters written.
pub fn transcode_stream<R: Read, W: Write>(mut reader: R, mut writer: W) -> io::Result<u64> {
    let mut block = vec![0u8; BLOCK_SIZE];
    let mut written = 0u64;

    loop {
        let n = match reader.read(&mut block) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let text = hex::encode_upper(&block[..n]);
        writer.write_all(text.as_bytes())?;
        written += text.len() as u64;
    }

    Ok(written)
}
