//! # Symbol Encoding
//!
//! Turns one chunk into one rendered QR symbol.
//!
//! Symbol construction (module placement, Reed-Solomon, masking) is done by
//! the `qrcode` crate. This module only pins its parameters:
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | Error correction | L (~7% recovery) |
//! | Version | Fixed per run, never auto-fitted |
//! | Segments | One segment in the run's mode, payload verbatim |
//! | Module size | 10 px |
//! | Quiet zone | 4 modules |
//!
//! Segment optimization is not used. Chunk sizes come from the capacity
//! table, which counts a single verbatim segment.

use image::{GrayImage, Luma};
use qrcode::bits::Bits;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

use crate::capacity::{CapacityTable, EncodingMode};
use crate::chunker::Chunk;
use crate::error::{QrSplitError, Result};
use crate::plan::ChunkPlan;

/// Default module ("box") size in pixels
pub const DEFAULT_MODULE_SIZE: u32 = 10;

/// QR alphanumeric character set
const ALPHANUMERIC_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// A rendered symbol, ready to be written out.
#[derive(Debug, Clone)]
pub struct RenderedSymbol {
    /// Grayscale raster, black modules on white
    pub image: GrayImage,
    /// Symbol width in modules, excluding the quiet zone
    pub width_modules: usize,
}

/// Renders chunk payloads as symbols.
///
/// Implementations must be shareable across encoder threads.
pub trait SymbolEncoder: Sync {
    /// Render one chunk under the run's plan.
    fn encode(&self, chunk: &Chunk, plan: &ChunkPlan) -> Result<RenderedSymbol>;
}

/// [`SymbolEncoder`] backed by the `qrcode` crate.
#[derive(Debug, Clone)]
pub struct QrSymbolEncoder {
    table: CapacityTable,
    module_size: u32,
}

impl QrSymbolEncoder {
    /// Encoder at level L with the default rendering parameters.
    pub fn new(table: CapacityTable) -> Self {
        Self {
            table,
            module_size: DEFAULT_MODULE_SIZE,
        }
    }

    /// Override the module size in pixels (minimum 1).
    pub fn with_module_size(mut self, module_size: u32) -> Self {
        self.module_size = module_size.max(1);
        self
    }

    fn build_code(&self, chunk: &Chunk, plan: &ChunkPlan, capacity: usize) -> Result<QrCode> {
        let too_large = || QrSplitError::PayloadTooLarge {
            index: chunk.index,
            len: chunk.bytes.len(),
            capacity,
        };
        let map_err = |e: QrError| match e {
            QrError::DataTooLong => too_large(),
            other => QrSplitError::Encode(format!("chunk {}: {}", chunk.index, other)),
        };

        let mut bits = Bits::new(Version::Normal(plan.version as i16));
        let pushed = match plan.mode {
            EncodingMode::Binary => bits.push_byte_data(&chunk.bytes),
            EncodingMode::Alphanumeric => bits.push_alphanumeric_data(&chunk.bytes),
        };
        pushed.map_err(map_err)?;
        bits.push_terminator(EcLevel::L).map_err(map_err)?;

        QrCode::with_bits(bits, EcLevel::L).map_err(map_err)
    }
}

impl Default for QrSymbolEncoder {
    fn default() -> Self {
        Self::new(CapacityTable::LOW)
    }
}

impl SymbolEncoder for QrSymbolEncoder {
    fn encode(&self, chunk: &Chunk, plan: &ChunkPlan) -> Result<RenderedSymbol> {
        let capacity = self.table.lookup(plan.version, plan.mode)?;
        if chunk.bytes.len() > capacity {
            return Err(QrSplitError::PayloadTooLarge {
                index: chunk.index,
                len: chunk.bytes.len(),
                capacity,
            });
        }

        // The qrcode crate maps unknown characters to '0' instead of failing
        if plan.mode == EncodingMode::Alphanumeric {
            if let Some(pos) = chunk
                .bytes
                .iter()
                .position(|b| !ALPHANUMERIC_CHARSET.contains(b))
            {
                return Err(QrSplitError::Encode(format!(
                    "chunk {}: byte 0x{:02X} at offset {} is not alphanumeric",
                    chunk.index, chunk.bytes[pos], pos
                )));
            }
        }

        let code = self.build_code(chunk, plan, capacity)?;
        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .module_dimensions(self.module_size, self.module_size)
            .build();

        Ok(RenderedSymbol {
            image,
            width_modules: code.width(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{MAX_VERSION, MIN_VERSION};

    fn plan(version: u8, hex: bool) -> ChunkPlan {
        ChunkPlan::for_config(&CapacityTable::LOW, version, hex).unwrap()
    }

    fn data_for(plan: &ChunkPlan, len: usize) -> Vec<u8> {
        match plan.mode {
            EncodingMode::Binary => vec![0xA5; len],
            EncodingMode::Alphanumeric => b"0123456789ABCDEF"
                .iter()
                .copied()
                .cycle()
                .take(len)
                .collect(),
        }
    }

    fn chunk(bytes: Vec<u8>) -> Chunk {
        Chunk {
            index: 0,
            bytes,
            is_final: true,
        }
    }

    #[test]
    fn test_v1_dimensions() {
        let symbol = QrSymbolEncoder::default()
            .encode(&chunk(b"hello".to_vec()), &plan(1, false))
            .unwrap();
        // 21 modules + 2 * 4 quiet zone, 10 px each
        assert_eq!(symbol.width_modules, 21);
        assert_eq!(symbol.image.width(), 290);
        assert_eq!(symbol.image.height(), 290);
    }

    #[test]
    fn test_version_is_not_auto_fitted() {
        let symbol = QrSymbolEncoder::default()
            .with_module_size(1)
            .encode(&chunk(vec![1]), &plan(5, false))
            .unwrap();
        assert_eq!(symbol.width_modules, 17 + 4 * 5);
    }

    #[test]
    fn test_full_binary_capacity_fits() {
        for version in MIN_VERSION..=MAX_VERSION {
            let plan = plan(version, false);
            let data = data_for(&plan, plan.split_size_bytes);
            let result = QrSymbolEncoder::default()
                .with_module_size(1)
                .encode(&chunk(data), &plan);
            assert!(result.is_ok(), "version {} rejected a full chunk", version);

            let over = data_for(&plan, plan.split_size_bytes + 1);
            let rejected = QrSymbolEncoder::default()
                .with_module_size(1)
                .encode(&chunk(over), &plan);
            assert!(
                matches!(rejected, Err(QrSplitError::PayloadTooLarge { .. })),
                "version {} accepted an oversized chunk",
                version
            );
        }
    }

    #[test]
    fn test_full_alphanumeric_capacity_fits() {
        for version in MIN_VERSION..=MAX_VERSION {
            let plan = plan(version, true);
            let data = data_for(&plan, plan.split_size_bytes);
            let result = QrSymbolEncoder::default()
                .with_module_size(1)
                .encode(&chunk(data), &plan);
            assert!(result.is_ok(), "version {} rejected a full chunk", version);

            let over = data_for(&plan, plan.split_size_bytes + 1);
            let rejected = QrSymbolEncoder::default()
                .with_module_size(1)
                .encode(&chunk(over), &plan);
            assert!(
                matches!(rejected, Err(QrSplitError::PayloadTooLarge { .. })),
                "version {} accepted an oversized chunk",
                version
            );
        }
    }

    #[test]
    fn test_oversized_chunk_rejected() {
        let result = QrSymbolEncoder::default().encode(&chunk(vec![0; 18]), &plan(1, false));
        assert!(matches!(
            result,
            Err(QrSplitError::PayloadTooLarge {
                len: 18,
                capacity: 17,
                ..
            })
        ));
    }

    #[test]
    fn test_lowercase_hex_rejected() {
        let result = QrSymbolEncoder::default().encode(&chunk(b"00ab".to_vec()), &plan(1, true));
        assert!(matches!(result, Err(QrSplitError::Encode(_))));
    }

    #[test]
    fn test_image_is_black_and_white() {
        let symbol = QrSymbolEncoder::default()
            .with_module_size(2)
            .encode(&chunk(b"0123ABCD".to_vec()), &plan(2, true))
            .unwrap();
        assert!(symbol.image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        // Quiet zone corner is white
        assert_eq!(symbol.image.get_pixel(0, 0).0[0], 255);
    }
}
