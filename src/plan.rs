//! Chunk plan: the split size, mode and version fixed for one run.

use crate::capacity::{CapacityTable, EncodingMode};
use crate::error::Result;

/// Sizing decision derived once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Bytes per chunk (one symbol's full capacity)
    pub split_size_bytes: usize,
    /// Encoding class used for every symbol of the run
    pub mode: EncodingMode,
    /// QR symbol version
    pub version: u8,
}

impl ChunkPlan {
    /// Pick the mode from the hex flag and size chunks to that mode's capacity.
    ///
    /// ```
    /// use qrsplit::capacity::{CapacityTable, EncodingMode};
    /// use qrsplit::plan::ChunkPlan;
    ///
    /// let plan = ChunkPlan::for_config(&CapacityTable::LOW, 40, true)?;
    /// assert_eq!(plan.mode, EncodingMode::Alphanumeric);
    /// assert_eq!(plan.split_size_bytes, 4296);
    /// # Ok::<(), qrsplit::QrSplitError>(())
    /// ```
    pub fn for_config(table: &CapacityTable, version: u8, hex: bool) -> Result<Self> {
        let mode = EncodingMode::from_hex_flag(hex);
        let split_size_bytes = table.lookup(version, mode)?;
        Ok(Self {
            split_size_bytes,
            mode,
            version,
        })
    }

    /// Number of chunks (and images) an input of `input_len` bytes produces.
    pub fn expected_chunks(&self, input_len: u64) -> u64 {
        self.mode
            .effective_len(input_len)
            .div_ceil(self.split_size_bytes as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_plan_v40() {
        let plan = ChunkPlan::for_config(&CapacityTable::LOW, 40, false).unwrap();
        assert_eq!(plan.mode, EncodingMode::Binary);
        assert_eq!(plan.split_size_bytes, 2953);
        assert_eq!(plan.expected_chunks(5000), 2);
    }

    #[test]
    fn test_hex_plan_v40() {
        let plan = ChunkPlan::for_config(&CapacityTable::LOW, 40, true).unwrap();
        assert_eq!(plan.expected_chunks(5000), 3);
    }

    #[test]
    fn test_expected_chunks_edges() {
        let plan = ChunkPlan::for_config(&CapacityTable::LOW, 1, false).unwrap();
        assert_eq!(plan.expected_chunks(0), 0);
        assert_eq!(plan.expected_chunks(1), 1);
        assert_eq!(plan.expected_chunks(17), 1);
        assert_eq!(plan.expected_chunks(18), 2);
    }

    #[test]
    fn test_invalid_version_rejected() {
        assert!(ChunkPlan::for_config(&CapacityTable::LOW, 0, false).is_err());
        assert!(ChunkPlan::for_config(&CapacityTable::LOW, 41, true).is_err());
    }
}
