//! # QR Capacity Table
//!
//! Maximum payload per QR symbol version, for the two encoding classes this
//! crate uses, at error-correction level L.
//!
//! ## Encoding Classes
//!
//! | Mode | Characters | Bits per char | v40-L capacity |
//! |------|------------|---------------|----------------|
//! | Binary | Any byte | 8 | 2953 |
//! | Alphanumeric | 0-9, A-Z, space, $%*+-./: | 5.5 | 4296 |
//!
//! Uppercase hexadecimal text only uses `0-9A-F`, so a hex-transcoded payload
//! always fits the alphanumeric class. It is twice as long as the raw bytes
//! but packs 45% more characters per symbol.
//!
//! ## Usage
//!
//! ```
//! use qrsplit::capacity::{CapacityTable, EncodingMode};
//!
//! let table = CapacityTable::LOW;
//! assert_eq!(table.lookup(40, EncodingMode::Binary)?, 2953);
//! assert_eq!(table.lookup(40, EncodingMode::Alphanumeric)?, 4296);
//! # Ok::<(), qrsplit::QrSplitError>(())
//! ```
//!
//! ## Reference
//!
//! ISO/IEC 18004:2015, Table 7 (<http://www.qrcode.com/en/about/version.html>)

use std::fmt;

use crate::error::{QrSplitError, Result};

/// Smallest QR symbol version
pub const MIN_VERSION: u8 = 1;

/// Largest QR symbol version
pub const MAX_VERSION: u8 = 40;

/// Payload encoding class of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingMode {
    /// Raw bytes, 8 bits each
    #[default]
    Binary,
    /// Uppercase hex text, packed two characters per 11 bits
    Alphanumeric,
}

impl EncodingMode {
    /// Mode implied by the hex flag.
    pub fn from_hex_flag(hex: bool) -> Self {
        if hex { Self::Alphanumeric } else { Self::Binary }
    }

    /// Length of the stream that actually gets chunked for an input of
    /// `input_len` bytes (hex transcoding doubles it).
    pub fn effective_len(self, input_len: u64) -> u64 {
        match self {
            Self::Binary => input_len,
            Self::Alphanumeric => input_len * 2,
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Alphanumeric => f.write_str("alphanumeric"),
        }
    }
}

/// One row of the capacity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityEntry {
    /// Symbol version (1-40)
    pub version: u8,
    /// Maximum alphanumeric characters
    pub alphanumeric_max_bytes: u16,
    /// Maximum raw bytes
    pub binary_max_bytes: u16,
}

impl CapacityEntry {
    const fn new(version: u8, binary_max_bytes: u16, alphanumeric_max_bytes: u16) -> Self {
        Self {
            version,
            alphanumeric_max_bytes,
            binary_max_bytes,
        }
    }

    /// Capacity for the given mode.
    #[inline]
    pub fn max_bytes(&self, mode: EncodingMode) -> usize {
        match mode {
            EncodingMode::Binary => self.binary_max_bytes as usize,
            EncodingMode::Alphanumeric => self.alphanumeric_max_bytes as usize,
        }
    }
}

/// Level L capacities, one row per version: (version, binary, alphanumeric).
const LEVEL_L: [CapacityEntry; MAX_VERSION as usize] = [
    CapacityEntry::new(1, 17, 25),
    CapacityEntry::new(2, 32, 47),
    CapacityEntry::new(3, 53, 77),
    CapacityEntry::new(4, 78, 114),
    CapacityEntry::new(5, 106, 154),
    CapacityEntry::new(6, 134, 195),
    CapacityEntry::new(7, 154, 224),
    CapacityEntry::new(8, 192, 279),
    CapacityEntry::new(9, 230, 335),
    CapacityEntry::new(10, 271, 395),
    CapacityEntry::new(11, 321, 468),
    CapacityEntry::new(12, 367, 535),
    CapacityEntry::new(13, 425, 619),
    CapacityEntry::new(14, 458, 667),
    CapacityEntry::new(15, 520, 758),
    CapacityEntry::new(16, 586, 854),
    CapacityEntry::new(17, 644, 938),
    CapacityEntry::new(18, 718, 1046),
    CapacityEntry::new(19, 792, 1153),
    CapacityEntry::new(20, 858, 1249),
    CapacityEntry::new(21, 929, 1352),
    CapacityEntry::new(22, 1003, 1460),
    CapacityEntry::new(23, 1091, 1588),
    CapacityEntry::new(24, 1171, 1704),
    CapacityEntry::new(25, 1273, 1853),
    CapacityEntry::new(26, 1367, 1990),
    CapacityEntry::new(27, 1465, 2132),
    CapacityEntry::new(28, 1528, 2223),
    CapacityEntry::new(29, 1628, 2369),
    CapacityEntry::new(30, 1732, 2520),
    CapacityEntry::new(31, 1840, 2677),
    CapacityEntry::new(32, 1952, 2840),
    CapacityEntry::new(33, 2068, 3009),
    CapacityEntry::new(34, 2188, 3183),
    CapacityEntry::new(35, 2303, 3351),
    CapacityEntry::new(36, 2431, 3537),
    CapacityEntry::new(37, 2563, 3729),
    CapacityEntry::new(38, 2699, 3927),
    CapacityEntry::new(39, 2809, 4087),
    CapacityEntry::new(40, 2953, 4296),
];

/// # Capacity Table
///
/// Immutable lookup of maximum payload per (version, mode). The table is a
/// value so callers can hold the one matching their error-correction level;
/// only level L is provided, matching the symbol encoder.
#[derive(Debug, Clone, Copy)]
pub struct CapacityTable {
    rows: &'static [CapacityEntry; MAX_VERSION as usize],
}

impl CapacityTable {
    /// Error-correction level L (~7% recovery, highest capacity)
    pub const LOW: Self = Self { rows: &LEVEL_L };

    /// Full row for a version.
    pub fn entry(&self, version: u8) -> Result<CapacityEntry> {
        if !(MIN_VERSION..=MAX_VERSION).contains(&version) {
            return Err(QrSplitError::InvalidVersion(version));
        }
        Ok(self.rows[(version - 1) as usize])
    }

    /// Maximum payload bytes for a version in the given mode.
    pub fn lookup(&self, version: u8, mode: EncodingMode) -> Result<usize> {
        Ok(self.entry(version)?.max_bytes(mode))
    }

    /// All 40 rows in version order.
    pub fn entries(&self) -> impl Iterator<Item = &CapacityEntry> {
        self.rows.iter()
    }
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self::LOW
    }
}
