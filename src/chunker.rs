//! # Chunker
//!
//! Splits a byte stream into consecutive fixed-size chunks, one per QR
//! symbol.
//!
//! ## Guarantees
//!
//! - Every byte appears in exactly one chunk, in order
//! - All chunks except the last are exactly `split_size` bytes
//! - The last chunk holds 1..=`split_size` bytes; an empty input yields none
//! - Indices start at 0 and increase by one
//!
//! Chunk boundaries are plain byte offsets. Nothing inside the payload is
//! inspected.
//!
//! ## Example
//!
//! ```
//! use qrsplit::chunker::Chunker;
//!
//! let data = vec![7u8; 5000];
//! let chunks: Vec<_> = Chunker::new(&data[..], 2953)?
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[1].bytes.len(), 2047);
//! assert!(chunks[1].is_final);
//! # Ok::<(), qrsplit::QrSplitError>(())
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::error::{QrSplitError, Result};

/// A contiguous slice of the input assigned to one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the output sequence
    pub index: usize,
    /// Payload, never empty
    pub bytes: Vec<u8>,
    /// True for the last chunk of the stream
    pub is_final: bool,
}

/// Lazy sequential reader yielding [`Chunk`]s.
///
/// Reads one chunk ahead so the final chunk can be flagged. After the first
/// error the iterator is fused.
pub struct Chunker<R> {
    reader: R,
    split_size: usize,
    next_index: usize,
    lookahead: Option<Vec<u8>>,
    done: bool,
}

impl<R: Read> Chunker<R> {
    /// Wrap a reader. `split_size` must be at least 1.
    pub fn new(reader: R, split_size: usize) -> Result<Self> {
        if split_size == 0 {
            return Err(QrSplitError::InvalidConfiguration(
                "split size must be at least 1 byte".to_string(),
            ));
        }
        Ok(Self {
            reader,
            split_size,
            next_index: 0,
            lookahead: None,
            done: false,
        })
    }

    /// Read up to `split_size` bytes, short only at end of stream.
    fn read_block(&mut self) -> io::Result<Vec<u8>> {
        let mut block = Vec::with_capacity(self.split_size);
        self.reader
            .by_ref()
            .take(self.split_size as u64)
            .read_to_end(&mut block)?;
        Ok(block)
    }

    fn fail(&mut self, err: io::Error) -> Option<Result<Chunk>> {
        self.done = true;
        Some(Err(err.into()))
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = match self.lookahead.take() {
            Some(block) => block,
            None => match self.read_block() {
                Ok(block) => block,
                Err(e) => return self.fail(e),
            },
        };
        if current.is_empty() {
            self.done = true;
            return None;
        }

        let next = match self.read_block() {
            Ok(block) => block,
            Err(e) => return self.fail(e),
        };
        let is_final = next.is_empty();
        if is_final {
            self.done = true;
        } else {
            self.lookahead = Some(next);
        }

        let index = self.next_index;
        self.next_index += 1;
        Some(Ok(Chunk {
            index,
            bytes: current,
            is_final,
        }))
    }
}

/// Open `path` and chunk it from the beginning.
pub fn chunks(path: &Path, split_size: usize) -> Result<Chunker<BufReader<File>>> {
    let file = File::open(path)?;
    Chunker::new(BufReader::new(file), split_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &[u8], split: usize) -> Vec<Chunk> {
        Chunker::new(data, split)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(collect(&[], 10).is_empty());
    }

    #[test]
    fn test_exact_multiple() {
        let data: Vec<u8> = (0..30).collect();
        let chunks = collect(&data, 10);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.bytes.len() == 10));
        assert!(chunks[2].is_final);
        assert!(!chunks[1].is_final);
    }

    #[test]
    fn test_short_final_chunk() {
        let data: Vec<u8> = (0..=255).cycle().take(5000).collect();
        let chunks = collect(&data, 2953);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].bytes, &data[..2953]);
        assert_eq!(chunks[1].bytes, &data[2953..]);
        assert_eq!(chunks[1].bytes.len(), 2047);
    }

    #[test]
    fn test_indices_and_concatenation() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 7 % 256) as u8).collect();
        for split in [1, 3, 17, 999, 1000, 1001] {
            let chunks = collect(&data, split);
            assert_eq!(chunks.len(), data.len().div_ceil(split));
            for (i, chunk) in chunks.iter().enumerate() {
                assert_eq!(chunk.index, i);
                assert!(!chunk.bytes.is_empty());
                assert_eq!(chunk.is_final, i == chunks.len() - 1);
            }
            let joined: Vec<u8> = chunks.into_iter().flat_map(|c| c.bytes).collect();
            assert_eq!(joined, data);
        }
    }

    #[test]
    fn test_zero_split_rejected() {
        assert!(matches!(
            Chunker::new(&b"abc"[..], 0),
            Err(QrSplitError::InvalidConfiguration(_))
        ));
    }

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_short_reads_still_fill_chunks() {
        let data = vec![0x5Au8; 100];
        let reader = Trickle {
            data: &data,
            step: 3,
        };
        let chunks: Vec<_> = Chunker::new(reader, 40)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let sizes: Vec<_> = chunks.iter().map(|c| c.bytes.len()).collect();
        assert_eq!(sizes, vec![40, 40, 20]);
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_read_error_is_reported_once() {
        let mut chunker = Chunker::new(Broken, 8).unwrap();
        assert!(matches!(chunker.next(), Some(Err(QrSplitError::Io(_)))));
        assert!(chunker.next().is_none());
    }
}
