//! # Split Pipeline
//!
//! Drives one run from configuration to finished images.
//!
//! ```text
//! Configuring → [Transcoding] → SplittingAndEncoding → Cleanup → Done | Failed
//! ```
//!
//! ## Stages
//!
//! - **Configuring**: validate settings, derive the [`ChunkPlan`], create the
//!   output directory. Nothing is created if validation fails.
//! - **Transcoding** (hex mode only): write the input as uppercase hex to a
//!   [`TransientHexFile`].
//! - **SplittingAndEncoding**: chunk the (possibly transcoded) input, render
//!   each chunk and write it under its index.
//! - **Cleanup**: delete the transient hex file. Runs exactly once whether or
//!   not the previous stage succeeded.
//!
//! A failure in any stage ends the run with that stage's error, after
//! cleanup.
//!
//! ## Parallel Encoding
//!
//! With `jobs > 1` the chunker still reads sequentially on the calling
//! thread. Chunks are handed to a rayon pool in batches of
//! `jobs * BATCH_PER_WORKER`; each worker writes to the path keyed by its
//! chunk's index, so completion order does not matter. The first error stops
//! the batch and no further chunks are read.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{debug, info, warn};

use crate::capacity::CapacityTable;
use crate::chunker::{self, Chunk, Chunker};
use crate::config::SplitConfig;
use crate::emitter::{Emitter, MAX_INDEX};
use crate::error::{QrSplitError, Result};
use crate::plan::ChunkPlan;
use crate::symbol::{QrSymbolEncoder, SymbolEncoder};
use crate::transcode::{self, TransientHexFile};

/// Chunks queued per worker thread in one batch
pub const BATCH_PER_WORKER: usize = 4;

/// Pipeline stage, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuring,
    Transcoding,
    SplittingAndEncoding,
    Cleanup,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuring => "configuring",
            Stage::Transcoding => "transcoding",
            Stage::SplittingAndEncoding => "splitting",
            Stage::Cleanup => "cleanup",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a finished (or planned) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Sizing used for every chunk
    pub plan: ChunkPlan,
    /// Size of the original input
    pub input_bytes: u64,
    /// Size of the chunked stream (doubled in hex mode)
    pub effective_bytes: u64,
    /// Number of chunks, one image each
    pub chunks: usize,
    /// Image paths in index order
    pub outputs: Vec<PathBuf>,
}

/// Runs the split pipeline for one configuration.
pub struct Orchestrator<E = QrSymbolEncoder> {
    config: SplitConfig,
    table: CapacityTable,
    encoder: E,
}

impl Orchestrator<QrSymbolEncoder> {
    /// Pipeline with the level-L table and the `qrcode` renderer.
    pub fn new(config: SplitConfig) -> Self {
        let table = CapacityTable::LOW;
        Self {
            config,
            table,
            encoder: QrSymbolEncoder::new(table),
        }
    }
}

impl<E: SymbolEncoder> Orchestrator<E> {
    /// Pipeline with a custom table and symbol encoder.
    pub fn with_encoder(config: SplitConfig, table: CapacityTable, encoder: E) -> Self {
        Self {
            config,
            table,
            encoder,
        }
    }

    /// The symbol encoder this pipeline renders with.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Validate and plan without touching the filesystem.
    ///
    /// The report lists the paths a real run would write.
    pub fn dry_run(&self) -> Result<RunReport> {
        let (plan, input_bytes) = self.configure()?;
        let effective_bytes = plan.mode.effective_len(input_bytes);
        let chunks = plan.expected_chunks(input_bytes) as usize;

        let emitter = Emitter::new(&self.config.output_dir);
        let outputs = (0..chunks)
            .map(|index| emitter.path_for(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(RunReport {
            plan,
            input_bytes,
            effective_bytes,
            chunks,
            outputs,
        })
    }

    /// Run the pipeline to completion.
    pub fn run(&self) -> Result<RunReport> {
        match self.run_stages() {
            Ok(report) => {
                enter(Stage::Done);
                info!(
                    chunks = report.chunks,
                    input_bytes = report.input_bytes,
                    output_dir = %self.config.output_dir.display(),
                    "split complete"
                );
                Ok(report)
            }
            Err(e) => {
                enter(Stage::Failed);
                Err(e)
            }
        }
    }

    fn run_stages(&self) -> Result<RunReport> {
        let (plan, input_bytes) = self.configure()?;
        let emitter = Emitter::new(&self.config.output_dir);
        emitter.prepare()?;

        let transient = if self.config.hex {
            enter(Stage::Transcoding);
            Some(transcode::transcode(
                &self.config.input,
                self.config.temp_dir.as_deref(),
            )?)
        } else {
            None
        };
        let source = transient
            .as_ref()
            .map_or(self.config.input.as_path(), |t| t.path());

        enter(Stage::SplittingAndEncoding);
        let outcome = self.split_and_encode(source, &plan, &emitter);

        let cleaned = cleanup(transient);
        let outputs = match (outcome, cleaned) {
            (Ok(outputs), Ok(())) => outputs,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), cleaned) => {
                if let Err(cleanup_err) = cleaned {
                    warn!(error = %cleanup_err, "cleanup failed after an earlier error");
                }
                return Err(e);
            }
        };

        Ok(RunReport {
            plan,
            input_bytes,
            effective_bytes: plan.mode.effective_len(input_bytes),
            chunks: outputs.len(),
            outputs,
        })
    }

    /// Validate, plan, and check the run fits the 6-digit index space.
    fn configure(&self) -> Result<(ChunkPlan, u64)> {
        enter(Stage::Configuring);
        self.config.validate()?;

        let plan = ChunkPlan::for_config(&self.table, self.config.version, self.config.hex)?;
        let input_bytes = fs::metadata(&self.config.input)?.len();

        let expected = plan.expected_chunks(input_bytes);
        if expected > (MAX_INDEX as u64) + 1 {
            return Err(QrSplitError::IndexOverflow((expected - 1) as usize));
        }

        info!(
            input = %self.config.input.display(),
            input_bytes,
            version = plan.version,
            mode = %plan.mode,
            split_size = plan.split_size_bytes,
            expected_chunks = expected,
            "planned split"
        );
        Ok((plan, input_bytes))
    }

    fn split_and_encode(
        &self,
        source: &Path,
        plan: &ChunkPlan,
        emitter: &Emitter,
    ) -> Result<Vec<PathBuf>> {
        let chunks = chunker::chunks(source, plan.split_size_bytes)?;

        if self.config.jobs <= 1 {
            chunks
                .map(|chunk| self.encode_one(&chunk?, plan, emitter))
                .collect()
        } else {
            self.encode_parallel(chunks, plan, emitter)
        }
    }

    fn encode_parallel<R: Read>(
        &self,
        chunks: Chunker<R>,
        plan: &ChunkPlan,
        emitter: &Emitter,
    ) -> Result<Vec<PathBuf>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .thread_name(|i| format!("qrsplit-encoder-{}", i))
            .build()
            .map_err(|e| QrSplitError::WorkerPool(e.to_string()))?;

        let batch_len = self.config.jobs * BATCH_PER_WORKER;
        let mut batch = Vec::with_capacity(batch_len);
        let mut outputs = Vec::new();

        for chunk in chunks {
            batch.push(chunk?);
            if batch.len() == batch_len {
                outputs.extend(self.encode_batch(&pool, &batch, plan, emitter)?);
                batch.clear();
            }
        }
        if !batch.is_empty() {
            outputs.extend(self.encode_batch(&pool, &batch, plan, emitter)?);
        }

        Ok(outputs)
    }

    fn encode_batch(
        &self,
        pool: &ThreadPool,
        batch: &[Chunk],
        plan: &ChunkPlan,
        emitter: &Emitter,
    ) -> Result<Vec<PathBuf>> {
        pool.install(|| {
            batch
                .par_iter()
                .map(|chunk| self.encode_one(chunk, plan, emitter))
                .collect()
        })
    }

    fn encode_one(&self, chunk: &Chunk, plan: &ChunkPlan, emitter: &Emitter) -> Result<PathBuf> {
        // Fail on overflow before spending time on rendering
        emitter.path_for(chunk.index)?;

        let symbol = self.encoder.encode(chunk, plan)?;
        let path = emitter.emit(chunk.index, &symbol)?;
        debug!(
            index = chunk.index,
            len = chunk.bytes.len(),
            is_final = chunk.is_final,
            "encoded chunk"
        );
        Ok(path)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "entering stage");
}

fn cleanup(transient: Option<TransientHexFile>) -> Result<()> {
    match transient {
        Some(file) => {
            enter(Stage::Cleanup);
            file.cleanup()
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(len: usize) -> (tempfile::TempDir, SplitConfig) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let data: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
        fs::write(&input, data).unwrap();
        let config = SplitConfig {
            output_dir: dir.path().join("out"),
            temp_dir: Some(dir.path().to_path_buf()),
            ..SplitConfig::new(input)
        };
        (dir, config)
    }

    #[test]
    fn test_dry_run_creates_nothing() {
        let (dir, config) = setup(5000);
        let report = Orchestrator::new(config).dry_run().unwrap();
        assert_eq!(report.chunks, 2);
        assert_eq!(report.effective_bytes, 5000);
        assert!(report.outputs[1].ends_with("qr_000001.png"));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_dry_run_hex() {
        let (_dir, config) = setup(5000);
        let config = SplitConfig { hex: true, ..config };
        let report = Orchestrator::new(config).dry_run().unwrap();
        assert_eq!(report.chunks, 3);
        assert_eq!(report.effective_bytes, 10000);
        assert_eq!(report.plan.split_size_bytes, 4296);
    }

    #[test]
    fn test_index_overflow_detected_up_front() {
        // Version 1 binary holds 17 bytes; this needs 1_000_001 chunks
        let (dir, config) = setup(17 * 1_000_000 + 1);
        let config = SplitConfig { version: 1, ..config };
        let result = Orchestrator::new(config).run();
        assert!(matches!(result, Err(QrSplitError::IndexOverflow(1_000_000))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::SplittingAndEncoding.to_string(), "splitting");
        assert_eq!(Stage::Cleanup.to_string(), "cleanup");
    }
}
