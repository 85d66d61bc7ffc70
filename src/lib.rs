//! # qrsplit - Files as printable QR code sequences
//!
//! qrsplit cuts an arbitrary file into chunks that each fill one QR symbol
//! and writes every chunk as a numbered PNG. Concatenating the decoded
//! payloads in filename order gives back the original bytes.
//!
//! ## Quick Start
//!
//! ```no_run
//! use qrsplit::{Orchestrator, SplitConfig};
//!
//! let config = SplitConfig {
//!     output_dir: "scans".into(),
//!     ..SplitConfig::new("archive.tar.gz")
//! };
//!
//! let report = Orchestrator::new(config).run()?;
//! println!("{} images written", report.chunks);
//! # Ok::<(), qrsplit::QrSplitError>(())
//! ```
//!
//! ## Binary vs Hex Mode
//!
//! | Mode | Chunked stream | Capacity (v40-L) | Reassembly |
//! |------|----------------|------------------|------------|
//! | Binary | Raw bytes | 2953 bytes | `cat` the payloads |
//! | Hex | Uppercase hex text (2x) | 4296 chars | `cat`, then hex-decode |
//!
//! Hex mode makes every payload printable text, which many scanner apps
//! handle better than raw bytes.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`capacity`] | Per-version symbol capacity table |
//! | [`plan`] | Split size and mode for a run |
//! | [`transcode`] | Streaming hex transcoding to a temp file |
//! | [`chunker`] | Sequential fixed-size chunking |
//! | [`symbol`] | QR rendering adapter |
//! | [`emitter`] | Numbered PNG output |
//! | [`config`] | Run configuration |
//! | [`pipeline`] | Orchestration, cleanup, parallel encoding |
//! | [`error`] | Error types |

pub mod capacity;
pub mod chunker;
pub mod config;
pub mod emitter;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod symbol;
pub mod transcode;

// Re-exports for convenience
pub use capacity::{CapacityTable, EncodingMode};
pub use config::SplitConfig;
pub use error::QrSplitError;
pub use pipeline::{Orchestrator, RunReport};
pub use plan::ChunkPlan;
