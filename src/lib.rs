//! Xorsweep - Parallel Single-Byte XOR Detector
//!
//! Scans a file of hex-encoded lines for the ones that were encrypted with a
//! single repeating byte. Every line is tried against all 256 keys and each
//! decoding made only of plausible text characters is reported together with
//! the key and where the line came from.
//!
//! ## Sweep Pipeline
//!
//! ```text
//! Input → Split → Unit files → Workers (one thread per unit) → Aggregate → Report
//! ```
//!
//! - **Split**: partition the input into contiguous runs of whole lines,
//!   sized by a byte budget of `file size / workers`; the last unit takes
//!   whatever remains
//! - **Worker**: decode each line of its unit, try every key, keep
//!   plausible decodings
//! - **Aggregate**: gather one batch per unit in arrival order, recording
//!   units that panicked, failed or missed the deadline
//! - **Cleanup**: unit files are removed when the split set is dropped
//!
//! ## Example
//!
//! ```no_run
//! use xorsweep::{sweep_file, SweepOptions};
//! use std::path::Path;
//!
//! let report = sweep_file(Path::new("4.txt"), &SweepOptions::with_workers(4)).unwrap();
//! for record in &report.records {
//!     println!("{}", record);
//! }
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use cli::{scan_file, sweep_file};
pub use codec::Charset;
pub use config::SweepOptions;
pub use error::{Result, XorsweepError};
pub use report::{Report, ResultRecord};
