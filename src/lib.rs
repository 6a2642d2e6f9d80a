//! Nanodiff: streaming line diff of an actual document against an expected one.
//!
//! The crate provides:
//! - Line sources that read a document fully up front or on demand (`source`)
//! - The greedy single-pass diff engine (`engine`)
//! - Unified-diff style rendering (`render`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use nanodiff::engine::{DiffLineType, RecordingSink, do_diff};
//! use nanodiff::source::BufferedSource;
//!
//! let expected = BufferedSource::from_lines(["a", "b", "c"]);
//! let actual = BufferedSource::from_lines(["a", "Z", "b", "c"]);
//!
//! let mut sink = RecordingSink::new();
//! let has_diff = do_diff(expected, actual, &mut sink);
//!
//! assert!(has_diff);
//! assert_eq!(sink.records[0], (DiffLineType::ActualOnly, b"Z".to_vec()));
//! ```

pub mod engine;
pub mod io;
pub mod render;
pub mod source;

#[cfg(feature = "cli")]
pub mod cli;

pub use engine::{DiffEngine, DiffLine, DiffLineType, DiffOptions, DiffSink, do_diff};
pub use source::{BufferedSource, LineSource, StreamingSource};
