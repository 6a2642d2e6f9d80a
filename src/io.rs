// File-level helpers: path validation and source construction.
//
// Everything that can fail before a comparison starts lives here, so the
// engine only ever sees sources that opened cleanly.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::{DiffEngine, DiffOptions, DiffSink};
use crate::source::{BufferedSource, LineSource, StreamingSource};

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to turn a path into a line source.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("'{}': File not found", .0.display())]
    NotFound(PathBuf),
    #[error("'{}': Not a file", .0.display())]
    NotAFile(PathBuf),
    #[error("Unable to open file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to read file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How a file is turned into a line source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// Read the whole file before comparing.
    Buffered,
    /// Read lines on demand while comparing.
    #[default]
    Streaming,
}

impl SourceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buffered => "buffered",
            Self::Streaming => "streaming",
        }
    }
}

/// Options for `diff_files()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDiffOptions {
    pub mode: SourceMode,
    /// A nonexistent path reads as an empty document.
    pub missing_as_empty: bool,
    pub engine: DiffOptions,
}

// ---------------------------------------------------------------------------
// Paths and sources
// ---------------------------------------------------------------------------

/// Check that `path` names an existing regular file and return its
/// canonical absolute form.
pub fn normalize_path(path: &Path) -> Result<PathBuf, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(InputError::NotAFile(path.to_path_buf()));
    }
    path.canonicalize().map_err(|source| InputError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate `path` and open it as a line source.
pub fn open_source(
    path: &Path,
    mode: SourceMode,
    missing_as_empty: bool,
) -> Result<Box<dyn LineSource>, InputError> {
    let path = match normalize_path(path) {
        Ok(p) => p,
        Err(InputError::NotFound(p)) if missing_as_empty => {
            log::info!("'{}' does not exist, reading it as empty", p.display());
            let empty = BufferedSource::from_reader(io::empty())
                .map_err(|source| InputError::Read { path: p, source })?;
            return Ok(Box::new(empty));
        }
        Err(e) => return Err(e),
    };

    let file = File::open(&path).map_err(|source| InputError::Open {
        path: path.clone(),
        source,
    })?;
    let reader = BufReader::with_capacity(BUF_SIZE, file);

    match mode {
        SourceMode::Buffered => {
            let source = BufferedSource::from_reader(reader).map_err(|source| InputError::Read {
                path: path.clone(),
                source,
            })?;
            log::debug!("read {} lines from '{}'", source.remaining(), path.display());
            Ok(Box::new(source))
        }
        SourceMode::Streaming => Ok(Box::new(StreamingSource::new(reader))),
    }
}

/// Compare two files, sending records to `sink`.
///
/// Both files are validated and opened before the first comparison step.
/// Returns whether any difference was found.
pub fn diff_files<S: DiffSink + ?Sized>(
    expected_path: &Path,
    actual_path: &Path,
    opts: &FileDiffOptions,
    sink: &mut S,
) -> Result<bool, InputError> {
    let expected = open_source(expected_path, opts.mode, opts.missing_as_empty)?;
    let actual = open_source(actual_path, opts.mode, opts.missing_as_empty)?;
    log::info!(
        "comparing '{}' against '{}' ({} sources)",
        expected_path.display(),
        actual_path.display(),
        opts.mode.as_str()
    );
    Ok(DiffEngine::new(opts.engine).run(expected, actual, sink))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DiffLineType, RecordingSink};
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, data: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn normalize_rejects_missing_and_directories() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(
            normalize_path(&missing),
            Err(InputError::NotFound(p)) if p == missing
        ));
        assert!(matches!(
            normalize_path(dir.path()),
            Err(InputError::NotAFile(_))
        ));
    }

    #[test]
    fn normalize_returns_absolute_path() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "a.txt", "x\n");
        let normalized = normalize_path(&file).unwrap();
        assert!(normalized.is_absolute());
        assert_eq!(normalized, file.canonicalize().unwrap());
    }

    #[test]
    fn error_messages() {
        let err = InputError::NotFound(PathBuf::from("gone.txt"));
        assert_eq!(err.to_string(), "'gone.txt': File not found");
        let err = InputError::NotAFile(PathBuf::from("dir"));
        assert_eq!(err.to_string(), "'dir': Not a file");
    }

    #[test]
    fn diff_files_in_both_modes() {
        let dir = tempdir().unwrap();
        let expected = write(dir.path(), "expected.txt", "a\nb\nc\n");
        let actual = write(dir.path(), "actual.txt", "a\nZ\nb\nc\n");

        for mode in [SourceMode::Buffered, SourceMode::Streaming] {
            let opts = FileDiffOptions {
                mode,
                ..Default::default()
            };
            let mut sink = RecordingSink::new();
            let has_diff = diff_files(&expected, &actual, &opts, &mut sink).unwrap();
            assert!(has_diff, "{mode:?}");
            assert_eq!(
                sink.records,
                [
                    (DiffLineType::ActualOnly, b"Z".to_vec()),
                    (DiffLineType::Context, b"b".to_vec()),
                    (DiffLineType::Context, b"c".to_vec()),
                    (DiffLineType::Context, b"".to_vec()),
                ],
                "{mode:?}"
            );
        }
    }

    #[test]
    fn missing_file_is_an_error_by_default() {
        let dir = tempdir().unwrap();
        let expected = write(dir.path(), "expected.txt", "a\n");
        let missing = dir.path().join("missing.txt");
        let mut sink = RecordingSink::new();
        let err = diff_files(&expected, &missing, &FileDiffOptions::default(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
        assert!(sink.records.is_empty());
    }

    #[test]
    fn missing_file_reads_as_empty_when_allowed() {
        let dir = tempdir().unwrap();
        let expected = write(dir.path(), "expected.txt", "a\nb\n");
        let missing = dir.path().join("missing.txt");
        let opts = FileDiffOptions {
            missing_as_empty: true,
            ..Default::default()
        };
        let mut sink = RecordingSink::new();
        let has_diff = diff_files(&expected, &missing, &opts, &mut sink).unwrap();
        assert!(has_diff);
        assert_eq!(
            sink.records,
            [
                (DiffLineType::ExpectedOnly, b"a".to_vec()),
                (DiffLineType::ExpectedOnly, b"b".to_vec()),
                (DiffLineType::Context, b"".to_vec()),
            ]
        );
    }

    #[test]
    fn directory_is_rejected_even_when_missing_allowed() {
        let dir = tempdir().unwrap();
        let expected = write(dir.path(), "expected.txt", "a\n");
        let opts = FileDiffOptions {
            missing_as_empty: true,
            ..Default::default()
        };
        let mut sink = RecordingSink::new();
        let err = diff_files(&expected, dir.path(), &opts, &mut sink).unwrap_err();
        assert!(matches!(err, InputError::NotAFile(_)));
    }

    fn diff_both_modes(expected: &Path, actual: &Path) -> Vec<(bool, Vec<(DiffLineType, Vec<u8>)>)> {
        [SourceMode::Buffered, SourceMode::Streaming]
            .into_iter()
            .map(|mode| {
                let opts = FileDiffOptions {
                    mode,
                    ..Default::default()
                };
                let mut sink = RecordingSink::new();
                let has_diff = diff_files(expected, actual, &opts, &mut sink).unwrap();
                (has_diff, sink.records)
            })
            .collect()
    }

    #[test]
    fn non_utf8_difference_is_reported_in_both_modes() {
        let dir = tempdir().unwrap();
        let expected = dir.path().join("expected.txt");
        let actual = dir.path().join("actual.txt");
        std::fs::write(&expected, b"caf\xe9\nX\n").unwrap();
        std::fs::write(&actual, b"caf\xe9\nY\n").unwrap();

        let want = (
            true,
            vec![
                (DiffLineType::ExpectedOnly, b"X".to_vec()),
                (DiffLineType::ActualOnly, b"Y".to_vec()),
                (DiffLineType::Context, b"".to_vec()),
            ],
        );
        assert_eq!(diff_both_modes(&expected, &actual), [want.clone(), want]);
    }

    #[test]
    fn line_endings_are_compared_exactly() {
        let dir = tempdir().unwrap();
        let crlf = write(dir.path(), "crlf.txt", "a\r\nb\r\n");
        let lf = write(dir.path(), "lf.txt", "a\nb\n");
        let unterminated = write(dir.path(), "unterminated.txt", "a\nb");

        for (has_diff, _) in diff_both_modes(&crlf, &lf) {
            assert!(has_diff);
        }
        for (has_diff, records) in diff_both_modes(&lf, &unterminated) {
            assert!(has_diff);
            assert_eq!(records, [(DiffLineType::ExpectedOnly, b"".to_vec())]);
        }
        for (has_diff, records) in diff_both_modes(&lf, &lf) {
            assert!(!has_diff);
            assert!(records.is_empty());
        }
    }
}
