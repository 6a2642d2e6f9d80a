// Line sources: the documents the diff engine pulls from.
//
// Two variants share one trait:
//   - BufferedSource reads the whole document up front
//   - StreamingSource pulls one line per call from an open reader
//
// Both split lines with `LineSplitter`, so the engine sees identical
// sequences no matter which variant feeds it.

use std::collections::VecDeque;
use std::io::{self, BufRead};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A forward-only sequence of lines.
///
/// Each call yields the next line in document order, or `None` once the
/// document is exhausted. Exhaustion is sticky: after the first `None`,
/// every later call also returns `None`.
///
/// Lines are raw bytes without their `\n` terminator. No decoding or
/// normalization happens, so a `\r` before the terminator stays part of
/// the line.
pub trait LineSource {
    fn next_line(&mut self) -> Option<Vec<u8>>;
}

impl<S: LineSource + ?Sized> LineSource for &mut S {
    fn next_line(&mut self) -> Option<Vec<u8>> {
        (**self).next_line()
    }
}

impl<S: LineSource + ?Sized> LineSource for Box<S> {
    fn next_line(&mut self) -> Option<Vec<u8>> {
        (**self).next_line()
    }
}

// ---------------------------------------------------------------------------
// Line splitting
// ---------------------------------------------------------------------------

/// Splits a byte stream into lines on `\n`.
///
/// Whatever follows the last `\n` is always one more line, even when it is
/// empty. A document of `n` terminators therefore has `n + 1` lines, so
/// `"a\nb\n"` and `"a\nb"` differ in their last line and an empty stream
/// is a single empty line.
#[derive(Debug, Clone, Default)]
pub struct LineSplitter {
    finished: bool,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the next line from `reader`. Returns `Ok(None)` once the final
    /// segment has been handed out.
    pub fn next_line<R: BufRead + ?Sized>(
        &mut self,
        reader: &mut R,
    ) -> io::Result<Option<Vec<u8>>> {
        if self.finished {
            return Ok(None);
        }
        let mut line = Vec::new();
        reader.read_until(b'\n', &mut line)?;
        if line.last() == Some(&b'\n') {
            line.pop();
        } else {
            self.finished = true;
        }
        Ok(Some(line))
    }
}

// ---------------------------------------------------------------------------
// Buffered
// ---------------------------------------------------------------------------

/// A fully materialized document.
#[derive(Debug, Clone, Default)]
pub struct BufferedSource {
    lines: VecDeque<Vec<u8>>,
}

impl BufferedSource {
    /// Read `reader` to the end. Any read failure is returned to the caller.
    pub fn from_reader<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut splitter = LineSplitter::new();
        let mut lines = VecDeque::new();
        while let Some(line) = splitter.next_line(&mut reader)? {
            lines.push_back(line);
        }
        Ok(Self { lines })
    }

    /// Build a source from lines already in memory.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Lines not yet handed out.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for BufferedSource {
    fn next_line(&mut self) -> Option<Vec<u8>> {
        self.lines.pop_front()
    }
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

/// Pulls lines on demand from an open reader.
///
/// A read failure ends the document exactly like EOF does; the error is
/// logged and never surfaces to the engine.
#[derive(Debug)]
pub struct StreamingSource<R> {
    reader: R,
    splitter: LineSplitter,
    lines_read: u64,
}

impl<R: BufRead> StreamingSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            splitter: LineSplitter::new(),
            lines_read: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> LineSource for StreamingSource<R> {
    fn next_line(&mut self) -> Option<Vec<u8>> {
        match self.splitter.next_line(&mut self.reader) {
            Ok(Some(line)) => {
                self.lines_read += 1;
                Some(line)
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!(
                    "read failed after {} lines, treating as end of input: {e}",
                    self.lines_read
                );
                self.splitter.finished = true;
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
