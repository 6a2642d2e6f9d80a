// Diff engine: greedy single-pass correlation of two line sources.
//
// Expected lines are consumed one at a time. For each one, actual lines are
// read ahead into a pending buffer until a copy of the expected line turns up
// or the actual source runs dry. Lines skipped over in the buffer are
// actual-only; an expected line with no copy left is expected-only.
//
// Aligned lines before the first difference are not reported unless
// `DiffOptions::full_context` is set.

use std::collections::VecDeque;

use crate::source::LineSource;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Classification of one emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffLineType {
    /// Present, unchanged, in both documents.
    Context,
    /// Present only in the expected document.
    ExpectedOnly,
    /// Present only in the actual document.
    ActualOnly,
}

/// One classified line, borrowed from the engine for the duration of the
/// sink call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine<'a> {
    /// Line bytes without the terminator.
    pub content: &'a [u8],
    pub kind: DiffLineType,
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Receives records in emission order, one call per record.
pub trait DiffSink {
    fn emit(&mut self, line: DiffLine<'_>);
}

impl<F: FnMut(DiffLine<'_>)> DiffSink for F {
    fn emit(&mut self, line: DiffLine<'_>) {
        self(line)
    }
}

/// Keeps an owned copy of every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingSink {
    pub records: Vec<(DiffLineType, Vec<u8>)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiffSink for RecordingSink {
    fn emit(&mut self, line: DiffLine<'_>) {
        self.records.push((line.kind, line.content.to_vec()));
    }
}

/// Per-kind record totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffCounts {
    pub context: u64,
    pub expected_only: u64,
    pub actual_only: u64,
}

impl DiffCounts {
    pub fn total(&self) -> u64 {
        self.context + self.expected_only + self.actual_only
    }
}

/// Tallies records by kind, then forwards them to `inner`.
#[derive(Debug)]
pub struct CountingSink<S> {
    inner: S,
    counts: DiffCounts,
}

impl<S: DiffSink> CountingSink<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counts: DiffCounts::default(),
        }
    }

    pub fn counts(&self) -> DiffCounts {
        self.counts
    }

    pub fn into_parts(self) -> (S, DiffCounts) {
        (self.inner, self.counts)
    }
}

impl<S: DiffSink> DiffSink for CountingSink<S> {
    fn emit(&mut self, line: DiffLine<'_>) {
        match line.kind {
            DiffLineType::Context => self.counts.context += 1,
            DiffLineType::ExpectedOnly => self.counts.expected_only += 1,
            DiffLineType::ActualOnly => self.counts.actual_only += 1,
        }
        self.inner.emit(line);
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Emit aligned lines as context even before the first difference.
    pub full_context: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compares an expected document against an actual one.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Run one comparison, feeding every record to `sink`.
    ///
    /// Both sources are consumed to exhaustion. Returns `true` if any
    /// expected-only or actual-only record was emitted.
    pub fn run<E, A, S>(&self, expected: E, actual: A, sink: &mut S) -> bool
    where
        E: LineSource,
        A: LineSource,
        S: DiffSink + ?Sized,
    {
        let mut run = Run {
            actual,
            pending: VecDeque::new(),
            has_diff: false,
            emitted: 0,
            peak_pending: 0,
            sink,
            full_context: self.options.full_context,
        };
        run.drive(expected);
        log::debug!(
            "diff finished: has_diff={}, records={}, peak pending={}",
            run.has_diff,
            run.emitted,
            run.peak_pending
        );
        run.has_diff
    }
}

/// Compare with default options.
pub fn do_diff<E, A, S>(expected: E, actual: A, sink: &mut S) -> bool
where
    E: LineSource,
    A: LineSource,
    S: DiffSink + ?Sized,
{
    DiffEngine::default().run(expected, actual, sink)
}

/// State of a single comparison.
struct Run<'s, A, S: ?Sized> {
    actual: A,
    /// Actual lines read ahead of the alignment point, not yet classified.
    pending: VecDeque<Vec<u8>>,
    has_diff: bool,
    emitted: u64,
    peak_pending: usize,
    sink: &'s mut S,
    full_context: bool,
}

impl<A: LineSource, S: DiffSink + ?Sized> Run<'_, A, S> {
    fn drive<E: LineSource>(&mut self, mut expected: E) {
        while let Some(line) = expected.next_line() {
            match self.find_in_actual(&line) {
                Some(k) => {
                    self.flush_pending(k);
                    // The match itself sits at the front now.
                    self.pending.pop_front();
                    if self.has_diff || self.full_context {
                        self.emit(&line, DiffLineType::Context);
                    }
                }
                None => {
                    self.has_diff = true;
                    self.emit(&line, DiffLineType::ExpectedOnly);
                }
            }
        }

        self.flush_pending(self.pending.len());
        while let Some(line) = self.actual.next_line() {
            self.has_diff = true;
            self.emit(&line, DiffLineType::ActualOnly);
        }
    }

    /// Index of the first pending line equal to `line`, reading ahead from
    /// the actual source as needed. `None` once the actual source is dry.
    fn find_in_actual(&mut self, line: &[u8]) -> Option<usize> {
        if let Some(k) = self.pending.iter().position(|p| p.as_slice() == line) {
            return Some(k);
        }
        while let Some(next) = self.actual.next_line() {
            let found = next.as_slice() == line;
            self.pending.push_back(next);
            self.peak_pending = self.peak_pending.max(self.pending.len());
            if found {
                return Some(self.pending.len() - 1);
            }
        }
        None
    }

    /// Emit the first `n` pending lines as actual-only.
    fn flush_pending(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        self.has_diff = true;
        for line in self.pending.drain(..n) {
            self.sink.emit(DiffLine {
                content: &line,
                kind: DiffLineType::ActualOnly,
            });
            self.emitted += 1;
        }
    }

    fn emit(&mut self, content: &[u8], kind: DiffLineType) {
        self.sink.emit(DiffLine { content, kind });
        self.emitted += 1;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
