// Unified-diff style rendering of engine records.

use std::io::{self, Write};

use crate::engine::{DiffLine, DiffLineType, DiffSink};

/// Line marker for a record kind.
pub fn marker(kind: DiffLineType) -> u8 {
    match kind {
        DiffLineType::Context => b' ',
        DiffLineType::ExpectedOnly => b'-',
        DiffLineType::ActualOnly => b'+',
    }
}

/// Writes each record as `<marker><content>\n`, with the content bytes
/// copied through unchanged.
///
/// Sinks cannot fail, so the first write error is kept and every later
/// record is dropped. `finish()` reports it.
#[derive(Debug)]
pub struct UnifiedRenderer<W: Write> {
    out: W,
    show_context: bool,
    error: Option<io::Error>,
}

impl<W: Write> UnifiedRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_context: true,
            error: None,
        }
    }

    /// Skip context records when `false`.
    pub fn show_context(mut self, show: bool) -> Self {
        self.show_context = show;
        self
    }

    /// Flush and hand back the writer, or the first error seen.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_record(&mut self, line: DiffLine<'_>) -> io::Result<()> {
        self.out.write_all(&[marker(line.kind)])?;
        self.out.write_all(line.content)?;
        self.out.write_all(b"\n")
    }
}

impl<W: Write> DiffSink for UnifiedRenderer<W> {
    fn emit(&mut self, line: DiffLine<'_>) {
        if self.error.is_some() || (!self.show_context && line.kind == DiffLineType::Context) {
            return;
        }
        if let Err(e) = self.write_record(line) {
            self.error = Some(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
