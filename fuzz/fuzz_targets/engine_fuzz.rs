#![no_main]
use libfuzzer_sys::fuzz_target;
use nanodiff::engine::{DiffEngine, DiffLineType, DiffOptions, RecordingSink};
use nanodiff::source::{BufferedSource, LineSource, StreamingSource};
use std::io::Cursor;

fn lines_of(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut src = StreamingSource::new(Cursor::new(bytes));
    let mut out = Vec::new();
    while let Some(line) = src.next_line() {
        out.push(line);
    }
    out
}

fuzz_target!(|data: &[u8]| {
    // First 0x00 byte splits the input into the two documents.
    let split = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let (expected_bytes, actual_bytes) = data.split_at(split);
    let actual_bytes = actual_bytes.get(1..).unwrap_or(&[]);

    let options = DiffOptions { full_context: true };
    let mut streamed = RecordingSink::new();
    let has_diff = DiffEngine::new(options).run(
        StreamingSource::new(Cursor::new(expected_bytes)),
        StreamingSource::new(Cursor::new(actual_bytes)),
        &mut streamed,
    );

    let expected = lines_of(expected_bytes);
    let actual = lines_of(actual_bytes);
    let mut buffered = RecordingSink::new();
    let buffered_diff = DiffEngine::new(options).run(
        BufferedSource::from_lines(expected.clone()),
        BufferedSource::from_lines(actual.clone()),
        &mut buffered,
    );
    assert_eq!(streamed, buffered);
    assert_eq!(has_diff, buffered_diff);

    let side = |keep: DiffLineType| -> Vec<Vec<u8>> {
        streamed
            .records
            .iter()
            .filter(|(kind, _)| *kind == keep || *kind == DiffLineType::Context)
            .map(|(_, s)| s.clone())
            .collect()
    };
    assert_eq!(side(DiffLineType::ExpectedOnly), expected);
    assert_eq!(side(DiffLineType::ActualOnly), actual);
    // Splitting is lossless: rejoining the lines gives the input back.
    assert_eq!(expected.join(&b'\n'), expected_bytes);
    assert_eq!(actual.join(&b'\n'), actual_bytes);
    assert_eq!(has_diff, expected_bytes != actual_bytes);
});
