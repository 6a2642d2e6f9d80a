use std::io::Cursor;

use nanodiff::engine::{CountingSink, DiffEngine, DiffOptions};
use nanodiff::render::UnifiedRenderer;
use nanodiff::source::{BufferedSource, StreamingSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let golden = BufferedSource::from_lines(["build ok", "tests: 12", "warnings: 0", "done"]);
    let output = StreamingSource::new(Cursor::new("build ok\ntests: 12\nwarnings: 3\ndone"));

    let renderer = UnifiedRenderer::new(std::io::stdout().lock());
    let mut sink = CountingSink::new(renderer);
    let has_diff = DiffEngine::new(DiffOptions::default()).run(golden, output, &mut sink);

    let (renderer, counts) = sink.into_parts();
    renderer.finish()?;
    println!(
        "has_diff: {has_diff}, expected only: {}, actual only: {}",
        counts.expected_only, counts.actual_only
    );
    Ok(())
}
