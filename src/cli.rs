// Command-line front end for nanodiff.
//
// `nanodiff [OPTIONS] -- <EXPECTED> <ACTUAL>` compares two files and prints
// the classified lines with unified-diff markers. Exit status is 0 when the
// files match, the diff exit code when they do not, and 2 on usage or
// input errors.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use thiserror::Error;

use crate::engine::{CountingSink, DiffCounts, DiffOptions, DiffSink};
use crate::io::{FileDiffOptions, SourceMode, diff_files};
use crate::render::UnifiedRenderer;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const EXIT_SAME: i32 = 0;
const DEFAULT_DIFF_EXIT_CODE: u8 = 1;
const EXIT_TROUBLE: i32 = 2;

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Line diff of a program's actual output against its expected output.
#[derive(Parser, Debug)]
#[command(
    name = "nanodiff",
    version,
    about = "Compare actual output against expected output, line by line",
    override_usage = "nanodiff [OPTIONS] -- <EXPECTED> <ACTUAL>"
)]
struct Cli {
    /// How input files are read.
    #[arg(long, value_enum, default_value_t = ModeArg::Streaming)]
    mode: ModeArg,

    /// Print aligned lines before the first difference as context too.
    #[arg(long = "full-context")]
    full_context: bool,

    /// Do not print context lines.
    #[arg(long = "no-context", conflicts_with = "full_context")]
    no_context: bool,

    /// Treat a path that does not exist as an empty file.
    #[arg(long = "missing-as-empty")]
    missing_as_empty: bool,

    /// Exit status used when the files differ.
    #[arg(long = "diff-exit-code", value_parser = clap::value_parser!(u8).range(1..), default_value_t = DEFAULT_DIFF_EXIT_CODE)]
    diff_exit_code: u8,

    /// Quiet mode (print nothing, report through the exit status only).
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Output a JSON summary to stderr.
    #[arg(long = "json")]
    json_output: bool,

    /// Expected and actual file, after `--`.
    #[arg(last = true, value_name = "PATH", value_hint = ValueHint::FilePath)]
    paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Buffered,
    Streaming,
}

impl From<ModeArg> for SourceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Buffered => SourceMode::Buffered,
            ModeArg::Streaming => SourceMode::Streaming,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved options
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
enum ArgsError {
    #[error("Missing argument for path to expected output")]
    MissingExpected,
    #[error("Missing argument for path to actual output")]
    MissingActual,
    #[error("Too many arguments")]
    TooManyArguments,
}

#[derive(Debug)]
struct Options {
    expected: PathBuf,
    actual: PathBuf,
    mode: SourceMode,
    full_context: bool,
    show_context: bool,
    missing_as_empty: bool,
    diff_exit_code: i32,
    quiet: bool,
    verbose: u8,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Result<Options, ArgsError> {
    let mut paths = cli.paths.into_iter();
    let expected = paths.next().ok_or(ArgsError::MissingExpected)?;
    let actual = paths.next().ok_or(ArgsError::MissingActual)?;
    if paths.next().is_some() {
        return Err(ArgsError::TooManyArguments);
    }

    Ok(Options {
        expected,
        actual,
        mode: cli.mode.into(),
        full_context: cli.full_context,
        show_context: !cli.no_context,
        missing_as_empty: cli.missing_as_empty,
        diff_exit_code: i32::from(cli.diff_exit_code),
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
    })
}

fn file_diff_options(opts: &Options) -> FileDiffOptions {
    FileDiffOptions {
        mode: opts.mode,
        missing_as_empty: opts.missing_as_empty,
        engine: DiffOptions {
            full_context: opts.full_context,
        },
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("nanodiff".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Diff command
// ---------------------------------------------------------------------------

/// Sink that throws every record away.
struct Discard;

impl DiffSink for Discard {
    fn emit(&mut self, _line: crate::engine::DiffLine<'_>) {}
}

fn cmd_diff(opts: &Options) -> i32 {
    let file_opts = file_diff_options(opts);

    let (result, counts) = if opts.quiet {
        let mut sink = CountingSink::new(Discard);
        let result = diff_files(&opts.expected, &opts.actual, &file_opts, &mut sink);
        (result, sink.counts())
    } else {
        let stdout = BufWriter::with_capacity(BUF_SIZE, io::stdout().lock());
        let renderer = UnifiedRenderer::new(stdout).show_context(opts.show_context);
        let mut sink = CountingSink::new(renderer);
        let result = diff_files(&opts.expected, &opts.actual, &file_opts, &mut sink);
        let (renderer, counts) = sink.into_parts();
        if let Err(e) = renderer.finish() {
            // A closed pipe (e.g. `| head`) still gets a meaningful status.
            if e.kind() != io::ErrorKind::BrokenPipe {
                eprintln!("nanodiff: write error: {e}");
                return EXIT_TROUBLE;
            }
        }
        (result, counts)
    };

    let has_diff = match result {
        Ok(has_diff) => has_diff,
        Err(e) => {
            eprintln!("nanodiff: {e}");
            return EXIT_TROUBLE;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "nanodiff: {} records (context: {}, expected only: {}, actual only: {})",
            counts.total(),
            counts.context,
            counts.expected_only,
            counts.actual_only
        );
    }

    if opts.json_output {
        print_json_summary(opts, has_diff, counts);
    }

    if has_diff {
        opts.diff_exit_code
    } else {
        EXIT_SAME
    }
}

fn json_summary(opts: &Options, has_diff: bool, counts: DiffCounts) -> serde_json::Value {
    serde_json::json!({
        "expected": opts.expected.display().to_string(),
        "actual": opts.actual.display().to_string(),
        "mode": opts.mode.as_str(),
        "has_diff": has_diff,
        "records": counts.total(),
        "context": counts.context,
        "expected_only": counts.expected_only,
        "actual_only": counts.actual_only,
    })
}

fn print_json_summary(opts: &Options, has_diff: bool, counts: DiffCounts) {
    let json = json_summary(opts, has_diff, counts);
    match serde_json::to_string_pretty(&json) {
        Ok(text) => eprintln!("{text}"),
        Err(e) => eprintln!("nanodiff: json error: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Main CLI entry point. Parses arguments via clap, runs the comparison and
/// exits with its status.
pub fn run() -> ! {
    let cli = Cli::parse();
    let verbose = cli.verbose.min(2);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_filter(verbose)))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let opts = match resolve_options(cli) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error while parsing command-line arguments: {e}");
            process::exit(EXIT_TROUBLE);
        }
    };

    let exit_code = cmd_diff(&opts);
    let _ = io::stderr().flush();
    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
