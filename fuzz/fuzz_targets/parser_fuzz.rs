#![no_main]
use libfuzzer_sys::fuzz_target;

// Options come from the bytes before the first NUL, paths from the rest,
// so the `--` boundary gets exercised with arbitrary tokens on both sides.
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let (opts, paths) = text.split_once('\0').unwrap_or((text.as_str(), ""));
    let mut args: Vec<String> = opts
        .split_whitespace()
        .take(16)
        .map(str::to_string)
        .collect();
    if !paths.is_empty() {
        args.push("--".to_string());
        args.extend(paths.split('\0').take(4).map(str::to_string));
    }
    nanodiff::cli::fuzz_try_parse_args(&args);
});
