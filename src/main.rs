fn main() {
    #[cfg(feature = "cli")]
    nanodiff::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("nanodiff: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(2);
    }
}
