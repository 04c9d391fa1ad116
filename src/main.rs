fn main() {
    #[cfg(feature = "cli")]
    fhpack::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("fhpack: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
