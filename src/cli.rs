// Command-line interface for fhpack.
//
// Subcommands mirror the original tool's modes: compress, expand, and an
// in-memory test mode for batches of images.

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use crate::engine::{EncodeOptions, Strategy};
use crate::io::{self, CompressStats};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// LZ4FH compressor for Apple II hi-res images.
#[derive(Parser, Debug)]
#[command(
    name = "fhpack",
    version,
    about = "LZ4FH hi-res image compressor/expander",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(clap::Args, Debug, Clone)]
struct TuningArgs {
    /// Keep the screen holes byte-for-byte (and the original length).
    #[arg(short = 'H', long = "preserve-holes")]
    preserve_holes: bool,

    /// Fast compression (greedy parsing).
    #[arg(short = '1', long, conflicts_with = "best")]
    fast: bool,

    /// High compression (optimal parsing, the default).
    #[arg(short = '9', long)]
    best: bool,
}

impl TuningArgs {
    fn to_options(&self) -> EncodeOptions {
        EncodeOptions {
            strategy: if self.fast {
                Strategy::Greedy
            } else {
                Strategy::Optimal
            },
            preserve_holes: self.preserve_holes,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress a hi-res image to LZ4FH.
    Compress {
        #[command(flatten)]
        tuning: TuningArgs,

        /// Input image (8184-8192 bytes).
        input: PathBuf,

        /// Output LZ4FH file.
        output: PathBuf,
    },
    /// Expand an LZ4FH file back to a hi-res image.
    Expand {
        /// Input LZ4FH file.
        input: PathBuf,

        /// Output image file.
        output: PathBuf,
    },
    /// Compress images in memory and report results without writing.
    Test {
        #[command(flatten)]
        tuning: TuningArgs,

        /// Input images.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn report_compress(cli: &Cli, path: &Path, stats: &CompressStats) {
    if cli.json_output {
        let json = serde_json::json!({
            "input": path.display().to_string(),
            "input_bytes": stats.input_size,
            "output_bytes": stats.output_size,
            "ratio": stats.output_size as f64 / stats.input_size as f64,
        });
        eprintln!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "fhpack: {}: {} -> {} bytes ({:.1}%)",
            path.display(),
            stats.input_size,
            stats.output_size,
            100.0 * stats.output_size as f64 / stats.input_size as f64
        );
    }
}

fn refuse_overwrite(cli: &Cli, output: &Path) -> bool {
    if output.exists() && !cli.force {
        eprintln!(
            "fhpack: output file exists, use -f to overwrite: {}",
            output.display()
        );
        return true;
    }
    false
}

fn cmd_compress(cli: &Cli, tuning: &TuningArgs, input: &Path, output: &Path) -> i32 {
    if refuse_overwrite(cli, output) {
        return 1;
    }
    match io::compress_file(input, output, &tuning.to_options()) {
        Ok(stats) => {
            report_compress(cli, input, &stats);
            0
        }
        Err(e) => {
            eprintln!("fhpack: compress: {e}");
            // no partial outputs
            let _ = std::fs::remove_file(output);
            1
        }
    }
}

fn cmd_expand(cli: &Cli, input: &Path, output: &Path) -> i32 {
    if refuse_overwrite(cli, output) {
        return 1;
    }
    match io::expand_file(input, output) {
        Ok(stats) => {
            if cli.json_output {
                let json = serde_json::json!({
                    "input": input.display().to_string(),
                    "input_bytes": stats.input_size,
                    "output_bytes": stats.output_size,
                });
                eprintln!("{json}");
            } else if !cli.quiet {
                eprintln!(
                    "fhpack: {}: {} -> {} bytes",
                    input.display(),
                    stats.input_size,
                    stats.output_size
                );
            }
            0
        }
        Err(e) => {
            eprintln!("fhpack: expand: {e}");
            let _ = std::fs::remove_file(output);
            1
        }
    }
}

fn cmd_test(cli: &Cli, tuning: &TuningArgs, inputs: &[PathBuf]) -> i32 {
    let opts = tuning.to_options();
    let mut failures = 0;
    for input in inputs {
        match io::check_file(input, &opts) {
            Ok(stats) => report_compress(cli, input, &stats),
            Err(e) => {
                eprintln!("fhpack: test: {}: {e}", input.display());
                failures += 1;
            }
        }
    }
    if failures > 0 { 1 } else { 0 }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();

    // RUST_LOG still overrides the flag-derived default
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let exit_code = match &cli.command {
        Cmd::Compress {
            tuning,
            input,
            output,
        } => cmd_compress(&cli, tuning, input, output),
        Cmd::Expand { input, output } => cmd_expand(&cli, input, output),
        Cmd::Test { tuning, inputs } => cmd_test(&cli, tuning, inputs),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let argv: Vec<String> = std::iter::once("fhpack".to_string())
            .chain(args.iter().map(|s| s.to_string()))
            .collect();
        Cli::try_parse_from(argv).expect("cli parse failed")
    }

    #[test]
    fn compress_defaults_to_optimal() {
        let cli = parse(&["compress", "in.pic", "out.lz4fh"]);
        let Cmd::Compress { tuning, .. } = &cli.command else {
            panic!("wrong command");
        };
        let opts = tuning.to_options();
        assert_eq!(opts.strategy, Strategy::Optimal);
        assert!(!opts.preserve_holes);
    }

    #[test]
    fn fast_flag_selects_greedy() {
        let cli = parse(&["compress", "-1", "in.pic", "out.lz4fh"]);
        let Cmd::Compress { tuning, .. } = &cli.command else {
            panic!("wrong command");
        };
        assert_eq!(tuning.to_options().strategy, Strategy::Greedy);
    }

    #[test]
    fn fast_and_best_conflict() {
        let argv = ["fhpack", "compress", "-1", "-9", "in.pic", "out.lz4fh"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn preserve_holes_flag_parses() {
        let cli = parse(&["compress", "--preserve-holes", "in.pic", "out.lz4fh"]);
        let Cmd::Compress { tuning, .. } = &cli.command else {
            panic!("wrong command");
        };
        assert!(tuning.to_options().preserve_holes);
    }

    #[test]
    fn test_mode_takes_multiple_inputs() {
        let cli = parse(&["test", "-H", "a.pic", "b.pic", "c.pic"]);
        let Cmd::Test { inputs, tuning } = &cli.command else {
            panic!("wrong command");
        };
        assert_eq!(inputs.len(), 3);
        assert!(tuning.preserve_holes);
    }

    #[test]
    fn global_flags_parse() {
        let cli = parse(&["--force", "--json", "expand", "in.lz4fh", "out.pic"]);
        assert!(cli.force);
        assert!(cli.json_output);
        assert!(matches!(cli.command, Cmd::Expand { .. }));
    }

    #[test]
    fn verbose_counts() {
        let cli = parse(&["-v", "-v", "test", "a.pic"]);
        assert_eq!(cli.verbose, 2);
    }
}
