use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use exr_squeeze_rs::image_pipeline::{BatchProcessor, Blacklist, Codec, ProcessingConfig};
use exr_squeeze_rs::logger;

use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "exr-squeeze")]
#[command(version, about = "Recompress EXR files in place, dropping meaningless alpha and downcasting color to half float", long_about = None)]
struct Cli {
    /// Directory containing EXR files to process (searched recursively)
    #[arg(value_name = "INPUT_DIRECTORY")]
    input_directory: PathBuf,

    /// Compression to store files with (default: keep each file's compression)
    #[arg(long, value_name = "NAME", value_parser = parse_codec)]
    compression_type: Option<Codec>,

    /// Text file of newline-separated path substrings to skip
    #[arg(long, value_name = "FILE")]
    blacklist_directory: Option<PathBuf>,

    /// Do not check for meaningful alpha channels
    #[arg(long)]
    no_check_alpha: bool,

    /// Do not cast 32-bit color channels to 16-bit half float
    #[arg(long)]
    no_half_float: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,

    /// Report what would change without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Process files in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_codec(name: &str) -> Result<Codec, String> {
    name.parse::<Codec>().map_err(|e| e.to_string())
}

fn is_confirmed(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

fn confirm(input: &mut impl BufRead) -> io::Result<bool> {
    print!("Continue? (y/N) ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_confirmed(&answer))
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    info!("Compressing in {}", cli.input_directory.display());

    let blacklist = match &cli.blacklist_directory {
        Some(path) => Blacklist::from_file(path)?,
        None => Blacklist::default(),
    };

    let config = ProcessingConfig::builder()
        .drop_meaningless_alpha(!cli.no_check_alpha)
        .target_compression(cli.compression_type)
        .downcast_color_to_half(!cli.no_half_float)
        .dry_run(cli.dry_run)
        .parallel(cli.parallel)
        .blacklist(blacklist)
        .build();

    info!(
        "Compression: {}",
        config
            .target_compression
            .map(|codec| codec.to_string())
            .unwrap_or_else(|| "unchanged".to_string())
    );
    info!("Alpha check: {}", if config.drop_meaningless_alpha { "enabled" } else { "disabled" });
    info!("Half float: {}", if config.downcast_color_to_half { "enabled" } else { "disabled" });

    if !cli.yes && !confirm(&mut io::stdin().lock()).context("failed to read confirmation")? {
        warn!("Not confirmed. Quitting execution.");
        return Ok(ExitCode::from(2));
    }

    let summary = BatchProcessor::new(config)
        .run_directory(&cli.input_directory)
        .with_context(|| format!("processing {} failed", cli.input_directory.display()))?;

    info!(
        "Done: {} written, {} would be written, {} unchanged, {} blacklisted, {} failed",
        summary.written,
        summary.would_write,
        summary.unmodified,
        summary.blacklisted,
        summary.failures.len()
    );
    for (path, e) in &summary.failures {
        error!("{}: {}", path.display(), e);
    }

    Ok(if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(if cli.verbose { "debug" } else { "info" });

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
