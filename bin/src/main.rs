mod config;
mod processing;
mod stats;

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::Parser;
use image::RgbImage;
use log::{debug, error, info, warn};
use rayon::prelude::*;
use crate::config::Config;
use crate::processing::{output_stem, Prepared, Processor, Report};
use crate::stats::ProcessingStats;

const STDIN_INPUT: &str = "-";
const STDIN_INPUT_STEM: &str = "stdin";
const PLACEHOLDER_SIZE: u32 = 100;

#[derive(Parser)]
#[command(name = "bilevel")]
#[command(about = "Convert images to grayscale and binarize them against a threshold")]
#[command(version)]
struct Args {
    /// Input image (JPEG or PNG), directory for batch processing, or "-" for stdin
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Generate default configuration file and exit
    #[arg(long)]
    generate_config: bool,

    /// Threshold (0-255); gray values strictly above it become white
    #[arg(short, long, allow_hyphen_values = true)]
    threshold: Option<i64>,

    /// File name of the result for single-image runs, overwritten on every run
    #[arg(long)]
    output_name: Option<String>,

    /// Do not write the thresholded image
    #[arg(long)]
    no_save: bool,

    /// Also write the original and the result side by side
    #[arg(long)]
    preview: bool,

    /// Create a black placeholder image if the input file does not exist
    #[arg(long)]
    create_missing: bool,

    /// File patterns to include in batch processing (e.g., "*.png,*.jpg")
    #[arg(long)]
    include_patterns: Option<String>,

    /// File patterns to exclude from batch processing
    #[arg(long)]
    exclude_patterns: Option<String>,

    /// Number of parallel workers for batch processing
    #[arg(long)]
    workers: Option<usize>,

    /// Continue batch processing even if some files fail
    #[arg(long)]
    continue_on_error: Option<bool>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn apply_args(config: &mut Config, args: Args) {
    if let Some(input) = args.input {
        config.input.input = input;
    }
    if args.create_missing {
        config.input.create_missing = true;
    }
    if let Some(threshold) = args.threshold {
        config.processing.threshold = threshold;
    }
    if args.verbose {
        config.processing.verbose = true;
    }
    if let Some(workers) = args.workers {
        config.batch.workers = workers;
    }
    if let Some(continue_on_error) = args.continue_on_error {
        config.batch.continue_on_error = continue_on_error;
    }
    if let Some(include_patterns) = args.include_patterns {
        config.batch.include_patterns = split_patterns(&include_patterns);
    }
    if let Some(exclude_patterns) = args.exclude_patterns {
        config.batch.exclude_patterns.append(&mut split_patterns(&exclude_patterns));
    }
    if let Some(output) = args.output {
        config.output.output_folder = output;
    }
    if let Some(output_name) = args.output_name {
        config.output.output_name = output_name;
    }
    if args.no_save {
        config.output.save = false;
    }
    if args.preview {
        config.output.preview = true;
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn matches_patterns(filename: &str, patterns: &[String]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    patterns.iter().any(|pattern| {
        if pattern.contains('*') {
            // Simple glob matching
            let pattern = pattern.replace('*', "");
            if pattern.starts_with('.') {
                filename.to_ascii_lowercase().ends_with(&pattern.to_ascii_lowercase())
            } else {
                filename.contains(&pattern)
            }
        } else {
            filename == pattern
        }
    })
}

fn find_input_files(
    input_path: &Path,
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else if input_path.is_dir() {
        for entry in fs::read_dir(input_path)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                if matches_patterns(filename, include_patterns)
                    && !matches_patterns(filename, exclude_patterns)
                {
                    files.push(path);
                }
            }
        }
    }

    files.sort();
    Ok(files)
}

fn create_placeholder(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if !matches!(extension.as_deref(), Some("jpg" | "jpeg" | "png")) {
        bail!(
            "Cannot create a placeholder at {}: use a .jpg, .jpeg or .png path",
            path.display()
        );
    }
    warn!("{} not found, creating a placeholder image", path.display());
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    RgbImage::new(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
        .save(path)
        .with_context(|| format!("Failed to create placeholder {}", path.display()))
}

fn read_input(mut reader: impl Read) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .context("Failed to read image from stdin")?;
    Ok(bytes)
}

fn run_stdin(processor: &Processor, reader: impl Read) -> Result<Report> {
    let bytes = read_input(reader)?;
    processor.process_bytes(STDIN_INPUT_STEM, &bytes, false)
}

/// Batch outputs are named after the input stem, so `a.png` and `a.jpg`
/// would overwrite each other.
fn check_stem_collisions(files: &[PathBuf]) -> Result<()> {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for file in files {
        if let Some(previous) = seen.insert(output_stem(file), file.as_path()) {
            bail!(
                "{} and {} would write the same output; rename one of them",
                previous.display(),
                file.display()
            );
        }
    }
    Ok(())
}

fn report_single(report: &Report) {
    match &report.output {
        Some(path) => println!(
            "Thresholded {}x{} image ({} foreground pixels) saved to {}",
            report.width,
            report.height,
            report.foreground,
            path.display()
        ),
        None => println!(
            "Thresholded {}x{} image ({} foreground pixels)",
            report.width, report.height, report.foreground
        ),
    }
    if let Some(preview) = &report.preview {
        println!("Preview saved to {}", preview.display());
    }
}

fn record_result(
    stats: &mut ProcessingStats,
    file: &Path,
    result: Result<Report>,
    batch: bool,
    continue_on_error: bool,
) -> Result<()> {
    match result {
        Ok(report) => {
            debug!("Processed {} ({} foreground pixels)", file.display(), report.foreground);
            if !batch {
                report_single(&report);
            }
            stats.record(&report);
        }
        Err(e) => {
            stats.record_failure();
            if !continue_on_error {
                return Err(e);
            }
            error!("{:#}", e);
        }
    }
    if batch {
        stats.log_progress();
    }
    Ok(())
}

fn run_files(processor: &Processor, config: &Config, files: &[PathBuf], batch: bool) -> Result<ProcessingStats> {
    if batch {
        check_stem_collisions(files)?;
    }

    let mut stats = ProcessingStats::new(files.len());
    let continue_on_error = config.batch.continue_on_error;
    let workers = config.batch.workers;

    if workers <= 1 || files.len() <= 1 {
        for file in files {
            let result = processor.process(file, batch);
            record_result(&mut stats, file, result, batch, continue_on_error)?;
        }
        return Ok(stats);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;
    info!("Processing {} files on {} workers", files.len(), workers);

    if continue_on_error {
        let results: Vec<Result<Report>> =
            pool.install(|| files.par_iter().map(|f| processor.process(f, batch)).collect());
        for (file, result) in files.iter().zip(results) {
            record_result(&mut stats, file, result, batch, continue_on_error)?;
        }
        return Ok(stats);
    }

    // A chunk is only written once every file in it decoded, so nothing from
    // or after a failing file reaches the output folder.
    for chunk in files.chunks(workers) {
        let prepared: Result<Vec<Prepared>> =
            pool.install(|| chunk.par_iter().map(|f| processor.prepare(f)).collect());
        let prepared = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                stats.record_failure();
                return Err(e);
            }
        };
        let results: Vec<Result<Report>> = pool.install(|| {
            prepared
                .into_par_iter()
                .map(|p| processor.write(p, batch))
                .collect()
        });
        for (file, result) in chunk.iter().zip(results) {
            record_result(&mut stats, file, result, batch, continue_on_error)?;
        }
    }

    Ok(stats)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.generate_config {
        let config_path = args.config.unwrap_or_else(|| PathBuf::from("bilevel.json"));
        Config::save_default(&config_path)?;
        return Ok(());
    }

    let mut config = match &args.config {
        Some(config_path) => Config::load(config_path)?,
        None => Config::default(),
    };
    apply_args(&mut config, args);
    init_logging(config.processing.verbose);
    debug!("Effective configuration: {:?}", config);

    let processor = Processor::new(config.clone())?;

    if config.output.save || config.output.preview {
        fs::create_dir_all(&config.output.output_folder).with_context(|| {
            format!("Failed to create output directory {}", config.output.output_folder.display())
        })?;
    }

    let input = config.input.input.clone();
    if input.as_os_str() == STDIN_INPUT {
        let report = run_stdin(&processor, std::io::stdin().lock())?;
        report_single(&report);
        return Ok(());
    }

    if !input.exists() && config.input.create_missing {
        create_placeholder(&input)?;
    }

    let batch = input.is_dir();
    let mut exclude_patterns = config.batch.exclude_patterns.clone();
    exclude_patterns.push("*_thresholded*".to_string());
    exclude_patterns.push("*_preview*".to_string());

    let input_files = find_input_files(&input, &config.batch.include_patterns, &exclude_patterns)?;
    if input_files.is_empty() {
        bail!("No input files found at {}", input.display());
    }
    if batch {
        info!("Found {} input files", input_files.len());
    }

    let stats = run_files(&processor, &config, &input_files, batch)?;
    if batch {
        stats.print_summary();
    }

    Ok(())
}
