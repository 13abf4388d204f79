//! Trackk CLI - Command-line interface for Trackk Flux
//!
//! Commands:
//! - score: Score a recording of frames into jumping-jack feedback
//! - angles: Print per-frame display angles and phase scores
//! - validate: Check frame ordering and coordinates
//! - config: Print the effective scoring configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use trackk_flux::angles::{format_degrees, JointAngles};
use trackk_flux::recording::{duration_ms, frame_issues, parse_ndjson, Recording};
use trackk_flux::{Frame, JumpingJackProcessor, PhaseScores, ScoringConfig, ScoringError};
use trackk_flux::{FLUX_VERSION, PRODUCER_NAME};

/// Trackk - jumping-jack form feedback from 3D skeleton recordings
#[derive(Parser)]
#[command(name = "trackk")]
#[command(version = FLUX_VERSION)]
#[command(about = "Score jumping-jack recordings into form feedback", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a recording into per-phase feedback
    Score {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output format
        #[arg(long, default_value = "json")]
        output_format: OutputFormat,

        /// Scoring configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Include the raw per-phase score series
        #[arg(long)]
        include_series: bool,
    },

    /// Print per-frame display angles and phase scores
    Angles {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Scoring configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate frame ordering and coordinates
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "json")]
        input_format: InputFormat,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective scoring configuration
    Config {
        /// Configuration file to validate and print (defaults otherwise)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of frames (the recording export form)
    Json,
    /// Newline-delimited JSON (one frame per line)
    Ndjson,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), TrackkCliError> {
    match cli.command {
        Commands::Score {
            input,
            output,
            input_format,
            output_format,
            config,
            include_series,
        } => cmd_score(
            &input,
            &output,
            input_format,
            output_format,
            config.as_deref(),
            include_series,
        ),

        Commands::Angles {
            input,
            input_format,
            config,
            json,
        } => cmd_angles(&input, input_format, config.as_deref(), json),

        Commands::Validate {
            input,
            input_format,
            json,
        } => cmd_validate(&input, input_format, json),

        Commands::Config { config } => cmd_config(config.as_deref()),
    }
}

fn cmd_score(
    input: &Path,
    output: &Path,
    input_format: InputFormat,
    output_format: OutputFormat,
    config: Option<&Path>,
    include_series: bool,
) -> Result<(), TrackkCliError> {
    tracing::info!(?input, ?config, "scoring recording");

    let frames = read_frames(input, &input_format)?;
    if frames.is_empty() {
        return Err(TrackkCliError::NoFrames);
    }

    let recording = Recording::from_frames(frames)?;
    let processor = JumpingJackProcessor::with_config(load_config(config)?)?.with_series(include_series);
    let report = processor.analyze_recording(&recording)?;
    let payload = processor.encode(&report)?;

    let output_data = match output_format {
        OutputFormat::Json => payload + "\n",
        OutputFormat::JsonPretty => {
            let value: serde_json::Value = serde_json::from_str(&payload)?;
            serde_json::to_string_pretty(&value)? + "\n"
        }
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
        tracing::info!(?output, frames = recording.len(), "feedback written");
    }

    Ok(())
}

fn cmd_angles(
    input: &Path,
    input_format: InputFormat,
    config: Option<&Path>,
    json: bool,
) -> Result<(), TrackkCliError> {
    let frames = read_frames(input, &input_format)?;
    let processor = JumpingJackProcessor::with_config(load_config(config)?)?;
    let scores = processor.score_frames(&frames);

    let rows: Vec<AngleRow> = frames
        .iter()
        .zip(scores)
        .map(|(frame, scores)| AngleRow {
            timestamp: frame.timestamp,
            angles: JointAngles::from_skeleton(&frame.skeleton),
            scores,
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in &rows {
            println!(
                "{:>8} ms | Right Hand {} | Left Hand {} | Right Foot {} | Left Foot {} | top {:.1} mid {:.1} bottom {:.1}",
                row.timestamp,
                format_degrees(row.angles.right_hand),
                format_degrees(row.angles.left_hand),
                format_degrees(row.angles.right_foot),
                format_degrees(row.angles.left_foot),
                row.scores.top,
                row.scores.middle,
                row.scores.bottom,
            );
        }
    }

    Ok(())
}

fn cmd_validate(input: &Path, input_format: InputFormat, json: bool) -> Result<(), TrackkCliError> {
    let frames = read_frames(input, &input_format)?;
    let issues = frame_issues(&frames);

    let report = ValidationReport {
        total_frames: frames.len(),
        invalid_frames: issues.len(),
        duration_ms: duration_ms(&frames),
        errors: issues.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total frames:   {}", report.total_frames);
        println!("Invalid frames: {}", report.invalid_frames);
        println!("Duration:       {} ms", report.duration_ms);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!("  - {}", err);
            }
        }
    }

    if report.invalid_frames > 0 {
        Err(TrackkCliError::ValidationFailed(report.invalid_frames))
    } else {
        Ok(())
    }
}

fn cmd_config(config: Option<&Path>) -> Result<(), TrackkCliError> {
    let config = load_config(config)?;
    println!("{}", config.to_json()?);
    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, TrackkCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Parse frames without ordering checks so `validate` can report every issue
fn read_frames(input: &Path, format: &InputFormat) -> Result<Vec<Frame>, TrackkCliError> {
    let data = read_input(input)?;

    match format {
        InputFormat::Json => Ok(serde_json::from_str(&data)?),
        InputFormat::Ndjson => Ok(parse_ndjson(&data)?),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig, TrackkCliError> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(ScoringConfig::from_json(&json)?)
        }
        None => Ok(ScoringConfig::default()),
    }
}

// Error types

#[derive(Debug)]
enum TrackkCliError {
    Io(io::Error),
    Scoring(ScoringError),
    Json(serde_json::Error),
    NoFrames,
    ValidationFailed(usize),
}

impl From<io::Error> for TrackkCliError {
    fn from(e: io::Error) -> Self {
        TrackkCliError::Io(e)
    }
}

impl From<ScoringError> for TrackkCliError {
    fn from(e: ScoringError) -> Self {
        TrackkCliError::Scoring(e)
    }
}

impl From<serde_json::Error> for TrackkCliError {
    fn from(e: serde_json::Error) -> Self {
        TrackkCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
    producer: String,
}

impl CliError {
    fn new(code: &str, message: String, hint: &str) -> Self {
        Self {
            code: code.to_string(),
            message,
            hint: Some(hint.to_string()),
            producer: PRODUCER_NAME.to_string(),
        }
    }
}

impl From<TrackkCliError> for CliError {
    fn from(e: TrackkCliError) -> Self {
        match e {
            TrackkCliError::Io(e) => {
                CliError::new("IO_ERROR", e.to_string(), "Check file paths and permissions")
            }
            TrackkCliError::Scoring(e @ ScoringError::ParseError(_)) => {
                CliError::new("PARSE_ERROR", e.to_string(), "Check input format")
            }
            TrackkCliError::Scoring(e @ ScoringError::InvalidConfig(_)) => {
                CliError::new("CONFIG_ERROR", e.to_string(), "Run 'trackk config' to see valid defaults")
            }
            TrackkCliError::Scoring(e) if e.is_recoverable() => CliError::new(
                "INSUFFICIENT_DATA",
                e.to_string(),
                "Record more reps or relax the phase thresholds",
            ),
            TrackkCliError::Scoring(e) => {
                CliError::new("SCORING_ERROR", e.to_string(), "Run 'trackk validate' for details")
            }
            TrackkCliError::Json(e) => CliError::new("JSON_ERROR", e.to_string(), "Check JSON syntax"),
            TrackkCliError::NoFrames => CliError::new(
                "NO_FRAMES",
                "No frames found in input".to_string(),
                "Ensure the recording is not empty",
            ),
            TrackkCliError::ValidationFailed(count) => CliError::new(
                "VALIDATION_FAILED",
                format!("{} frames failed validation", count),
                "Fix frame ordering or coordinates and retry",
            ),
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_frames: usize,
    invalid_frames: usize,
    duration_ms: i64,
    errors: Vec<String>,
}

#[derive(serde::Serialize)]
struct AngleRow {
    timestamp: i64,
    angles: JointAngles,
    scores: PhaseScores,
}
