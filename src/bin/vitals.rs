//! Vitals CLI - Command-line interface for Vitalflow
//!
//! Commands:
//! - report: Aggregate a sample file into periodic stats and a summary
//! - validate: Check an NDJSON sample file for malformed records

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use vitalflow::{
    CloudApiSource, DeviceStoreSource, HealthDataSource, HealthFacade, SourcePlatform,
    UnavailableSource, VITALFLOW_VERSION,
};

/// Vitalflow - On-device aggregation engine for periodic health statistics
#[derive(Parser)]
#[command(name = "vitals")]
#[command(version = VITALFLOW_VERSION)]
#[command(about = "Aggregate health samples into periodic statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate samples into periodic stats and a summary
    Report {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,

        /// Data source platform to run the engine against
        #[arg(long, default_value = "device-store")]
        platform: Platform,

        /// Trailing period length in days
        #[arg(long, default_value = "7")]
        period_days: u32,

        /// Output stats as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check an NDJSON sample file for malformed records
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum InputFormat {
    /// Newline-delimited sample records
    Ndjson,
    /// A single fitness-cloud payload object
    CloudJson,
}

#[derive(Clone, Copy, ValueEnum)]
enum Platform {
    DeviceStore,
    CloudApi,
    Unavailable,
}

impl From<Platform> for SourcePlatform {
    fn from(p: Platform) -> Self {
        match p {
            Platform::DeviceStore => SourcePlatform::DeviceStore,
            Platform::CloudApi => SourcePlatform::CloudApi,
            Platform::Unavailable => SourcePlatform::Unavailable,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Report {
            input,
            input_format,
            platform,
            period_days,
            json,
        } => report(&input, input_format, platform, period_days, json).await,
        Commands::Validate { input } => validate(&input),
    }
}

async fn report(
    input: &PathBuf,
    input_format: InputFormat,
    platform: Platform,
    period_days: u32,
    json: bool,
) -> ExitCode {
    let raw = match read_input(input) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let source: Arc<dyn HealthDataSource> = match (platform, input_format) {
        (Platform::Unavailable, _) => Arc::new(UnavailableSource),
        (Platform::CloudApi, _) | (_, InputFormat::CloudJson) => {
            match CloudApiSource::from_payload(&raw) {
                Ok(source) => Arc::new(source),
                Err(err) => {
                    eprintln!("error: invalid cloud payload: {}", err);
                    return ExitCode::FAILURE;
                }
            }
        }
        (Platform::DeviceStore, InputFormat::Ndjson) => {
            let store = DeviceStoreSource::new();
            if let Err(err) = store.load_ndjson(&raw) {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
            Arc::new(store)
        }
    };

    let facade = HealthFacade::new(source);
    let exercise = facade.exercise_stats(period_days).await;
    let sleep = facade.sleep_stats(period_days).await;
    let mood = facade.mood_stats(period_days).await;
    let summary = facade.summarize().await;

    if json {
        let out = serde_json::json!({
            "period_days": period_days,
            "exercise": exercise,
            "sleep": sleep,
            "mood": mood,
            "summary": summary,
        });
        match serde_json::to_string_pretty(&out) {
            Ok(text) => println!("{}", text),
            Err(err) => {
                eprintln!("error: cannot encode report: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Period: trailing {} days", period_days);
        println!(
            "Exercise: {:.0} min total, {:.1} min/day",
            exercise.total_minutes, exercise.average_minutes
        );
        println!(
            "Sleep: {:.0} min/night in bed, bedtime {}, wake-up {}",
            sleep.average_time_in_bed_minutes, sleep.average_bedtime, sleep.average_wake_time
        );
        println!("Mood: average valence {:.1}", mood.average_valence);
        println!("Summary: {}", summary);
    }
    ExitCode::SUCCESS
}

fn validate(input: &PathBuf) -> ExitCode {
    let raw = match read_input(input) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", input.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let store = DeviceStoreSource::new();
    match store.load_ndjson(&raw) {
        Ok(count) => {
            println!("ok: {} records", count);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("invalid: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: &PathBuf) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}
