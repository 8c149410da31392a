//! CLI entry point for the star trend tool.
//!
//! Computes how the star ratings of tracked ontologies evolved over the last
//! months, persists the series and its chart, and answers point-in-time
//! rating lookups.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use star_trend::chart::{CHART_FILE_NAME, star_figure};
use star_trend::config::TrendConfig;
use star_trend::output::{
    SERIES_CSV_FILE_NAME, SERIES_FILE_NAME, encode_body, print_pretty, series_csv, to_json_bytes,
};
use star_trend::parser::load_resources;
use star_trend::sink::{LocalDirSink, S3Sink, SeriesSink, content_type_for};
use star_trend::trend::resolver::latest_rating_before;
use star_trend::trend::star_trend;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "star_trend")]
#[command(about = "Track how ontology star ratings evolve over time", long_about = None)]
struct Cli {
    /// JSON config file with trend settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the star distribution over time and persist it
    Trend {
        /// CSV or JSON file of ontology snapshots
        #[arg(value_name = "SNAPSHOTS")]
        input: PathBuf,

        /// Months to look back (overrides config)
        #[arg(short, long, allow_negative_numbers = true)]
        timespan: Option<i64>,

        /// Weeks between checkpoints (overrides config)
        #[arg(short, long, allow_negative_numbers = true)]
        interval: Option<i64>,

        /// Directory to write results to (overrides config)
        #[arg(short = 'd', long)]
        stats_dir: Option<PathBuf>,

        /// Also write the series as CSV
        #[arg(long, default_value_t = false)]
        csv: bool,

        /// Optional: S3 bucket name to upload results to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Key prefix for S3 uploads
        #[arg(long, default_value = "")]
        s3_prefix: String,

        /// Gzip compress results before writing
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Print the rating an ontology held just before an instant
    Resolve {
        /// CSV or JSON file of ontology snapshots
        #[arg(value_name = "SNAPSHOTS")]
        input: PathBuf,

        /// Ontology key to look up
        #[arg(short, long)]
        ontology: String,

        /// RFC 3339 instant (defaults to now)
        #[arg(short, long)]
        at: Option<DateTime<Utc>>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/star_trend.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("star_trend.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut config = TrendConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Trend {
            input,
            timespan,
            interval,
            stats_dir,
            csv,
            s3_bucket,
            s3_prefix,
            gzip,
        } => {
            if let Some(timespan) = timespan {
                config.timespan_months = timespan;
            }
            if let Some(interval) = interval {
                config.interval_weeks = interval;
            }
            if let Some(stats_dir) = stats_dir {
                config.stats_dir = stats_dir;
            }

            let mut sinks: Vec<Box<dyn SeriesSink>> =
                vec![Box::new(LocalDirSink::new(config.stats_dir.clone()))];
            if let Some(bucket) = s3_bucket {
                info!(bucket = %bucket, gzip, "S3 upload enabled");
                sinks.push(Box::new(S3Sink::from_env(bucket, s3_prefix).await));
            }

            run_trend(&config, &input, csv, gzip, &sinks).await?;
        }
        Commands::Resolve {
            input,
            ontology,
            at,
        } => {
            let scale = config.scale()?;
            let resources = load_resources(&input, &scale)?;
            let at = at.unwrap_or_else(Utc::now);

            let resource = resources
                .iter()
                .find(|r| r.key() == ontology)
                .ok_or_else(|| anyhow!("ontology '{}' not found in {}", ontology, input.display()))?;

            match latest_rating_before(resource, &at) {
                Some(stars) => info!(ontology = %ontology, at = %at, stars, "Rating resolved"),
                None => warn!(ontology = %ontology, at = %at, "No snapshot before this instant"),
            }
        }
    }

    Ok(())
}

/// Computes the trend ending now and hands every encoded result to each sink.
#[tracing::instrument(skip(config, input, sinks), fields(input = %input.display()))]
async fn run_trend(
    config: &TrendConfig,
    input: &Path,
    csv: bool,
    gzip: bool,
    sinks: &[Box<dyn SeriesSink>],
) -> Result<()> {
    let scale = config.scale()?;
    let resources = load_resources(input, &scale)?;
    info!(ontologies = resources.len(), "Snapshots loaded");

    let series = star_trend(&resources, &config.plan(), &scale, Utc::now())
        .context("cannot compute star trend")?;
    print_pretty(&series);

    let mut files = vec![
        (SERIES_FILE_NAME, to_json_bytes(&series)?),
        (CHART_FILE_NAME, to_json_bytes(&star_figure(&series))?),
    ];
    if csv {
        files.push((SERIES_CSV_FILE_NAME, series_csv(&series)?));
    }

    for (name, body) in files {
        let (name, body) = encode_body(name, body, gzip)?;
        let content_type = content_type_for(&name);
        for sink in sinks {
            sink.put(&name, body.clone(), content_type).await?;
        }
    }

    info!(
        stats_dir = %config.stats_dir.display(),
        latest_population = series.latest_population(),
        "Star trend written"
    );
    Ok(())
}
