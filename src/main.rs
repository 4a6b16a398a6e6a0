//! CLI entry point for the AQI ranker.
//!
//! Provides subcommands for building the full city dashboard, checking a
//! single city, replaying a saved station payload, and listing the default
//! city set.

use anyhow::{Context, Result};
use aqi_ranker::aggregate::aggregate;
use aqi_ranker::analyzers::types::{AqiReading, Dashboard};
use aqi_ranker::config::{Config, DEFAULT_CITIES, DEFAULT_CONCURRENCY, TOKEN_ENV};
use aqi_ranker::fetch::{BasicClient, fetch_bytes};
use aqi_ranker::infra::waqi::{DEFAULT_ENDPOINT, WaqiClient};
use aqi_ranker::output::{OutputFormat, print_json, print_pretty, render};
use aqi_ranker::payload::parse_payload;
use aqi_ranker::services::station_api::StationApi;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aqi_ranker")]
#[command(about = "Real-time air quality dashboard for world cities", long_about = None)]
struct Cli {
    /// WAQI API token
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every city, rank the featured one and print the dashboard
    Dashboard {
        /// City given its own card, forecast and percentile
        #[arg(short, long)]
        featured: Option<String>,

        /// City to include (repeatable); defaults to the built-in list
        #[arg(short, long = "city", value_name = "NAME")]
        cities: Vec<String>,

        /// Maximum number of concurrent city fetches
        #[arg(short = 'j', long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Provider API root
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
    /// Fetch and print the validated reading for one city
    City {
        #[arg(value_name = "NAME")]
        name: String,

        /// Provider API root
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
    /// Validate a saved station payload from a file or URL
    Inspect {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// List the default cities
    ListCities,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aqi_ranker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aqi_ranker.log"));

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
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Dashboard {
            featured,
            cities,
            concurrency,
            format,
            endpoint,
        } => {
            let mut config = Config::new(require_token(cli.token)?)?
                .with_endpoint(&endpoint)
                .with_cities(cities)
                .with_concurrency(concurrency);
            if let Some(featured) = featured {
                config = config.with_featured_city(&featured);
            }
            info!(config = ?config, "Building dashboard");

            let dashboard = build_dashboard(&config).await?;
            print_pretty(&dashboard);
            render(&dashboard, format, &mut stdout)?;
        }
        Commands::City { name, endpoint } => {
            let config = Config::new(require_token(cli.token)?)?.with_endpoint(&endpoint);
            let api = station_api(&config)?;

            let data = api
                .fetch_station(&name)
                .await
                .with_context(|| format!("Failed to fetch station data for {name}"))?;
            print_reading(&name, AqiReading::from_station(&name, &data), &mut stdout)?;
        }
        Commands::Inspect { source } => {
            let bytes = fetcher(&source).await?;
            let data = parse_payload(&bytes).context("Payload is not a usable station feed")?;
            print_reading(&source, AqiReading::from_station(&source, &data), &mut stdout)?;
        }
        Commands::ListCities => {
            for city in DEFAULT_CITIES {
                writeln!(stdout, "{city}")?;
            }
        }
    }

    Ok(())
}

fn require_token(token: Option<String>) -> Result<String> {
    token.with_context(|| format!("{TOKEN_ENV} must be set (or pass --token)"))
}

fn station_api(config: &Config) -> Result<Arc<dyn StationApi>> {
    let http = BasicClient::new().context("Failed to build HTTP client")?;
    let client = WaqiClient::new(http, &config.endpoint, config.token.clone())?;
    Ok(Arc::new(client))
}

/// Runs one full fetch-and-rank pass.
#[tracing::instrument(
    skip(config),
    fields(featured = %config.featured_city, cities = config.cities.len())
)]
async fn build_dashboard(config: &Config) -> Result<Dashboard> {
    let api = station_api(config)?;

    let aggregation = aggregate(
        api,
        &config.cities,
        &config.featured_city,
        config.concurrency,
    )
    .await;

    if !aggregation.failures.is_empty() {
        warn!(
            failed = aggregation.failures.len(),
            "Some cities could not be fetched"
        );
    }

    Ok(Dashboard::build(
        &aggregation,
        &config.cities,
        Utc::now(),
        Local::now().date_naive(),
    ))
}

fn print_reading<W: Write>(
    source: &str,
    reading: Option<AqiReading>,
    out: &mut W,
) -> Result<()> {
    match reading {
        Some(reading) => print_json(&reading, out),
        None => {
            warn!(source, "Station reported no valid AQI");
            Ok(())
        }
    }
}

/// Loads a station payload from a local file path or fetches it over HTTP.
#[tracing::instrument]
async fn fetcher(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new()?;
        let url = reqwest::Url::parse(source)?;
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(source).with_context(|| format!("Failed to read {source}"))?
    };
    Ok(bytes)
}
