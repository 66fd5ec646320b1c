//! Command-line heatmap builder.
//!
//! Resolves the postcode column of a CSV or xlsx file through the same
//! stores and geocoder the server uses, and prints the heatmap data as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Resolve customers.csv against the Australian library
//! cargo run --bin resolve -- customers.csv --country AU
//!
//! # Explicit column, reproducible picks, no network
//! cargo run --bin resolve -- customers.xlsx --country NZ --column "Post Code" --seed 7 --offline
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use heatmap_server::domain::Country;
use heatmap_server::geocode::{Geocoder, NominatimClient, NominatimConfig, StaticGeocoder};
use heatmap_server::heatmap::{Heatmap, HeatmapError, Intensity, resolve_rows};
use heatmap_server::resolver::{PostcodeResolver, SelectionMode};
use heatmap_server::store::{StoreConfig, StoreRegistry};
use heatmap_server::upload::UploadTable;
use heatmap_server::web::HeatmapResponse;

/// Build heatmap data from a CSV or xlsx file of postcodes.
#[derive(Parser)]
#[command(name = "resolve")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV or xlsx file with a postcode column
    input: PathBuf,

    /// Country code or name
    #[arg(short, long)]
    country: String,

    /// Postcode column header (guessed when omitted)
    #[arg(long)]
    column: Option<String>,

    /// Heat intensity, 1 to 10
    #[arg(short, long, default_value_t = 5)]
    intensity: i64,

    /// Directory holding library/ and missing/
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Seed for candidate selection
    #[arg(long, conflicts_with = "first")]
    seed: Option<u64>,

    /// Always pick the first candidate
    #[arg(long)]
    first: bool,

    /// Use cached data only; never call the geocoder
    #[arg(long)]
    offline: bool,

    /// Nominatim base URL
    #[arg(long, env = "NOMINATIM_BASE_URL")]
    nominatim_url: Option<String>,
}

impl Cli {
    fn selection(&self) -> SelectionMode {
        match (self.first, self.seed) {
            (true, _) => SelectionMode::First,
            (false, Some(seed)) => SelectionMode::Seeded(seed),
            (false, None) => SelectionMode::Random,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let heatmap = if cli.offline {
        run(&cli, StaticGeocoder::new()).await?
    } else {
        let mut config = NominatimConfig::new();
        if let Some(url) = &cli.nominatim_url {
            config = config.with_base_url(url);
        }
        let geocoder = NominatimClient::new(config).context("failed to create geocoder")?;
        run(&cli, geocoder).await?
    };

    match heatmap {
        Some(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        None => {
            eprintln!("{}", HeatmapError::NoResults);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Resolve the input file; `None` when no row resolved.
async fn run<G: Geocoder>(cli: &Cli, geocoder: G) -> Result<Option<HeatmapResponse>> {
    let country = Country::parse(&cli.country)?;
    let intensity = Intensity::new(cli.intensity)?;

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let table = UploadTable::from_bytes(&bytes)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let column = match cli.column.as_deref() {
        Some(column) => column,
        None => table.guess_postcode_column(),
    };
    let cells = table.column(column)?;

    let stores = StoreRegistry::new(StoreConfig::new(&cli.data_dir));
    let library = stores.library(country).await?;
    let missing = stores.missing_cache(country).await?;
    let mut resolver = PostcodeResolver::new(country, library, missing, geocoder)
        .with_selection(cli.selection().strategy());

    let outcome = resolve_rows(&mut resolver, cells).await?;
    eprintln!(
        "{}: {} of {} rows resolved ({} not found, {} failed lookups)",
        column,
        outcome.resolved.len(),
        outcome.total(),
        outcome.not_found,
        outcome.lookup_failed
    );

    match Heatmap::build(&outcome.resolved, intensity, country) {
        Ok(heatmap) => Ok(Some(HeatmapResponse::new(&heatmap, &outcome))),
        Err(HeatmapError::NoResults) => Ok(None),
    }
}
