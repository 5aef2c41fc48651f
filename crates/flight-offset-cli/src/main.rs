// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flight_offset_core::feed::{self, FeedFetcher};
use flight_offset_core::units::{DistanceUnit, MassUnit};
use flight_offset_core::{
    AirportDirectory, CabinClass, EmissionsCalculator, EmissionsError, OffsetConfig, Selection,
    POPULAR_CODES,
};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Airport feed: a local CSV/JSON file or an http(s) URL
    #[arg(short, long, env = "FLIGHT_OFFSET_FEED")]
    feed: Option<String>,

    /// Path to config.json
    #[arg(short, long, env = "FLIGHT_OFFSET_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest airports matching a name, city or code
    Search {
        #[arg(default_value = "")]
        query: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show the airport with an exact IATA code
    Lookup { code: String },
    /// Compute distance, emissions and offset panels for a trip
    Calc {
        origin: String,
        destination: String,
        /// economy, business or first (anything else counts as economy)
        #[arg(long, default_value = "economy")]
        class: String,
        #[arg(long)]
        round_trip: bool,
        /// km, mi or nm
        #[arg(long, default_value = "km")]
        units: DistanceUnit,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn verbosity_level(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        _ => Some(LevelFilter::Debug),
    }
}

/// Starts the terminal logger before anything else runs. Until the config
/// is read only `-v` decides the level; see [`apply_configured_level`].
fn init_logging(verbose: u8) {
    let _ = TermLogger::init(
        LevelFilter::Trace,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    log::set_max_level(verbosity_level(verbose).unwrap_or(LevelFilter::Warn));
}

/// `-v` wins over the config file's `log_level`.
fn apply_configured_level(verbose: u8, configured: &str) {
    if verbosity_level(verbose).is_none() {
        log::set_max_level(LevelFilter::from_str(configured).unwrap_or(LevelFilter::Warn));
    }
}

fn load_directory(cli: &Cli, config: &OffsetConfig) -> Result<AirportDirectory> {
    let source = cli.feed.as_deref().unwrap_or(&config.feed.url);
    let fetcher = FeedFetcher::new(
        FeedFetcher::default_cache_dir(),
        Duration::from_secs(config.feed.cache_ttl_secs),
    );
    let rows = feed::load_rows(source, &config.feed.airport_types, &fetcher)
        .with_context(|| format!("Failed to load airport feed {}", source))?;
    let directory = AirportDirectory::build(rows);
    log::info!(
        "Loaded {} airports from {} ({} rows skipped)",
        directory.len(),
        source,
        directory.rejected()
    );
    Ok(directory)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(OffsetConfig::default_path);
    let config = OffsetConfig::load(&config_path);
    apply_configured_level(cli.verbose, &config.log_level);

    match &cli.command {
        Commands::Config { init } => {
            if *init {
                if config_path.exists() {
                    println!("Config already exists at {}", config_path.display());
                } else {
                    OffsetConfig::default().save(&config_path)?;
                    println!("Wrote default config to {}", config_path.display());
                }
            }
            println!("# {}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Search { query, limit } => {
            let directory = load_directory(&cli, &config)?;
            let limit = limit.unwrap_or(config.search.limit);
            let results = if query.trim().is_empty() {
                println!("Popular airports:");
                directory.featured(&POPULAR_CODES)
            } else {
                directory.search(query, limit)
            };
            if results.is_empty() {
                println!("No airports match '{}'", query);
            }
            for airport in results {
                println!("{}", airport.label());
            }
        }
        Commands::Lookup { code } => {
            let directory = load_directory(&cli, &config)?;
            match directory.find_by_code(code) {
                Some(a) => {
                    println!("{}", a.label());
                    if !a.municipality.is_empty() {
                        println!("City: {}", a.municipality);
                    }
                    println!("Lat: {:.4}, Lon: {:.4}", a.latitude, a.longitude);
                }
                None => println!("No airport with code '{}'", code),
            }
        }
        Commands::Calc {
            origin,
            destination,
            class,
            round_trip,
            units,
            json,
        } => {
            let directory = load_directory(&cli, &config)?;
            let calculator = EmissionsCalculator::new(config.emissions);

            let mut selection = Selection::new(Some(origin.as_str()), Some(destination.as_str()));
            selection.cabin_class = CabinClass::parse_lenient(class);
            selection.round_trip = *round_trip;

            let request = match selection.resolve(&directory) {
                Ok(r) => r,
                Err(EmissionsError::IncompleteSelection { missing }) => {
                    eprintln!(
                        "Please select both origin and destination airports ({} not found).",
                        missing
                    );
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            };
            let result = calculator.compute(&request)?;

            if *json {
                let out = serde_json::json!({
                    "origin": request.origin,
                    "destination": request.destination,
                    "cabin_class": request.cabin_class,
                    "round_trip": request.round_trip,
                    "result": result,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!(
                    "{} -> {} ({}, {})",
                    request.origin.label(),
                    request.destination.label(),
                    request.cabin_class,
                    if request.round_trip { "round trip" } else { "one way" }
                );
                println!("Distance:       {}", units.format(result.distance_km));
                println!("Total distance: {}", units.format(result.total_distance_km));
                println!(
                    "Carbon:         {} ({})",
                    MassUnit::Kilograms.format(result.carbon_kg),
                    MassUnit::Pounds.format(result.carbon_kg)
                );
                println!("Panels needed:  {}", result.panels_needed);
            }
        }
    }

    Ok(())
}
