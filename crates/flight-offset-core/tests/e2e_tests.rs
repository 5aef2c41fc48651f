// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use flight_offset_core::feed::{self, FeedFetcher, FeedFormat};
use flight_offset_core::units::{DistanceUnit, MassUnit};
use flight_offset_core::{
    AirportDirectory, CabinClass, EmissionsCalculator, EmissionsError, MissingSide,
    OffsetConfig, Selection,
};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

const CSV_FEED: &str = "\
id,ident,type,name,latitude_deg,longitude_deg,municipality,iata_code
3878,KSFO,large_airport,\"San Francisco International Airport\",37.6213,-122.379,\"San Francisco\",SFO
3622,KJFK,large_airport,\"John F Kennedy International Airport\",40.6413,-73.7781,\"New York\",JFK
3697,KLGA,large_airport,\"La Guardia Airport\",40.777199,-73.872597,\"New York\",LGA
20,KSQL,medium_airport,\"San Carlos Airport\",37.511901,-122.249001,\"San Carlos\",SQL
99,XXXX,large_airport,\"Broken Coordinates\",,\"abc\",\"Nowhere\",BRK
";

const JSON_FEED: &str = r#"[
  {"iata_code": "LHR", "name": "London Heathrow Airport", "municipality": "London", "latitude_deg": 51.4706, "longitude_deg": -0.461941},
  {"iata_code": "CDG", "name": "Charles de Gaulle International Airport", "municipality": "Paris", "latitude_deg": "49.012798", "longitude_deg": "2.55"}
]"#;

#[test]
fn test_csv_feed_to_result() {
    let dir = tempdir().unwrap();
    let feed_path = dir.path().join("airports.csv");
    fs::write(&feed_path, CSV_FEED).unwrap();

    let config_path = dir.path().join("config.json");
    let mut config = OffsetConfig::default();
    config.feed.airport_types = vec!["large_airport".to_string()];
    config.save(&config_path).unwrap();
    let config = OffsetConfig::load(&config_path);

    let fetcher = FeedFetcher::new(dir.path().join("cache"), Duration::from_secs(60));
    let source = feed_path.to_string_lossy().to_string();
    let rows = feed::load_rows(&source, &config.feed.airport_types, &fetcher).unwrap();
    assert_eq!(rows.len(), 4);

    let directory = AirportDirectory::build(rows);
    assert_eq!(directory.len(), 3);
    assert_eq!(directory.rejected(), 1);
    assert!(directory.find_by_code("SQL").is_none());

    let suggestions: Vec<_> = directory
        .search("new york", config.search.limit)
        .iter()
        .map(|a| a.label())
        .collect();
    assert_eq!(
        suggestions,
        vec![
            "John F Kennedy International Airport (JFK)",
            "La Guardia Airport (LGA)"
        ]
    );

    let mut selection = Selection::new(Some("sfo"), Some("jfk"));
    selection.cabin_class = CabinClass::parse_lenient("coach");
    selection.round_trip = true;
    let request = selection.resolve(&directory).unwrap();

    let calculator = EmissionsCalculator::new(config.emissions);
    let result = calculator.compute(&request).unwrap();
    assert!((result.distance_km - 4152.06).abs() < 0.1);
    assert_eq!(result.panels_needed, 6);
    assert_eq!(DistanceUnit::Miles.format(result.distance_km), "2579.97 miles");
    assert!(MassUnit::Pounds.format(result.carbon_kg).ends_with(" lbs"));
}

#[test]
fn test_json_feed_with_custom_panel_size() {
    let dir = tempdir().unwrap();
    let feed_path = dir.path().join("airports.json");
    fs::write(&feed_path, JSON_FEED).unwrap();
    assert_eq!(FeedFormat::detect(&feed_path.to_string_lossy()), FeedFormat::Json);

    let rows = feed::read_path(&feed_path, FeedFormat::Json, &[]).unwrap();
    let directory = AirportDirectory::build(rows);
    assert_eq!(directory.len(), 2);

    let mut config = OffsetConfig::default();
    config.emissions.carbon_per_panel_kg = 10.0;
    let calculator = EmissionsCalculator::new(config.emissions);

    let request = Selection::new(Some("LHR"), Some("CDG"))
        .resolve(&directory)
        .unwrap();
    let result = calculator.compute(&request).unwrap();
    // LHR-CDG is roughly 350 km.
    assert!(result.distance_km > 330.0 && result.distance_km < 370.0);
    assert_eq!(result.panels_needed, (result.carbon_kg / 10.0).ceil() as u64);
}

#[test]
fn test_incomplete_selection_is_typed() {
    let directory = AirportDirectory::build(
        feed::csv_rows(CSV_FEED.as_bytes(), &[]).unwrap(),
    );
    let err = Selection::new(Some("SFO"), Some("BRK"))
        .resolve(&directory)
        .unwrap_err();
    assert_eq!(
        err,
        EmissionsError::IncompleteSelection {
            missing: MissingSide::Destination
        }
    );
    assert_eq!(
        err.to_string(),
        "Incomplete selection: destination airport not selected"
    );
}

#[test]
fn test_missing_local_feed_is_an_error() {
    let dir = tempdir().unwrap();
    let fetcher = FeedFetcher::new(dir.path(), Duration::from_secs(60));
    let missing = dir.path().join("absent.csv");
    let result = feed::load_rows(&missing.to_string_lossy(), &[], &fetcher);
    assert!(matches!(result, Err(feed::FeedError::Io(_))));
}

const MAP_JSON_FEED: &str = r#"[
  {"IATA": "SFO", "Name": "San Francisco International Airport", "City": "San Francisco", "Latitude": 37.6213, "Longitude": -122.379},
  {"IATA": "JFK", "Name": "John F Kennedy International Airport", "City": "New York", "Latitude": 40.6413, "Longitude": -73.7781},
  {"IATA": 404, "Name": "Numeric code"}
]"#;

#[test]
fn test_map_json_feed_with_broken_config() {
    let dir = tempdir().unwrap();
    let feed_path = dir.path().join("airports.json");
    fs::write(&feed_path, MAP_JSON_FEED).unwrap();
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, "{\"search\": ").unwrap();

    let config = OffsetConfig::load(&config_path);
    assert_eq!(config, OffsetConfig::default());

    let fetcher = FeedFetcher::new(dir.path().join("cache"), Duration::from_secs(60));
    let rows = feed::load_rows(&feed_path.to_string_lossy(), &config.feed.airport_types, &fetcher)
        .unwrap();
    assert_eq!(rows.len(), 2);

    let directory = AirportDirectory::build(rows);
    let request = Selection::new(Some("sfo"), Some("jfk"))
        .resolve(&directory)
        .unwrap();
    let result = EmissionsCalculator::new(config.emissions)
        .compute(&request)
        .unwrap();
    assert!(result.distance_km > 4100.0 && result.distance_km < 4200.0);
}
