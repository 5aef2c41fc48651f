// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Adapters that turn airport feeds into [`RawAirportRow`]s.
//!
//! One adapter per feed shape; neither validates coordinates, that is left
//! to [`crate::directory::AirportDirectory::build`].

use crate::airport::{clean_field, RawAirportRow, RawField};
use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FEED_URL: &str = "https://davidmegginson.github.io/ourairports-data/airports.csv";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;
const HTTP_TIMEOUT_SECS: u64 = 30;

const CODE_COLUMNS: &[&str] = &["iata_code", "code", "iata"];
const NAME_COLUMNS: &[&str] = &["name"];
const MUNICIPALITY_COLUMNS: &[&str] = &["municipality", "city"];
const LATITUDE_COLUMNS: &[&str] = &["latitude_deg", "latitude", "lat"];
const LONGITUDE_COLUMNS: &[&str] = &["longitude_deg", "longitude", "lon"];
const TYPE_COLUMNS: &[&str] = &["type"];

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed is missing a required column: {0}")]
    MissingColumn(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Csv,
    Json,
}

impl FeedFormat {
    /// `.json` (ignoring any query string) is JSON, anything else is CSV.
    pub fn detect(source: &str) -> Self {
        let path = source.split(['?', '#']).next().unwrap_or(source);
        if path.to_ascii_lowercase().ends_with(".json") {
            FeedFormat::Json
        } else {
            FeedFormat::Csv
        }
    }
}

/// Reads a headed CSV feed.
///
/// Columns are found by header name. When `airport_types` is non-empty and the
/// feed has a `type` column, only rows whose type is listed are kept.
pub fn csv_rows<R: Read>(
    reader: R,
    airport_types: &[String],
) -> Result<Vec<RawAirportRow>, FeedError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |names: &[&str]| {
        headers.iter().position(|h| {
            let h = clean_field(h);
            names.iter().any(|n| h.eq_ignore_ascii_case(n))
        })
    };

    let idx_code = column(CODE_COLUMNS).ok_or(FeedError::MissingColumn("iata_code"))?;
    let idx_lat = column(LATITUDE_COLUMNS).ok_or(FeedError::MissingColumn("latitude_deg"))?;
    let idx_lon = column(LONGITUDE_COLUMNS).ok_or(FeedError::MissingColumn("longitude_deg"))?;
    let idx_name = column(NAME_COLUMNS);
    let idx_municipality = column(MUNICIPALITY_COLUMNS);
    let idx_type = if airport_types.is_empty() {
        None
    } else {
        column(TYPE_COLUMNS)
    };

    let mut rows = Vec::new();
    let mut filtered = 0usize;
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                error!("CSV parsing error: {}", e);
                continue;
            }
        };

        if let Some(i) = idx_type {
            let kind = record.get(i).map(clean_field).unwrap_or_default();
            if !airport_types.iter().any(|t| t.eq_ignore_ascii_case(kind)) {
                filtered += 1;
                continue;
            }
        }

        let text = |idx: Option<usize>| idx.and_then(|i| record.get(i)).map(str::to_string);
        rows.push(RawAirportRow {
            code: text(Some(idx_code)),
            name: text(idx_name),
            municipality: text(idx_municipality),
            latitude: text(Some(idx_lat)).map(RawField::Text),
            longitude: text(Some(idx_lon)).map(RawField::Text),
        });
    }

    debug!("CSV feed read — rows={} filtered_by_type={}", rows.len(), filtered);
    Ok(rows)
}

/// Reads a JSON array of airport objects.
///
/// Elements that do not fit [`RawAirportRow`] are logged and skipped; only a
/// document that is not a JSON array fails the whole feed.
pub fn json_rows<R: Read>(reader: R) -> Result<Vec<RawAirportRow>, FeedError> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
    let mut rows = Vec::with_capacity(values.len());
    let mut skipped = 0usize;

    for (i, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawAirportRow>(value) {
            Ok(row) => rows.push(row),
            Err(e) => {
                error!("JSON row {} skipped: {}", i, e);
                skipped += 1;
            }
        }
    }

    debug!("JSON feed read — rows={} skipped={}", rows.len(), skipped);
    Ok(rows)
}

/// Reads a local feed file in the given format.
pub fn read_path<P: AsRef<Path>>(
    path: P,
    format: FeedFormat,
    airport_types: &[String],
) -> Result<Vec<RawAirportRow>, FeedError> {
    let reader = BufReader::new(File::open(path)?);
    match format {
        FeedFormat::Csv => csv_rows(reader, airport_types),
        FeedFormat::Json => json_rows(reader),
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Downloads feeds over HTTP and keeps a copy on disk.
pub struct FeedFetcher {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl FeedFetcher {
    pub fn new<P: Into<PathBuf>>(cache_dir: P, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            ttl,
        }
    }

    pub fn default_cache_dir() -> PathBuf {
        directories::ProjectDirs::from("org", "flight-offset", "flight-offset")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".flight-offset-cache"))
    }

    /// Local file the feed at `url` is cached in.
    pub fn cache_path(&self, url: &str) -> PathBuf {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let file_name = path
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("airports.feed");
        self.cache_dir.join(file_name)
    }

    fn is_fresh(&self, path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .map(|age| age < self.ttl)
            .unwrap_or(false)
    }

    /// Returns a local path holding the feed, downloading it if the cached copy
    /// is missing or older than the TTL. A failed download falls back to a stale
    /// cached copy when there is one.
    pub fn fetch(&self, url: &str) -> Result<PathBuf, FeedError> {
        let cache_path = self.cache_path(url);
        if self.is_fresh(&cache_path) {
            debug!("Using cached airport feed — cache_path={}", cache_path.display());
            return Ok(cache_path);
        }

        match self.download(url, &cache_path) {
            Ok(()) => Ok(cache_path),
            Err(e) if cache_path.exists() => {
                warn!(
                    "Airport feed download failed, using stale cache — url={} error={}",
                    url, e
                );
                Ok(cache_path)
            }
            Err(e) => Err(e),
        }
    }

    fn download(&self, url: &str, cache_path: &Path) -> Result<(), FeedError> {
        info!(
            "Airport feed cache expired or missing; fetching — cache_path={} url={}",
            cache_path.display(),
            url
        );
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        let response = client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        fs::create_dir_all(&self.cache_dir)?;
        fs::write(cache_path, &bytes)?;
        info!(
            "Airport feed cache updated — cache_path={} bytes={}",
            cache_path.display(),
            bytes.len()
        );
        Ok(())
    }
}

/// Loads rows from a local path or an `http(s)://` URL.
pub fn load_rows(
    source: &str,
    airport_types: &[String],
    fetcher: &FeedFetcher,
) -> Result<Vec<RawAirportRow>, FeedError> {
    let format = FeedFormat::detect(source);
    let path = if is_remote(source) {
        fetcher.fetch(source)?
    } else {
        PathBuf::from(source)
    };
    read_path(path, format, airport_types)
}
