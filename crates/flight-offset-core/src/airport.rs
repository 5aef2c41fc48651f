// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A validated airport, as stored in an [`crate::directory::AirportDirectory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirportRecord {
    /// IATA code, always 3 uppercase ASCII letters.
    pub code: String,
    pub name: String,
    pub municipality: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl AirportRecord {
    /// Suggestion text shown in dropdowns, e.g. `"San Francisco International Airport (SFO)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.code)
    }
}

/// A field that may arrive as a JSON number or as (possibly quoted) text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    Number(f64),
    Text(String),
}

impl RawField {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RawField::Number(n) => Some(*n),
            RawField::Text(s) => clean_field(s).parse::<f64>().ok(),
        }
    }
}

impl From<f64> for RawField {
    fn from(value: f64) -> Self {
        RawField::Number(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        RawField::Text(value.to_string())
    }
}

/// An untyped airport row handed over by a feed adapter.
///
/// Nothing here is trusted: fields may be missing, padded, quoted or garbage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAirportRow {
    #[serde(default, alias = "iata_code", alias = "iata", alias = "IATA")]
    pub code: Option<String>,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
    #[serde(default, alias = "city", alias = "City")]
    pub municipality: Option<String>,
    #[serde(default, alias = "latitude_deg", alias = "lat", alias = "Latitude")]
    pub latitude: Option<RawField>,
    #[serde(default, alias = "longitude_deg", alias = "lon", alias = "Longitude")]
    pub longitude: Option<RawField>,
}

/// Why a raw row did not make it into a directory.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowRejection {
    #[error("missing airport code")]
    MissingCode,
    #[error("malformed airport code: {0:?}")]
    MalformedCode(String),
    #[error("latitude missing, non-finite or outside [-90, 90]")]
    BadLatitude,
    #[error("longitude missing, non-finite or outside [-180, 180]")]
    BadLongitude,
}

impl RawAirportRow {
    pub fn new(
        code: &str,
        name: &str,
        municipality: &str,
        latitude: impl Into<RawField>,
        longitude: impl Into<RawField>,
    ) -> Self {
        Self {
            code: Some(code.to_string()),
            name: Some(name.to_string()),
            municipality: Some(municipality.to_string()),
            latitude: Some(latitude.into()),
            longitude: Some(longitude.into()),
        }
    }

    /// Cleans and validates the row. A row is either fully accepted or rejected.
    pub fn normalize(&self) -> Result<AirportRecord, RowRejection> {
        let code = self
            .code
            .as_deref()
            .map(clean_field)
            .filter(|c| !c.is_empty())
            .ok_or(RowRejection::MissingCode)?;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RowRejection::MalformedCode(code.to_string()));
        }
        let code = code.to_ascii_uppercase();

        let latitude = self
            .latitude
            .as_ref()
            .and_then(RawField::as_f64)
            .filter(|lat| lat.is_finite() && (-90.0..=90.0).contains(lat))
            .ok_or(RowRejection::BadLatitude)?;
        let longitude = self
            .longitude
            .as_ref()
            .and_then(RawField::as_f64)
            .filter(|lon| lon.is_finite() && (-180.0..=180.0).contains(lon))
            .ok_or(RowRejection::BadLongitude)?;

        let name = match self.name.as_deref().map(clean_field) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => code.clone(),
        };
        let municipality = self
            .municipality
            .as_deref()
            .map(clean_field)
            .unwrap_or_default()
            .to_string();

        Ok(AirportRecord {
            code,
            name,
            municipality,
            latitude,
            longitude,
        })
    }
}

/// Trims whitespace and any surrounding quote characters.
pub fn clean_field(raw: &str) -> &str {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
}
