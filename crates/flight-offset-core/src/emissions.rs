// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airport::AirportRecord;
use crate::trip::{MissingSide, TripRequest};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Mean Earth radius used for every great-circle distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// kg CO2 offset by one panel.
pub const CARBON_PER_PANEL_KG: f64 = 240.4;

/// kg CO2 per passenger-km.
pub const ECONOMY_KG_PER_KM: f64 = 0.150;
pub const BUSINESS_KG_PER_KM: f64 = 0.300;
pub const FIRST_KG_PER_KM: f64 = 0.450;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmissionsError {
    #[error("Invalid coordinates: ({lat1}, {lon1}) -> ({lat2}, {lon2})")]
    InvalidCoordinates {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },
    #[error("Incomplete selection: {missing} not selected")]
    IncompleteSelection { missing: MissingSide },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CabinClass {
    #[default]
    Economy,
    Business,
    First,
}

impl CabinClass {
    /// Never fails: anything unrecognised is economy.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "business" => CabinClass::Business,
            "first" => CabinClass::First,
            _ => CabinClass::Economy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CabinClass::Economy => "economy",
            CabinClass::Business => "business",
            CabinClass::First => "first",
        }
    }
}

impl From<&str> for CabinClass {
    fn from(s: &str) -> Self {
        Self::parse_lenient(s)
    }
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-class emissions factors in kg CO2 per passenger-km.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactors {
    #[serde(default = "default_economy")]
    pub economy: f64,
    #[serde(default = "default_business")]
    pub business: f64,
    #[serde(default = "default_first")]
    pub first: f64,
}

fn default_economy() -> f64 {
    ECONOMY_KG_PER_KM
}
fn default_business() -> f64 {
    BUSINESS_KG_PER_KM
}
fn default_first() -> f64 {
    FIRST_KG_PER_KM
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            economy: ECONOMY_KG_PER_KM,
            business: BUSINESS_KG_PER_KM,
            first: FIRST_KG_PER_KM,
        }
    }
}

impl EmissionFactors {
    pub fn kg_per_km(&self, class: CabinClass) -> f64 {
        match class {
            CabinClass::Economy => self.economy,
            CabinClass::Business => self.business,
            CabinClass::First => self.first,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionsConfig {
    #[serde(default = "default_earth_radius")]
    pub earth_radius_km: f64,
    #[serde(default = "default_carbon_per_panel")]
    pub carbon_per_panel_kg: f64,
    #[serde(default)]
    pub factors: EmissionFactors,
}

fn default_earth_radius() -> f64 {
    EARTH_RADIUS_KM
}
fn default_carbon_per_panel() -> f64 {
    CARBON_PER_PANEL_KG
}

impl Default for EmissionsConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: EARTH_RADIUS_KM,
            carbon_per_panel_kg: CARBON_PER_PANEL_KG,
            factors: EmissionFactors::default(),
        }
    }
}

impl EmissionsConfig {
    /// Replaces non-finite or non-positive values with the built-in constants.
    pub fn sanitized(mut self) -> Self {
        fn fix(value: &mut f64, fallback: f64, what: &str) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("Ignoring invalid {} = {}; using {}", what, value, fallback);
                *value = fallback;
            }
        }
        fix(&mut self.earth_radius_km, EARTH_RADIUS_KM, "earth_radius_km");
        fix(
            &mut self.carbon_per_panel_kg,
            CARBON_PER_PANEL_KG,
            "carbon_per_panel_kg",
        );
        fix(&mut self.factors.economy, ECONOMY_KG_PER_KM, "factors.economy");
        fix(&mut self.factors.business, BUSINESS_KG_PER_KM, "factors.business");
        fix(&mut self.factors.first, FIRST_KG_PER_KM, "factors.first");
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionsResult {
    /// One-way great-circle distance.
    pub distance_km: f64,
    pub total_distance_km: f64,
    pub carbon_kg: f64,
    pub panels_needed: u64,
}

/// Haversine distance on a sphere of [`EARTH_RADIUS_KM`].
pub fn great_circle_distance_km(
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<f64, EmissionsError> {
    haversine(EARTH_RADIUS_KM, lat1, lon1, lat2, lon2)
}

fn haversine(
    radius: f64,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<f64, EmissionsError> {
    if ![lat1, lon1, lat2, lon2].iter().all(|v| v.is_finite()) {
        return Err(EmissionsError::InvalidCoordinates {
            lat1,
            lon1,
            lat2,
            lon2,
        });
    }
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    Ok(radius * c)
}

/// Distance, carbon and panel arithmetic for a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmissionsCalculator {
    config: EmissionsConfig,
}

impl EmissionsCalculator {
    pub fn new(config: EmissionsConfig) -> Self {
        Self {
            config: config.sanitized(),
        }
    }

    pub fn config(&self) -> &EmissionsConfig {
        &self.config
    }

    pub fn emissions_factor_kg_per_km(&self, class: CabinClass) -> f64 {
        self.config.factors.kg_per_km(class)
    }

    pub fn distance_between(
        &self,
        origin: &AirportRecord,
        destination: &AirportRecord,
    ) -> Result<f64, EmissionsError> {
        if origin.code == destination.code {
            return Ok(0.0);
        }
        haversine(
            self.config.earth_radius_km,
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
        )
    }

    pub fn compute(&self, request: &TripRequest<'_>) -> Result<EmissionsResult, EmissionsError> {
        let distance_km = self.distance_between(request.origin, request.destination)?;
        let legs = if request.round_trip { 2.0 } else { 1.0 };
        let total_distance_km = distance_km * legs;
        let carbon_kg = total_distance_km * self.emissions_factor_kg_per_km(request.cabin_class);
        let panels_needed = (carbon_kg / self.config.carbon_per_panel_kg).ceil() as u64;

        Ok(EmissionsResult {
            distance_km,
            total_distance_km,
            carbon_kg,
            panels_needed,
        })
    }
}

/// [`EmissionsCalculator::compute`] with the built-in constants.
pub fn compute(request: &TripRequest<'_>) -> Result<EmissionsResult, EmissionsError> {
    EmissionsCalculator::default().compute(request)
}
