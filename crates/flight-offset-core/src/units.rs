// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Display-side unit conversions. Everything upstream is kilometres and kilograms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const KM_PER_MILE: f64 = 1.609344;
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;
pub const KG_PER_POUND: f64 = 0.45359237;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown unit: {0}")]
pub struct UnitParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[default]
    Kilometers,
    Miles,
    NauticalMiles,
}

impl DistanceUnit {
    pub fn from_km(&self, km: f64) -> f64 {
        match self {
            DistanceUnit::Kilometers => km,
            DistanceUnit::Miles => km / KM_PER_MILE,
            DistanceUnit::NauticalMiles => km / KM_PER_NAUTICAL_MILE,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            DistanceUnit::Kilometers => "km",
            DistanceUnit::Miles => "miles",
            DistanceUnit::NauticalMiles => "nm",
        }
    }

    /// Two decimals plus suffix, e.g. `"2579.32 miles"`.
    pub fn format(&self, km: f64) -> String {
        format!("{:.2} {}", self.from_km(km), self.suffix())
    }
}

impl FromStr for DistanceUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(DistanceUnit::Kilometers),
            "mi" | "mile" | "miles" => Ok(DistanceUnit::Miles),
            "nm" | "nmi" | "nautical" => Ok(DistanceUnit::NauticalMiles),
            other => Err(UnitParseError(other.to_string())),
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MassUnit {
    #[default]
    Kilograms,
    Pounds,
    Tonnes,
}

impl MassUnit {
    pub fn from_kg(&self, kg: f64) -> f64 {
        match self {
            MassUnit::Kilograms => kg,
            MassUnit::Pounds => kg / KG_PER_POUND,
            MassUnit::Tonnes => kg / 1000.0,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            MassUnit::Kilograms => "kg",
            MassUnit::Pounds => "lbs",
            MassUnit::Tonnes => "t",
        }
    }

    pub fn format(&self, kg: f64) -> String {
        format!("{:.2} {}", self.from_kg(kg), self.suffix())
    }
}
