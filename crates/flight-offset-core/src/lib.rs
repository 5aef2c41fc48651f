// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Airport search and flight carbon-offset arithmetic.
//!
//! Two independent pieces: [`AirportDirectory`] answers autocomplete queries
//! over a feed of airports, and [`EmissionsCalculator`] turns a pair of
//! airports into distance, carbon and offset-panel figures.

pub mod airport;
pub mod config;
pub mod directory;
pub mod emissions;
pub mod feed;
pub mod trip;
pub mod units;

pub use airport::{AirportRecord, RawAirportRow, RawField};
pub use config::OffsetConfig;
pub use directory::{AirportDirectory, DEFAULT_SEARCH_LIMIT, POPULAR_CODES};
pub use emissions::{
    compute, great_circle_distance_km, CabinClass, EmissionFactors, EmissionsCalculator,
    EmissionsConfig, EmissionsError, EmissionsResult, CARBON_PER_PANEL_KG, EARTH_RADIUS_KM,
};
pub use trip::{MissingSide, Selection, TripRequest};
