// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airport::AirportRecord;
use crate::directory::AirportDirectory;
use crate::emissions::{CabinClass, EmissionsError};
use std::fmt;

/// A single calculation request. Borrows its airports from the directory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRequest<'a> {
    pub origin: &'a AirportRecord,
    pub destination: &'a AirportRecord,
    pub cabin_class: CabinClass,
    /// `true` doubles the one-way distance.
    pub round_trip: bool,
}

impl<'a> TripRequest<'a> {
    /// One-way economy trip.
    pub fn new(origin: &'a AirportRecord, destination: &'a AirportRecord) -> Self {
        Self {
            origin,
            destination,
            cabin_class: CabinClass::Economy,
            round_trip: false,
        }
    }

    pub fn cabin_class(mut self, class: CabinClass) -> Self {
        self.cabin_class = class;
        self
    }

    pub fn round_trip(mut self, round_trip: bool) -> Self {
        self.round_trip = round_trip;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingSide {
    Origin,
    Destination,
    Both,
}

impl fmt::Display for MissingSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingSide::Origin => f.write_str("origin airport"),
            MissingSide::Destination => f.write_str("destination airport"),
            MissingSide::Both => f.write_str("origin and destination airports"),
        }
    }
}

/// What the form currently holds: two possibly-empty code fields plus options.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub cabin_class: CabinClass,
    pub round_trip: bool,
}

impl Selection {
    pub fn new(origin: Option<&str>, destination: Option<&str>) -> Self {
        Self {
            origin: origin.map(str::to_string),
            destination: destination.map(str::to_string),
            ..Self::default()
        }
    }

    /// Resolves both codes against `directory`.
    ///
    /// Empty or unknown codes give [`EmissionsError::IncompleteSelection`] naming
    /// the side(s) that could not be resolved.
    pub fn resolve<'d>(
        &self,
        directory: &'d AirportDirectory,
    ) -> Result<TripRequest<'d>, EmissionsError> {
        let lookup = |code: &Option<String>| {
            code.as_deref()
                .filter(|c| !c.trim().is_empty())
                .and_then(|c| directory.find_by_code(c))
        };

        match (lookup(&self.origin), lookup(&self.destination)) {
            (Some(origin), Some(destination)) => Ok(TripRequest {
                origin,
                destination,
                cabin_class: self.cabin_class,
                round_trip: self.round_trip,
            }),
            (None, Some(_)) => Err(EmissionsError::IncompleteSelection {
                missing: MissingSide::Origin,
            }),
            (Some(_), None) => Err(EmissionsError::IncompleteSelection {
                missing: MissingSide::Destination,
            }),
            (None, None) => Err(EmissionsError::IncompleteSelection {
                missing: MissingSide::Both,
            }),
        }
    }
}
