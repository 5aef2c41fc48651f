// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::airport::{AirportRecord, RawAirportRow};
use std::collections::HashMap;

/// Number of suggestions shown under an airport input.
pub const DEFAULT_SEARCH_LIMIT: usize = 4;

/// Airports offered before the user has typed anything.
pub const POPULAR_CODES: [&str; 4] = ["SFO", "JFK", "LGA", "LAX"];

/// Lowercased copies of the searchable fields, built once at load time.
#[derive(Debug, Clone)]
struct SearchKey {
    code: String,
    name: String,
    municipality: String,
}

impl SearchKey {
    fn new(record: &AirportRecord) -> Self {
        Self {
            code: record.code.to_lowercase(),
            name: record.name.to_lowercase(),
            municipality: record.municipality.to_lowercase(),
        }
    }

    fn contains(&self, q: &str) -> bool {
        self.name.contains(q) || self.municipality.contains(q) || self.code.contains(q)
    }
}

/// Immutable, searchable set of airports.
///
/// Built once from a feed; rebuilding means constructing a new directory.
#[derive(Debug, Clone, Default)]
pub struct AirportDirectory {
    records: Vec<AirportRecord>,
    keys: Vec<SearchKey>,
    code_index: HashMap<String, usize>,
    rejected: usize,
}

impl AirportDirectory {
    /// Builds a directory from raw feed rows.
    ///
    /// Rows that fail validation are skipped, never fatal. The first row for a
    /// given code wins and source order is kept for ranking ties.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawAirportRow>,
    {
        let rows = rows.into_iter();
        let mut dir = Self {
            records: Vec::with_capacity(rows.size_hint().0),
            ..Self::default()
        };
        let mut duplicates = 0usize;

        for row in rows {
            let record = match row.normalize() {
                Ok(r) => r,
                Err(reason) => {
                    log::trace!("Skipping airport row {:?}: {}", row.code, reason);
                    dir.rejected += 1;
                    continue;
                }
            };
            if dir.code_index.contains_key(&record.code) {
                duplicates += 1;
                dir.rejected += 1;
                continue;
            }
            dir.code_index.insert(record.code.clone(), dir.records.len());
            dir.keys.push(SearchKey::new(&record));
            dir.records.push(record);
        }

        log::debug!(
            "Built airport directory — accepted={} rejected={} duplicates={}",
            dir.records.len(),
            dir.rejected,
            duplicates
        );
        dir
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped during [`AirportDirectory::build`], duplicates included.
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirportRecord> {
        self.records.iter()
    }

    /// Case-insensitive substring search over name, municipality and code.
    ///
    /// Code-prefix matches rank first; ties keep source order. A blank query
    /// yields nothing. `limit` is raised to 1 if given as 0.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&AirportRecord> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }
        let limit = limit.max(1);

        let mut prefix = Vec::with_capacity(limit);
        let mut other = Vec::with_capacity(limit);
        for (i, key) in self.keys.iter().enumerate() {
            if key.code.starts_with(&q) {
                prefix.push(i);
                if prefix.len() == limit {
                    break;
                }
            } else if other.len() < limit && key.contains(&q) {
                other.push(i);
            }
        }

        prefix
            .into_iter()
            .chain(other)
            .take(limit)
            .map(|i| &self.records[i])
            .collect()
    }

    /// [`AirportDirectory::search`] with [`DEFAULT_SEARCH_LIMIT`].
    pub fn suggest(&self, query: &str) -> Vec<&AirportRecord> {
        self.search(query, DEFAULT_SEARCH_LIMIT)
    }

    /// Exact, case-insensitive lookup by IATA code.
    pub fn find_by_code(&self, code: &str) -> Option<&AirportRecord> {
        let code = crate::airport::clean_field(code).to_ascii_uppercase();
        self.code_index.get(&code).map(|&i| &self.records[i])
    }

    /// Records for `codes` in the given order; unknown codes are skipped.
    pub fn featured(&self, codes: &[&str]) -> Vec<&AirportRecord> {
        codes.iter().filter_map(|c| self.find_by_code(c)).collect()
    }
}
