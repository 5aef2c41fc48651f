// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::directory::DEFAULT_SEARCH_LIMIT;
use crate::emissions::EmissionsConfig;
use crate::feed::{DEFAULT_CACHE_TTL_SECS, DEFAULT_FEED_URL};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Files with a lower version are rewritten on load. A file without a
/// `schema_version` is taken to be current.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
    /// Allow-list for the CSV `type` column. Empty keeps every row.
    #[serde(default)]
    pub airport_types: Vec<String>,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            airport_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetConfig {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub emissions: EmissionsConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn current_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for OffsetConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            emissions: EmissionsConfig::default(),
            search: SearchConfig::default(),
            feed: FeedConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl OffsetConfig {
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("org", "flight-offset", "flight-offset")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    }

    /// Loads `path`, or the defaults if it is missing. An unreadable or
    /// malformed file logs a warning and also yields the defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: OffsetConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if config.schema_version < CURRENT_SCHEMA_VERSION {
            // Missing sections were already filled in by serde defaults.
            log::info!(
                "Migrating config from schema v{} to v{}",
                config.schema_version,
                CURRENT_SCHEMA_VERSION
            );
            config.schema_version = CURRENT_SCHEMA_VERSION;
            if let Err(e) = config.save(path) {
                log::warn!("Could not write migrated config to {:?}: {}", path, e);
            }
        }

        Ok(config.validated())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Clamps values the calculator and directory cannot use.
    pub fn validated(mut self) -> Self {
        self.emissions = self.emissions.sanitized();
        if self.search.limit == 0 {
            log::warn!("search.limit must be at least 1; using 1");
            self.search.limit = 1;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emissions::{CARBON_PER_PANEL_KG, EARTH_RADIUS_KM};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = OffsetConfig::load(&dir.path().join("nope.json"));
        assert_eq!(config, OffsetConfig::default());
        assert_eq!(config.search.limit, 4);
        assert_eq!(config.emissions.earth_radius_km, EARTH_RADIUS_KM);
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = OffsetConfig::default();
        config.emissions.factors.business = 0.42;
        config.feed.airport_types = vec!["large_airport".to_string()];
        config.save(&path).unwrap();

        let loaded = OffsetConfig::load(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_and_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"schema_version": 1, "emissions": {"carbon_per_panel_kg": -5, "factors": {"first": 0.6}}, "search": {"limit": 0}}"#,
        )
        .unwrap();

        let config = OffsetConfig::load(&path);
        assert_eq!(config.emissions.carbon_per_panel_kg, CARBON_PER_PANEL_KG);
        assert_eq!(config.emissions.factors.first, 0.6);
        assert_eq!(config.emissions.factors.economy, 0.150);
        assert_eq!(config.search.limit, 1);
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_migration_bumps_version_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"schema_version": 0, "search": {"limit": 6}}"#).unwrap();

        let config = OffsetConfig::load(&path);
        assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.search.limit, 6);

        let on_disk: OffsetConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(on_disk.feed, FeedConfig::default());
    }

    #[test]
    fn test_unversioned_file_is_left_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let hand_written = r#"{"search": {"limit": 7}}"#;
        fs::write(&path, hand_written).unwrap();

        let config = OffsetConfig::load(&path);
        assert_eq!(config.schema_version, CURRENT_SCHEMA_VERSION);
        assert_eq!(config.search.limit, 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), hand_written);
    }

    #[test]
    fn test_invalid_json_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        assert!(OffsetConfig::try_load(&path).is_err());
        assert_eq!(OffsetConfig::load(&path), OffsetConfig::default());
        // The broken file is not overwritten.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn test_wrong_field_type_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"search": {"limit": "four"}}"#).unwrap();
        assert_eq!(OffsetConfig::load(&path), OffsetConfig::default());
    }

    #[test]
    fn test_unreadable_path_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        // A directory exists but cannot be read as a file.
        assert_eq!(OffsetConfig::load(dir.path()), OffsetConfig::default());
    }
}
