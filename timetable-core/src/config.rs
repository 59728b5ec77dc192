//! Runtime configuration for the command-line tool.

use std::path::PathBuf;
use std::time::Duration;

use crate::store::CacheConfig;

/// Where timetable data lives when no path is configured.
pub const DEFAULT_STORE_PATH: &str = "timetable.json";

pub const STORE_PATH_VAR: &str = "TIMETABLE_STORE_PATH";
pub const HOLIDAYS_PATH_VAR: &str = "TIMETABLE_HOLIDAYS_PATH";
pub const CACHE_CAPACITY_VAR: &str = "TIMETABLE_CACHE_CAPACITY";
pub const CACHE_TTL_VAR: &str = "TIMETABLE_CACHE_TTL_SECS";

/// Errors reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A numeric setting could not be parsed
    #[error("{var} must be a non-negative integer, got {value:?}")]
    NotANumber { var: &'static str, value: String },
}

/// Configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding the key-value store.
    pub store_path: PathBuf,

    /// JSON array of `YYYY-MM-DD` public holidays, if any.
    pub holidays_path: Option<PathBuf>,

    /// Read cache in front of the store.
    pub cache: CacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            holidays_path: None,
            cache: CacheConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(STORE_PATH_VAR).filter(|p| !p.is_empty()) {
            config.store_path = PathBuf::from(path);
        }
        config.holidays_path = lookup(HOLIDAYS_PATH_VAR)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        if let Some(value) = lookup(CACHE_CAPACITY_VAR) {
            config.cache.max_capacity = parse_number(CACHE_CAPACITY_VAR, value)?;
        }
        if let Some(value) = lookup(CACHE_TTL_VAR) {
            config.cache.ttl = Duration::from_secs(parse_number(CACHE_TTL_VAR, value)?);
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotANumber { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store_path, PathBuf::from("timetable.json"));
        assert_eq!(config.holidays_path, None);
        assert_eq!(config.cache.max_capacity, 4096);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("TIMETABLE_STORE_PATH", "/data/tt.json"),
            ("TIMETABLE_HOLIDAYS_PATH", "/data/holidays.json"),
            ("TIMETABLE_CACHE_CAPACITY", "128"),
            ("TIMETABLE_CACHE_TTL_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from("/data/tt.json"));
        assert_eq!(
            config.holidays_path,
            Some(PathBuf::from("/data/holidays.json"))
        );
        assert_eq!(config.cache.max_capacity, 128);
        assert_eq!(config.cache.ttl, Duration::from_secs(5));
    }

    #[test]
    fn empty_paths_are_unset() {
        let config = Config::from_lookup(lookup(&[
            ("TIMETABLE_STORE_PATH", ""),
            ("TIMETABLE_HOLIDAYS_PATH", ""),
        ]))
        .unwrap();
        assert_eq!(config.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.holidays_path, None);
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = Config::from_lookup(lookup(&[("TIMETABLE_CACHE_CAPACITY", "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotANumber {
                var: "TIMETABLE_CACHE_CAPACITY",
                value: "lots".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "TIMETABLE_CACHE_CAPACITY must be a non-negative integer, got \"lots\""
        );
    }
}
