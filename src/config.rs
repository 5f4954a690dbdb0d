use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::geo::DEFAULT_CENTER;
use crate::i18n::Locale;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// CSV, Parquet or SQLite file holding the listings.
    pub dataset_path: PathBuf,
    /// Persisted price model.
    pub model_path: PathBuf,
    /// City center used for neighborhood placement.
    pub center: (f64, f64),
    pub locale: Locale,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("houses.db"),
            model_path: PathBuf::from("house_price_model.json"),
            center: DEFAULT_CENTER,
            locale: Locale::En,
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let dataset_path = env::var("HOUSES_DATASET")
            .map(PathBuf::from)
            .unwrap_or(defaults.dataset_path);
        let model_path = env::var("HOUSES_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.model_path);

        let lat: f64 = parse_var("HOUSES_CENTER_LAT", defaults.center.0)?;
        let lon: f64 = parse_var("HOUSES_CENTER_LON", defaults.center.1)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            anyhow::bail!("City center ({lat}, {lon}) is not a valid coordinate");
        }

        let locale: Locale = parse_var("HOUSES_LOCALE", defaults.locale)?;

        Ok(Self {
            dataset_path,
            model_path,
            center: (lat, lon),
            locale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-wide, so every env-dependent check
    // lives in this one test.
    #[test]
    fn from_env_reads_overrides_and_rejects_garbage() {
        env::set_var("HOUSES_DATASET", "data/ames.csv");
        env::set_var("HOUSES_CENTER_LAT", "41.5");
        env::set_var("HOUSES_LOCALE", "ru");
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.dataset_path, PathBuf::from("data/ames.csv"));
        assert_eq!(cfg.center, (41.5, DEFAULT_CENTER.1));
        assert_eq!(cfg.locale, Locale::Ru);
        assert_eq!(cfg.model_path, AppConfig::default().model_path);

        env::set_var("HOUSES_CENTER_LAT", "north");
        assert!(AppConfig::from_env().is_err());

        env::set_var("HOUSES_CENTER_LAT", "123.0");
        assert!(AppConfig::from_env().is_err());

        env::remove_var("HOUSES_CENTER_LAT");
        env::set_var("HOUSES_LOCALE", "klingon");
        assert!(AppConfig::from_env().is_err());

        env::remove_var("HOUSES_DATASET");
        env::remove_var("HOUSES_LOCALE");
    }
}
