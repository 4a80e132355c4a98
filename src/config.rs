use crate::core::{CategorySet, NormalizationTables, PayoutRanks, ScoringEngine, VerdictWeights};
use crate::core::extract::DEFAULT_USD_TO_EUR;
use chrono::Datelike;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Locations of the static data files
#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default = "default_pairs_path")]
    pub pairs_path: String,
    #[serde(default = "default_quiz_path")]
    pub quiz_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            pairs_path: default_pairs_path(),
            quiz_path: default_quiz_path(),
        }
    }
}

fn default_catalog_path() -> String { "data/catalog.json".to_string() }
fn default_pairs_path() -> String { "data/pairs.json".to_string() }
fn default_quiz_path() -> String { "data/quiz.toml".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_usd_to_eur")]
    pub usd_to_eur: f64,
    /// Year used for "years active"; defaults to the current UTC year
    pub reference_year: Option<u16>,
    /// Replaces the built-in payout frequency ranks when set
    pub payout_ranks: Option<HashMap<String, u32>>,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            usd_to_eur: default_usd_to_eur(),
            reference_year: None,
            payout_ranks: None,
            weights: WeightsConfig::default(),
        }
    }
}

fn default_usd_to_eur() -> f64 { DEFAULT_USD_TO_EUR }

impl ScoringSettings {
    pub fn tables(&self) -> NormalizationTables {
        let payout_ranks = match &self.payout_ranks {
            Some(ranks) => PayoutRanks::new(ranks.iter().map(|(k, v)| (k.as_str(), *v))),
            None => PayoutRanks::default(),
        };
        let reference_year = self
            .reference_year
            .unwrap_or_else(|| chrono::Utc::now().year() as u16);

        NormalizationTables::new(self.usd_to_eur, payout_ranks, reference_year)
    }

    /// Build the engine with the standard categories and configured tables
    pub fn engine(&self) -> ScoringEngine {
        ScoringEngine::new(CategorySet::standard(), self.tables(), self.weights.into())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_point")]
    pub rating: f64,
    #[serde(default = "default_point")]
    pub profit_split: f64,
    #[serde(default = "default_point")]
    pub price: f64,
    #[serde(default = "default_reliability")]
    pub years_active: f64,
    #[serde(default = "default_reliability")]
    pub reviews: f64,
    #[serde(default = "default_point")]
    pub partner_bonus: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_point(),
            profit_split: default_point(),
            price: default_point(),
            years_active: default_reliability(),
            reviews: default_reliability(),
            partner_bonus: default_point(),
        }
    }
}

fn default_point() -> f64 { 1.0 }
fn default_reliability() -> f64 { 1.5 }

impl From<WeightsConfig> for VerdictWeights {
    fn from(w: WeightsConfig) -> Self {
        Self {
            rating: w.rating,
            profit_split: w.profit_split,
            price: w.price,
            years_active: w.years_active,
            reviews: w.reviews,
            partner_bonus: w.partner_bonus,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 { 1000 }
fn default_cache_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PROPMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PROPMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PROPMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PROPMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_weights() {
        let weights: VerdictWeights = WeightsConfig::default().into();
        assert_eq!(weights, VerdictWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_scoring_overrides() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                r#"
                [server]
                host = "127.0.0.1"
                port = 8080

                [scoring]
                usd_to_eur = 0.9
                reference_year = 2024

                [scoring.payout_ranks]
                weekly = 1
                monthly = 2
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        let tables = settings.scoring.tables();
        assert_eq!(tables.usd_to_eur, 0.9);
        assert_eq!(tables.reference_year, 2024);
        assert_eq!(tables.payout_ranks.rank("weekly"), 1);
        assert_eq!(tables.payout_ranks.rank("daily"), PayoutRanks::WORST);
        assert_eq!(settings.data.catalog_path, "data/catalog.json");
        assert_eq!(settings.cache.capacity, 1000);
    }
}
