use crate::config::DataSettings;
use crate::core::{Catalog, CatalogError, ComparisonPair, PairRegistry, QuizBank};
use crate::models::{Offering, QuizQuestion};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading static data
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid data: {0}")]
    Invalid(#[from] CatalogError),
}

/// Everything loaded once at startup and shared read-only afterwards
#[derive(Debug, Clone)]
pub struct StaticData {
    pub catalog: Catalog,
    pub pairs: PairRegistry,
    pub quiz: QuizBank,
}

#[derive(Debug, Deserialize)]
struct QuizFile {
    #[serde(default)]
    questions: Vec<QuizQuestion>,
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse and validate a JSON array of offerings
pub fn parse_catalog(json: &str) -> Result<Catalog, LoadError> {
    let offerings: Vec<Offering> = serde_json::from_str(json)?;
    Ok(Catalog::new(offerings)?)
}

/// Parse a JSON array of `{ "first", "second" }` pairs and check them
/// against the catalog
pub fn parse_pairs(json: &str, catalog: &Catalog) -> Result<PairRegistry, LoadError> {
    let pairs: Vec<ComparisonPair> = serde_json::from_str(json)?;
    Ok(catalog.pair_registry(pairs)?)
}

/// Parse a TOML question bank (`[[questions]]` tables)
pub fn parse_quiz(toml_str: &str, catalog: &Catalog) -> Result<QuizBank, LoadError> {
    let file: QuizFile = toml::from_str(toml_str)?;
    Ok(QuizBank::new(file.questions, catalog)?)
}

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, LoadError> {
    let catalog = parse_catalog(&read(path.as_ref())?)?;
    tracing::info!("Loaded {} offerings from {}", catalog.len(), path.as_ref().display());
    Ok(catalog)
}

pub fn load_pairs<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<PairRegistry, LoadError> {
    let pairs = parse_pairs(&read(path.as_ref())?, catalog)?;
    tracing::info!("Loaded {} comparison pairs from {}", pairs.len(), path.as_ref().display());
    Ok(pairs)
}

pub fn load_quiz<P: AsRef<Path>>(path: P, catalog: &Catalog) -> Result<QuizBank, LoadError> {
    let quiz = parse_quiz(&read(path.as_ref())?, catalog)?;
    tracing::info!("Loaded {} quiz questions from {}", quiz.len(), path.as_ref().display());
    Ok(quiz)
}

/// Load catalog, pair registry and quiz bank. The catalog goes first since
/// the other two are validated against it.
pub fn load_all(settings: &DataSettings) -> Result<StaticData, LoadError> {
    let catalog = load_catalog(&settings.catalog_path)?;
    let pairs = load_pairs(&settings.pairs_path, &catalog)?;
    let quiz = load_quiz(&settings.quiz_path, &catalog)?;

    Ok(StaticData {
        catalog,
        pairs,
        quiz,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {
            "id": "alpha", "slug": "alpha", "name": "Alpha",
            "rating": 4.6, "reviewCount": 1200, "profitSplitMax": 90,
            "challengePrices": { "10000": 89, "50000": 299 },
            "accountSizes": [10000, 50000],
            "challengePhases": 2, "profitTarget": [8, 5],
            "maxDailyLoss": 5, "maxTotalDrawdown": 10,
            "minTradingDays": 4, "payoutFrequency": "biweekly",
            "platforms": ["MT5"], "foundedYear": 2019,
            "isPartner": true, "currency": "EUR"
        },
        {
            "id": "beta", "slug": "beta", "name": "Beta",
            "rating": 4.2, "reviewCount": 300, "profitSplitMax": 80,
            "challengePrices": { "25000": 150 },
            "accountSizes": [25000],
            "challengePhases": 1, "profitTarget": [10],
            "maxTotalDrawdown": 6, "timeLimit": "30 days",
            "minTradingDays": 0, "payoutFrequency": "weekly",
            "foundedYear": 2022, "maxScaling": 400000, "currency": "USD"
        }
    ]"#;

    #[test]
    fn test_parse_catalog_with_optional_fields() {
        let catalog = parse_catalog(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let beta = catalog.get("beta").unwrap();
        assert_eq!(beta.max_daily_loss, None);
        assert_eq!(beta.max_scaling, Some(400000.0));
        assert!(!beta.is_partner);
        assert!(beta.platforms.is_empty());
        assert_eq!(catalog.get("alpha").unwrap().challenge_prices.get(&10000), Some(&89.0));
    }

    #[test]
    fn test_parse_pairs() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let pairs = parse_pairs(r#"[{ "first": "alpha", "second": "beta" }]"#, &catalog).unwrap();
        assert_eq!(pairs.len(), 1);

        let err =
            parse_pairs(r#"[{ "first": "alpha", "second": "gamma" }]"#, &catalog).unwrap_err();
        assert!(matches!(err, LoadError::Invalid(CatalogError::UnknownPairSlug(_))));
    }

    #[test]
    fn test_parse_quiz() {
        let catalog = parse_catalog(CATALOG).unwrap();
        let quiz = parse_quiz(
            r#"
            [[questions]]
            id = "budget"
            prompt = "What is your budget?"

            [[questions.options]]
            id = "low"
            label = "Under 100"
            scores = { alpha = 5, beta = 2 }

            [[questions.options]]
            id = "high"
            label = "Over 100"
            scores = { beta = 4 }
            "#,
            &catalog,
        )
        .unwrap();

        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.questions()[0].options[1].contribution("alpha"), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog("does/not/exist.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
