use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when resolving a pairwise comparison request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairError {
    #[error("Unknown offering: {0}")]
    UnknownEntity(String),

    #[error("No comparison registered for {0} vs {1}")]
    InvalidComparisonPair(String, String),

    #[error("Malformed comparison route: {0}")]
    MalformedRoute(String),
}

/// Two offering slugs in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComparisonPair {
    pub first: String,
    pub second: String,
}

impl ComparisonPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Route slug, e.g. "ftmo-vs-the5ers"
    pub fn route(&self) -> String {
        format!("{}-vs-{}", self.first, self.second)
    }

    fn matches_either_way(&self, a: &str, b: &str) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// Result of looking a requested pair up in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairLookup {
    /// Requested in canonical order
    Canonical(ComparisonPair),
    /// Requested reversed; callers should redirect to the contained pair
    NonCanonical(ComparisonPair),
}

impl PairLookup {
    pub fn pair(&self) -> &ComparisonPair {
        match self {
            PairLookup::Canonical(p) | PairLookup::NonCanonical(p) => p,
        }
    }

    pub fn into_pair(self) -> ComparisonPair {
        match self {
            PairLookup::Canonical(p) | PairLookup::NonCanonical(p) => p,
        }
    }

    pub fn is_canonical(&self) -> bool {
        matches!(self, PairLookup::Canonical(_))
    }
}

/// Static registry of editorial comparisons. The registered order of each
/// pair is its canonical order.
#[derive(Debug, Clone, Default)]
pub struct PairRegistry {
    pairs: Vec<ComparisonPair>,
}

impl PairRegistry {
    /// Build from already validated pairs; `Catalog::pair_registry` runs the
    /// load-time checks.
    pub fn new(pairs: Vec<ComparisonPair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[ComparisonPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn resolve(&self, a: &str, b: &str) -> Result<PairLookup, PairError> {
        let pair = self
            .pairs
            .iter()
            .find(|p| p.matches_either_way(a, b))
            .ok_or_else(|| PairError::InvalidComparisonPair(a.to_string(), b.to_string()))?;

        if pair.first == a {
            Ok(PairLookup::Canonical(pair.clone()))
        } else {
            Ok(PairLookup::NonCanonical(pair.clone()))
        }
    }

    /// Canonical form of a pair regardless of the order it was given in
    pub fn canonicalize(&self, a: &str, b: &str) -> Result<ComparisonPair, PairError> {
        self.resolve(a, b).map(PairLookup::into_pair)
    }

    /// Every registered pair that involves `slug`
    pub fn pairs_for<'a>(&'a self, slug: &'a str) -> impl Iterator<Item = &'a ComparisonPair> + 'a {
        self.pairs
            .iter()
            .filter(move |p| p.first == slug || p.second == slug)
    }
}

/// Split a "{a}-vs-{b}" route slug
pub fn parse_route(route: &str) -> Result<(String, String), PairError> {
    match route.split_once("-vs-") {
        Some((a, b)) if !a.is_empty() && !b.is_empty() && !b.contains("-vs-") => {
            Ok((a.to_string(), b.to_string()))
        }
        _ => Err(PairError::MalformedRoute(route.to_string())),
    }
}
