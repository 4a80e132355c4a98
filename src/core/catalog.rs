use crate::core::pairs::{ComparisonPair, PairRegistry};
use crate::models::{Offering, OfferingSummary, QuizQuestion};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Hard preconditions on the static data. Any of these is a configuration
/// error and must stop the process at load time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Offering {0} has no challenge prices")]
    EmptyPriceMap(String),

    #[error("Duplicate offering id: {0}")]
    DuplicateId(String),

    #[error("Duplicate offering slug: {0}")]
    DuplicateSlug(String),

    #[error("Offering {id} has rating {rating} outside 0-5")]
    RatingOutOfRange { id: String, rating: f64 },

    #[error("Offering {id} has a non-finite or negative {field}")]
    InvalidNumber { id: String, field: &'static str },

    #[error("Offering {id} lists {targets} profit targets for {phases} phases")]
    PhaseTargetMismatch { id: String, phases: u8, targets: usize },

    #[error("Comparison pair references unknown slug: {0}")]
    UnknownPairSlug(String),

    #[error("Comparison pair compares {0} with itself")]
    SelfPair(String),

    #[error("Comparison pair registered twice: {0} vs {1}")]
    DuplicatePair(String, String),

    #[error("Quiz question {0} has no options")]
    EmptyQuestion(String),

    #[error("Duplicate quiz question id: {0}")]
    DuplicateQuestion(String),

    #[error("Quiz question {question_id} has duplicate option {option_id}")]
    DuplicateQuizOption { question_id: String, option_id: String },

    #[error("Quiz option {option_id} scores unknown offering {offering_id}")]
    UnknownQuizEntity { option_id: String, offering_id: String },

    #[error("Quiz option {option_id} gives {offering_id} {score} points (max 5)")]
    ContributionOutOfRange {
        option_id: String,
        offering_id: String,
        score: u8,
    },
}

/// Immutable, ordered catalog snapshot
///
/// Catalog order (the order offerings were loaded in) is the tie-break order
/// for every ranking in the crate.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    offerings: Vec<Offering>,
    by_id: HashMap<String, usize>,
    by_slug: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(offerings: Vec<Offering>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(offerings.len());
        let mut by_slug = HashMap::with_capacity(offerings.len());

        for (idx, offering) in offerings.iter().enumerate() {
            validate_offering(offering)?;

            if by_id.insert(offering.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(offering.id.clone()));
            }
            if by_slug.insert(offering.slug.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateSlug(offering.slug.clone()));
            }
        }

        Ok(Self {
            offerings,
            by_id,
            by_slug,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Offering> {
        self.by_id.get(id).map(|&idx| &self.offerings[idx])
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Offering> {
        self.by_slug.get(slug).map(|&idx| &self.offerings[idx])
    }

    /// Position in catalog order
    pub fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn offerings(&self) -> &[Offering] {
        &self.offerings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Offering> {
        self.offerings.iter()
    }

    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }

    pub fn summaries(&self) -> Vec<OfferingSummary> {
        self.offerings.iter().map(OfferingSummary::from).collect()
    }

    /// Check a pair list against this catalog and build the registry
    pub fn pair_registry(&self, pairs: Vec<ComparisonPair>) -> Result<PairRegistry, CatalogError> {
        let mut seen: HashSet<(String, String)> = HashSet::with_capacity(pairs.len());

        for pair in &pairs {
            for slug in [&pair.first, &pair.second] {
                if self.by_slug(slug).is_none() {
                    return Err(CatalogError::UnknownPairSlug(slug.clone()));
                }
            }
            if pair.first == pair.second {
                return Err(CatalogError::SelfPair(pair.first.clone()));
            }

            let key = if pair.first < pair.second {
                (pair.first.clone(), pair.second.clone())
            } else {
                (pair.second.clone(), pair.first.clone())
            };
            if !seen.insert(key) {
                return Err(CatalogError::DuplicatePair(pair.first.clone(), pair.second.clone()));
            }
        }

        Ok(PairRegistry::new(pairs))
    }

    /// Check quiz questions reference only offerings in this catalog
    pub fn validate_questions(&self, questions: &[QuizQuestion]) -> Result<(), CatalogError> {
        let mut question_ids = HashSet::with_capacity(questions.len());

        for question in questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(CatalogError::EmptyQuestion(question.id.clone()));
            }

            let mut option_ids = HashSet::with_capacity(question.options.len());
            for option in &question.options {
                if !option_ids.insert(option.id.as_str()) {
                    return Err(CatalogError::DuplicateQuizOption {
                        question_id: question.id.clone(),
                        option_id: option.id.clone(),
                    });
                }

                for (offering_id, &score) in &option.scores {
                    if self.get(offering_id).is_none() {
                        return Err(CatalogError::UnknownQuizEntity {
                            option_id: option.id.clone(),
                            offering_id: offering_id.clone(),
                        });
                    }
                    if score > 5 {
                        return Err(CatalogError::ContributionOutOfRange {
                            option_id: option.id.clone(),
                            offering_id: offering_id.clone(),
                            score,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

fn validate_offering(offering: &Offering) -> Result<(), CatalogError> {
    let id = &offering.id;

    if offering.challenge_prices.is_empty() {
        return Err(CatalogError::EmptyPriceMap(id.clone()));
    }

    if !(0.0..=5.0).contains(&offering.rating) {
        return Err(CatalogError::RatingOutOfRange {
            id: id.clone(),
            rating: offering.rating,
        });
    }

    let invalid = |value: f64| !value.is_finite() || value < 0.0;
    let checks: [(&'static str, bool); 6] = [
        ("profitSplitMax", invalid(offering.profit_split_max)),
        ("challengePrices", offering.challenge_prices.values().any(|p| invalid(*p))),
        ("profitTarget", offering.profit_target.iter().any(|t| invalid(*t))),
        ("maxDailyLoss", offering.max_daily_loss.is_some_and(invalid)),
        ("maxTotalDrawdown", invalid(offering.max_total_drawdown)),
        ("maxScaling", offering.max_scaling.is_some_and(invalid)),
    ];
    if let Some((field, _)) = checks.iter().find(|(_, bad)| *bad) {
        return Err(CatalogError::InvalidNumber {
            id: id.clone(),
            field: *field,
        });
    }

    if offering.profit_target.len() != offering.challenge_phases as usize {
        return Err(CatalogError::PhaseTargetMismatch {
            id: id.clone(),
            phases: offering.challenge_phases,
            targets: offering.profit_target.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, QuizOption};
    use std::collections::BTreeMap;

    fn offering(id: &str) -> Offering {
        Offering {
            id: id.to_string(),
            slug: format!("{}-slug", id),
            name: id.to_string(),
            rating: 4.0,
            review_count: 10,
            profit_split_max: 80.0,
            challenge_prices: BTreeMap::from([(25_000, 150.0)]),
            account_sizes: vec![25_000],
            challenge_phases: 1,
            profit_target: vec![8.0],
            max_daily_loss: None,
            max_total_drawdown: 6.0,
            time_limit: None,
            min_trading_days: 0,
            payout_frequency: "weekly".to_string(),
            platforms: vec![],
            instruments: vec![],
            founded_year: 2021,
            max_scaling: None,
            is_partner: false,
            currency: Currency::Usd,
        }
    }

    #[test]
    fn test_catalog_preserves_order() {
        let catalog = Catalog::new(vec![offering("b"), offering("a")]).unwrap();
        assert_eq!(catalog.position("b"), Some(0));
        assert_eq!(catalog.position("a"), Some(1));
        assert_eq!(catalog.by_slug("a-slug").map(|o| o.id.as_str()), Some("a"));
    }

    #[test]
    fn test_empty_price_map_rejected() {
        let mut bad = offering("a");
        bad.challenge_prices.clear();
        assert_eq!(
            Catalog::new(vec![bad]).unwrap_err(),
            CatalogError::EmptyPriceMap("a".to_string())
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(vec![offering("a"), offering("a")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_phase_target_mismatch_rejected() {
        let mut bad = offering("a");
        bad.challenge_phases = 2;
        assert!(matches!(
            Catalog::new(vec![bad]),
            Err(CatalogError::PhaseTargetMismatch { phases: 2, targets: 1, .. })
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let mut bad = offering("a");
        bad.max_scaling = Some(f64::NAN);
        assert!(matches!(
            Catalog::new(vec![bad]),
            Err(CatalogError::InvalidNumber { field: "maxScaling", .. })
        ));
    }

    #[test]
    fn test_pair_registry_validation() {
        let catalog = Catalog::new(vec![offering("a"), offering("b")]).unwrap();

        assert!(catalog
            .pair_registry(vec![ComparisonPair::new("a-slug", "b-slug")])
            .is_ok());
        assert_eq!(
            catalog
                .pair_registry(vec![ComparisonPair::new("a-slug", "zzz")])
                .unwrap_err(),
            CatalogError::UnknownPairSlug("zzz".to_string())
        );
        assert!(matches!(
            catalog.pair_registry(vec![
                ComparisonPair::new("a-slug", "b-slug"),
                ComparisonPair::new("b-slug", "a-slug"),
            ]),
            Err(CatalogError::DuplicatePair(_, _))
        ));
        assert!(matches!(
            catalog.pair_registry(vec![ComparisonPair::new("a-slug", "a-slug")]),
            Err(CatalogError::SelfPair(_))
        ));
    }

    #[test]
    fn test_quiz_contribution_range() {
        let catalog = Catalog::new(vec![offering("a")]).unwrap();
        let question = QuizQuestion {
            id: "q1".to_string(),
            prompt: "?".to_string(),
            options: vec![QuizOption {
                id: "o1".to_string(),
                label: "x".to_string(),
                scores: [("a".to_string(), 6)].into_iter().collect(),
            }],
        };
        assert!(matches!(
            catalog.validate_questions(&[question]),
            Err(CatalogError::ContributionOutOfRange { score: 6, .. })
        ));
    }
}
