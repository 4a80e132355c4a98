use crate::core::categories::{
    self, decide_winner, CategoryResult, CategorySet, Direction, Outcome, WinCount,
};
use crate::core::extract::{self, Attribute, NormalizationTables};
use crate::models::Offering;
use serde::{Deserialize, Serialize};

/// Points awarded by the overall verdict
///
/// Each factor goes to the offering that is strictly better on it; the
/// partner bonus goes to every verified partner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerdictWeights {
    pub rating: f64,
    pub profit_split: f64,
    pub price: f64,
    pub years_active: f64,
    pub reviews: f64,
    pub partner_bonus: f64,
}

impl Default for VerdictWeights {
    fn default() -> Self {
        Self {
            rating: 1.0,
            profit_split: 1.0,
            price: 1.0,
            years_active: 1.5,
            reviews: 1.5,
            partner_bonus: 1.0,
        }
    }
}

/// Unweighted category grid for two offerings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTable {
    pub rows: Vec<CategoryResult>,
    pub wins: Vec<WinCount>,
    pub ties: usize,
}

impl CategoryTable {
    /// Offering with more category wins, or a tie on equal counts
    pub fn leader(&self) -> Outcome {
        match self.wins.as_slice() {
            [a, b] if a.wins > b.wins => Outcome::Winner(a.offering_id.clone()),
            [a, b] if b.wins > a.wins => Outcome::Winner(b.offering_id.clone()),
            _ => Outcome::Tie,
        }
    }

    pub fn wins_of(&self, offering_id: &str) -> usize {
        self.wins
            .iter()
            .find(|w| w.offering_id == offering_id)
            .map(|w| w.wins)
            .unwrap_or(0)
    }

    pub fn row(&self, category: &str) -> Option<&CategoryResult> {
        self.rows.iter().find(|r| r.category == category)
    }
}

/// Weighted total of one offering and the factors that fed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedScore {
    pub offering_id: String,
    pub score: f64,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedOutcome {
    pub outcome: Outcome,
    pub scores: Vec<WeightedScore>,
}

impl WeightedOutcome {
    pub fn score_of(&self, offering_id: &str) -> f64 {
        self.scores
            .iter()
            .find(|s| s.offering_id == offering_id)
            .map(|s| s.score)
            .unwrap_or(0.0)
    }
}

/// Run every category over the pair and tally one point per outright win
pub fn category_table(
    set: &CategorySet,
    a: &Offering,
    b: &Offering,
    tables: &NormalizationTables,
) -> CategoryTable {
    let pair = [a, b];
    let rows: Vec<CategoryResult> = set
        .iter()
        .map(|category| categories::evaluate(category, &pair, tables))
        .collect();
    let wins = categories::tally(&rows, &[a.id.as_str(), b.id.as_str()]);
    let ties = rows.iter().filter(|r| r.outcome == Outcome::Tie).count();

    CategoryTable { rows, wins, ties }
}

/// Reliability-biased overall verdict
///
/// Independent of the category set in use: the five factors are always read
/// through the standard extractors so the verdict means the same thing on
/// every page.
pub fn weighted_verdict(
    a: &Offering,
    b: &Offering,
    tables: &NormalizationTables,
    weights: &VerdictWeights,
) -> WeightedOutcome {
    type Factor = (&'static str, fn(&Offering, &NormalizationTables) -> Attribute, Direction, f64);

    let factors: [Factor; 5] = [
        ("rating", extract::rating, Direction::HigherBetter, weights.rating),
        ("profit_split", extract::profit_split, Direction::HigherBetter, weights.profit_split),
        ("price", extract::price, Direction::LowerBetter, weights.price),
        ("years_active", extract::years_active, Direction::HigherBetter, weights.years_active),
        ("reviews", extract::reviews, Direction::HigherBetter, weights.reviews),
    ];

    let mut scores = [
        WeightedScore {
            offering_id: a.id.clone(),
            score: 0.0,
            factors: Vec::new(),
        },
        WeightedScore {
            offering_id: b.id.clone(),
            score: 0.0,
            factors: Vec::new(),
        },
    ];

    for (name, extractor, direction, weight) in factors {
        let values = [
            (a.id.as_str(), extractor(a, tables).value),
            (b.id.as_str(), extractor(b, tables).value),
        ];
        if let Some(winner) = decide_winner(direction, &values).winner() {
            let idx = if winner == a.id { 0 } else { 1 };
            scores[idx].score += weight;
            scores[idx].factors.push(name.to_string());
        }
    }

    for (idx, offering) in [a, b].into_iter().enumerate() {
        if offering.is_partner {
            scores[idx].score += weights.partner_bonus;
            scores[idx].factors.push("partner".to_string());
        }
    }

    let outcome = if scores[0].score > scores[1].score {
        Outcome::Winner(a.id.clone())
    } else if scores[1].score > scores[0].score {
        Outcome::Winner(b.id.clone())
    } else {
        Outcome::Tie
    };

    WeightedOutcome {
        outcome,
        scores: scores.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extract::PayoutRanks;
    use crate::models::Currency;
    use std::collections::BTreeMap;

    fn offering(id: &str) -> Offering {
        Offering {
            id: id.to_string(),
            slug: id.to_string(),
            name: id.to_uppercase(),
            rating: 4.5,
            review_count: 1000,
            profit_split_max: 80.0,
            challenge_prices: BTreeMap::from([(10_000, 100.0)]),
            account_sizes: vec![10_000],
            challenge_phases: 2,
            profit_target: vec![10.0, 5.0],
            max_daily_loss: Some(5.0),
            max_total_drawdown: 10.0,
            time_limit: None,
            min_trading_days: 4,
            payout_frequency: "biweekly".to_string(),
            platforms: vec!["MT5".to_string()],
            instruments: vec![],
            founded_year: 2020,
            max_scaling: None,
            is_partner: false,
            currency: Currency::Eur,
        }
    }

    fn tables() -> NormalizationTables {
        NormalizationTables::new(0.92, PayoutRanks::default(), 2025)
    }

    #[test]
    fn test_identical_offerings_tie_everywhere() {
        let a = offering("a");
        let b = offering("b");
        let table = category_table(&CategorySet::standard(), &a, &b, &tables());

        assert_eq!(table.ties, table.rows.len());
        assert_eq!(table.leader(), Outcome::Tie);

        let verdict = weighted_verdict(&a, &b, &tables(), &VerdictWeights::default());
        assert_eq!(verdict.outcome, Outcome::Tie);
    }

    #[test]
    fn test_partner_bonus_breaks_tie() {
        let a = offering("a");
        let mut b = offering("b");
        b.is_partner = true;

        let verdict = weighted_verdict(&a, &b, &tables(), &VerdictWeights::default());
        assert_eq!(verdict.outcome, Outcome::Winner("b".to_string()));
        assert_eq!(verdict.score_of("b"), 1.0);
        assert_eq!(verdict.scores[1].factors, vec!["partner"]);
    }

    #[test]
    fn test_reliability_weights_outweigh_single_points() {
        // a: older and more reviewed (3.0); b: better split, rating and price (3.0)
        let mut a = offering("a");
        a.founded_year = 2015;
        a.review_count = 50_000;
        let mut b = offering("b");
        b.profit_split_max = 90.0;
        b.rating = 4.9;
        b.challenge_prices = BTreeMap::from([(10_000, 80.0)]);

        let verdict = weighted_verdict(&a, &b, &tables(), &VerdictWeights::default());
        assert_eq!(verdict.score_of("a"), 3.0);
        assert_eq!(verdict.score_of("b"), 3.0);
        assert_eq!(verdict.outcome, Outcome::Tie);

        a.is_partner = true;
        let verdict = weighted_verdict(&a, &b, &tables(), &VerdictWeights::default());
        assert_eq!(verdict.outcome, Outcome::Winner("a".to_string()));
    }

    #[test]
    fn test_table_wins_are_symmetric() {
        let mut a = offering("a");
        a.rating = 4.9;
        let b = offering("b");

        let ab = category_table(&CategorySet::standard(), &a, &b, &tables());
        let ba = category_table(&CategorySet::standard(), &b, &a, &tables());

        assert_eq!(ab.wins_of("a"), ba.wins_of("a"));
        assert_eq!(ab.wins_of("b"), ba.wins_of("b"));
        assert_eq!(ab.row("rating").unwrap().outcome, Outcome::Winner("a".to_string()));
        assert_eq!(ba.row("rating").unwrap().outcome, Outcome::Winner("a".to_string()));
    }
}
