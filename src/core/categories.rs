//! Category definitions and the shared winner rule.
//!
//! Every comparison surface (pairwise pages, the N-way comparator) goes
//! through [`evaluate`], so a category is decided the same way whether the
//! set holds two offerings or four.

use crate::core::extract::{self, Attribute, NormalizationTables};
use crate::models::Offering;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherBetter,
    LowerBetter,
}

impl Direction {
    /// True when `a` is strictly better than `b`
    #[inline]
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            Direction::HigherBetter => a > b,
            Direction::LowerBetter => a < b,
        }
    }

    /// Ordering that puts the best value first
    #[inline]
    fn best_first(&self, a: f64, b: f64) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match self {
            Direction::HigherBetter => ord.reverse(),
            Direction::LowerBetter => ord,
        }
    }
}

pub type Extractor = fn(&Offering, &NormalizationTables) -> Attribute;

/// One comparison dimension
#[derive(Debug, Clone, Copy)]
pub struct CategoryDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub direction: Direction,
    pub description: Option<&'static str>,
    extractor: Extractor,
}

impl CategoryDefinition {
    pub fn new(
        id: &'static str,
        label: &'static str,
        direction: Direction,
        extractor: Extractor,
    ) -> Self {
        Self {
            id,
            label,
            direction,
            description: None,
            extractor,
        }
    }

    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn extract(&self, offering: &Offering, tables: &NormalizationTables) -> Attribute {
        (self.extractor)(offering, tables)
    }
}

/// Per-category outcome: a single winner or an explicit tie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "offeringId", rename_all = "snake_case")]
pub enum Outcome {
    Winner(String),
    Tie,
}

impl Outcome {
    pub fn winner(&self) -> Option<&str> {
        match self {
            Outcome::Winner(id) => Some(id.as_str()),
            Outcome::Tie => None,
        }
    }

    pub fn is_won_by(&self, offering_id: &str) -> bool {
        self.winner() == Some(offering_id)
    }
}

/// Display + comparable value of one offering in one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityValue {
    pub offering_id: String,
    pub display: String,
    pub value: f64,
}

/// One row of a comparison grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResult {
    pub category: String,
    pub label: String,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Values in the order the offerings were supplied
    pub values: Vec<EntityValue>,
    pub outcome: Outcome,
}

impl CategoryResult {
    pub fn value_of(&self, offering_id: &str) -> Option<&EntityValue> {
        self.values.iter().find(|v| v.offering_id == offering_id)
    }
}

/// Winner rule: sort best-first; the top entry wins only when strictly
/// better than the runner-up. Fewer than two values is never a contest.
pub fn decide_winner(direction: Direction, values: &[(&str, f64)]) -> Outcome {
    if values.len() < 2 {
        return Outcome::Tie;
    }

    let mut ranked: Vec<&(&str, f64)> = values.iter().collect();
    ranked.sort_by(|a, b| direction.best_first(a.1, b.1));

    if direction.is_better(ranked[0].1, ranked[1].1) {
        Outcome::Winner(ranked[0].0.to_string())
    } else {
        Outcome::Tie
    }
}

/// Extract every offering's value for `category` and decide the winner
pub fn evaluate(
    category: &CategoryDefinition,
    offerings: &[&Offering],
    tables: &NormalizationTables,
) -> CategoryResult {
    let values: Vec<EntityValue> = offerings
        .iter()
        .map(|o| {
            let attr = category.extract(o, tables);
            EntityValue {
                offering_id: o.id.clone(),
                display: attr.display,
                value: attr.value,
            }
        })
        .collect();

    let pairs: Vec<(&str, f64)> = values
        .iter()
        .map(|v| (v.offering_id.as_str(), v.value))
        .collect();
    let outcome = decide_winner(category.direction, &pairs);

    CategoryResult {
        category: category.id.to_string(),
        label: category.label.to_string(),
        direction: category.direction,
        description: category.description.map(str::to_string),
        values,
        outcome,
    }
}

/// Number of categories an offering won outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinCount {
    pub offering_id: String,
    pub wins: usize,
}

/// Count outright wins per offering; ties award nobody. Output follows the
/// order of `offering_ids` and always contains every id.
pub fn tally(rows: &[CategoryResult], offering_ids: &[&str]) -> Vec<WinCount> {
    offering_ids
        .iter()
        .map(|id| WinCount {
            offering_id: id.to_string(),
            wins: rows.iter().filter(|r| r.outcome.is_won_by(id)).count(),
        })
        .collect()
}

/// Ordered, immutable set of category definitions
#[derive(Debug, Clone)]
pub struct CategorySet {
    definitions: Vec<CategoryDefinition>,
}

impl CategorySet {
    pub fn new(definitions: Vec<CategoryDefinition>) -> Self {
        Self { definitions }
    }

    /// The fourteen categories shown on comparison pages
    pub fn standard() -> Self {
        use Direction::{HigherBetter, LowerBetter};

        Self::new(vec![
            CategoryDefinition::new("rating", "Trustpilot rating", HigherBetter, extract::rating),
            CategoryDefinition::new("reviews", "Review count", HigherBetter, extract::reviews),
            CategoryDefinition::new(
                "years_active",
                "Years active",
                HigherBetter,
                extract::years_active,
            ),
            CategoryDefinition::new(
                "profit_split",
                "Max profit split",
                HigherBetter,
                extract::profit_split,
            )
            .with_description("Share of profits paid to the trader at the top tier"),
            CategoryDefinition::new("price", "Cheapest challenge", LowerBetter, extract::price)
                .with_description("Lowest entry fee, compared in EUR"),
            CategoryDefinition::new(
                "max_account",
                "Largest account",
                HigherBetter,
                extract::max_account,
            )
            .with_description("Largest funded account on offer, compared in EUR"),
            CategoryDefinition::new("phases", "Evaluation phases", LowerBetter, extract::phases),
            CategoryDefinition::new(
                "profit_target",
                "Phase 1 profit target",
                LowerBetter,
                extract::profit_target,
            ),
            CategoryDefinition::new(
                "daily_loss",
                "Max daily loss",
                HigherBetter,
                extract::daily_loss,
            )
            .with_description("Room before the daily loss limit is breached"),
            CategoryDefinition::new(
                "max_drawdown",
                "Max total drawdown",
                HigherBetter,
                extract::max_drawdown,
            ),
            CategoryDefinition::new("min_days", "Min trading days", LowerBetter, extract::min_days),
            CategoryDefinition::new(
                "payout_speed",
                "Payout frequency",
                LowerBetter,
                extract::payout_speed,
            ),
            CategoryDefinition::new("platforms", "Platforms", HigherBetter, extract::platforms),
            CategoryDefinition::new("scaling", "Scaling plan", HigherBetter, extract::scaling)
                .with_description("Maximum account size reachable through scaling"),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&CategoryDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a CategoryDefinition;
    type IntoIter = std::slice::Iter<'a, CategoryDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
