use crate::core::catalog::Catalog;
use crate::core::categories::{self, CategoryResult, CategorySet, Outcome};
use crate::core::comparator::{self, ComparatorSession, NwayOutcome};
use crate::core::extract::{Attribute, NormalizationTables};
use crate::core::narrative::{self, FaqEntry, Names};
use crate::core::quiz::{self, Answers, QuizBank, QuizResult};
use crate::core::verdict::{self, CategoryTable, VerdictWeights, WeightedScore};
use crate::models::Offering;
use serde::{Deserialize, Serialize};

/// "Best for" line of one offering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestFor {
    pub offering_id: String,
    pub description: String,
}

/// Weighted verdict plus the prose rendered from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseVerdict {
    pub outcome: Outcome,
    pub scores: Vec<WeightedScore>,
    pub best_for: Vec<BestFor>,
    pub summary: String,
}

/// Everything a pairwise comparison page needs
///
/// `table` and `verdict` are computed independently and may name different
/// winners; `verdict_agrees_with_table` says whether they do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseComparison {
    pub offering_ids: [String; 2],
    pub table: CategoryTable,
    pub verdict: PairwiseVerdict,
    pub verdict_agrees_with_table: bool,
    pub explanations: Vec<String>,
    pub faq: Vec<FaqEntry>,
    pub conclusion: String,
}

/// Holds the injected scoring configuration and runs every computation
///
/// Cheap to clone and safe to share: nothing in here changes after
/// construction.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    categories: CategorySet,
    tables: NormalizationTables,
    weights: VerdictWeights,
}

impl ScoringEngine {
    pub fn new(
        categories: CategorySet,
        tables: NormalizationTables,
        weights: VerdictWeights,
    ) -> Self {
        Self {
            categories,
            tables,
            weights,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(
            CategorySet::standard(),
            NormalizationTables::default(),
            VerdictWeights::default(),
        )
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn tables(&self) -> &NormalizationTables {
        &self.tables
    }

    pub fn weights(&self) -> &VerdictWeights {
        &self.weights
    }

    /// Display string and comparable value of one offering in one category
    pub fn extract(&self, offering: &Offering, category_id: &str) -> Option<Attribute> {
        self.categories
            .get(category_id)
            .map(|c| c.extract(offering, &self.tables))
    }

    /// Decide a single category over any number of offerings
    pub fn compare_category(
        &self,
        category_id: &str,
        offerings: &[&Offering],
    ) -> Option<CategoryResult> {
        self.categories
            .get(category_id)
            .map(|c| categories::evaluate(c, offerings, &self.tables))
    }

    pub fn category_table(&self, a: &Offering, b: &Offering) -> CategoryTable {
        verdict::category_table(&self.categories, a, b, &self.tables)
    }

    /// Full pairwise comparison: table, weighted verdict and narrative
    pub fn compare_pair(&self, a: &Offering, b: &Offering) -> PairwiseComparison {
        let table = self.category_table(a, b);
        let weighted = verdict::weighted_verdict(a, b, &self.tables, &self.weights);
        let verdict_agrees_with_table = table.leader() == weighted.outcome;

        let offerings = [a, b];
        let names = Names::new(&offerings);

        let best_for = offerings
            .iter()
            .map(|o| BestFor {
                offering_id: o.id.clone(),
                description: narrative::best_for(&o.id, &table.rows),
            })
            .collect();
        let summary = narrative::quick_verdict(&weighted, &names);
        let explanations = table
            .rows
            .iter()
            .map(|row| narrative::category_explanation(row, &names))
            .collect();
        let faq = narrative::faq(&table, &weighted, &names);
        let conclusion = narrative::conclusion(&table, &weighted, &names);

        PairwiseComparison {
            offering_ids: [a.id.clone(), b.id.clone()],
            verdict: PairwiseVerdict {
                outcome: weighted.outcome,
                scores: weighted.scores,
                best_for,
                summary,
            },
            table,
            verdict_agrees_with_table,
            explanations,
            faq,
            conclusion,
        }
    }

    /// N-way comparison over an explicit offering list
    pub fn compare_many(&self, catalog: &Catalog, offerings: &[&Offering]) -> NwayOutcome {
        comparator::compare_set(&self.categories, &self.tables, catalog, offerings)
    }

    /// N-way comparison of a comparator session's current slots
    pub fn evaluate_session(&self, session: &ComparatorSession, catalog: &Catalog) -> NwayOutcome {
        session.evaluate(&self.categories, &self.tables, catalog)
    }

    /// Headline text for an N-way outcome, `None` when nothing was computed
    pub fn nway_summary(&self, outcome: &NwayOutcome, catalog: &Catalog) -> Option<String> {
        let result = outcome.result()?;
        let offerings: Vec<&Offering> = result
            .offering_ids
            .iter()
            .filter_map(|id| catalog.get(id))
            .collect();
        Some(narrative::nway_summary(result, &Names::new(&offerings)))
    }

    pub fn score_quiz(&self, bank: &QuizBank, catalog: &Catalog, answers: &Answers) -> QuizResult {
        quiz::score_answers(bank, catalog, answers)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
