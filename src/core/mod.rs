// Core algorithm exports
pub mod catalog;
pub mod categories;
pub mod comparator;
pub mod engine;
pub mod extract;
pub mod narrative;
pub mod pairs;
pub mod quiz;
pub mod verdict;

pub use catalog::{Catalog, CatalogError};
pub use categories::{CategoryDefinition, CategoryResult, CategorySet, Direction, Outcome, WinCount};
pub use comparator::{ComparatorSession, NwayOutcome, NwayResult, SelectionError};
pub use engine::{PairwiseComparison, PairwiseVerdict, ScoringEngine};
pub use extract::{Attribute, NormalizationTables, PayoutRanks};
pub use pairs::{ComparisonPair, PairError, PairLookup, PairRegistry};
pub use quiz::{Answers, QuizBank, QuizError, QuizResult, QuizState};
pub use verdict::{CategoryTable, VerdictWeights};
