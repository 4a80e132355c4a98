use crate::core::{ComparisonPair, NwayOutcome, PairwiseComparison, QuizResult, QuizState};
use crate::models::domain::{OfferingSummary, QuizQuestion};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub offerings: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Pairwise comparison page payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairwiseResponse {
    pub pair: ComparisonPair,
    pub route: String,
    pub offerings: [OfferingSummary; 2],
    pub comparison: PairwiseComparison,
}

/// N-way comparator payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NwayResponse {
    /// Slots after duplicate filtering
    pub slots: Vec<Option<String>>,
    pub outcome: NwayOutcome,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizBankResponse {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTransitionResponse {
    pub state: QuizState,
    /// Current question, absent once completed
    pub question: Option<QuizQuestion>,
    /// Filled in when the transition completed the quiz
    pub result: Option<QuizResultResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultResponse {
    #[serde(flatten)]
    pub result: QuizResult,
    pub summary: String,
}
