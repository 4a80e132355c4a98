use crate::core::{Answers, QuizState};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to compare 2-4 offerings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NwayCompareRequest {
    /// Offering ids per slot; `null` for an empty slot
    #[validate(length(min = 2, max = 4))]
    pub slots: Vec<Option<String>>,
}

/// Request to score a set of quiz answers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizScoreRequest {
    #[serde(default)]
    pub answers: Answers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizAction {
    Choose {
        #[serde(rename = "optionId")]
        option_id: String,
    },
    Back,
    Restart,
}

/// Apply one navigation action to a client-held quiz state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizTransitionRequest {
    #[serde(default)]
    pub state: QuizState,
    pub action: QuizAction,
}
