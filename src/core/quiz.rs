use crate::core::catalog::{Catalog, CatalogError};
use crate::models::QuizQuestion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Highest contribution a single option can give one offering
pub const MAX_POINTS_PER_QUESTION: u32 = 5;

/// question id -> chosen option id
pub type Answers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Question {question_id} has no option {option_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    #[error("Quiz is already completed")]
    AlreadyCompleted,

    #[error("Quiz has no questions")]
    EmptyBank,

    #[error("Question index {index} is out of range for a {len}-question quiz")]
    QuestionOutOfRange { index: usize, len: usize },
}

/// Ordered, validated question bank
#[derive(Debug, Clone, Default)]
pub struct QuizBank {
    questions: Vec<QuizQuestion>,
}

impl QuizBank {
    pub fn new(questions: Vec<QuizQuestion>, catalog: &Catalog) -> Result<Self, CatalogError> {
        catalog.validate_questions(&questions)?;
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn max_score(&self) -> u32 {
        self.questions.len() as u32 * MAX_POINTS_PER_QUESTION
    }
}

/// Quiz navigation state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuizState {
    InProgress {
        #[serde(rename = "questionIndex")]
        question_index: usize,
        #[serde(default)]
        answers: Answers,
    },
    Completed {
        #[serde(default)]
        answers: Answers,
    },
}

impl Default for QuizState {
    fn default() -> Self {
        Self::start()
    }
}

impl QuizState {
    pub fn start() -> Self {
        QuizState::InProgress {
            question_index: 0,
            answers: Answers::new(),
        }
    }

    pub fn answers(&self) -> &Answers {
        match self {
            QuizState::InProgress { answers, .. } | QuizState::Completed { answers } => answers,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, QuizState::Completed { .. })
    }

    /// Record an answer for the current question and move on
    pub fn choose(self, bank: &QuizBank, option_id: &str) -> Result<Self, QuizError> {
        let (question_index, mut answers) = match self {
            QuizState::InProgress {
                question_index,
                answers,
            } => (question_index, answers),
            QuizState::Completed { .. } => return Err(QuizError::AlreadyCompleted),
        };

        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let question = bank
            .question(question_index)
            .ok_or(QuizError::QuestionOutOfRange {
                index: question_index,
                len: bank.len(),
            })?;
        if question.option(option_id).is_none() {
            return Err(QuizError::UnknownOption {
                question_id: question.id.clone(),
                option_id: option_id.to_string(),
            });
        }

        answers.insert(question.id.clone(), option_id.to_string());

        if question_index + 1 >= bank.len() {
            Ok(QuizState::Completed { answers })
        } else {
            Ok(QuizState::InProgress {
                question_index: question_index + 1,
                answers,
            })
        }
    }

    /// Step back one question. Recorded answers are kept so the previous
    /// choice can be shown as selected.
    pub fn back(self, bank: &QuizBank) -> Self {
        match self {
            QuizState::InProgress {
                question_index,
                answers,
            } => QuizState::InProgress {
                question_index: question_index.saturating_sub(1),
                answers,
            },
            QuizState::Completed { answers } => QuizState::InProgress {
                question_index: bank.len().saturating_sub(1),
                answers,
            },
        }
    }

    pub fn restart(self) -> Self {
        Self::start()
    }
}

/// One ranked offering in a quiz result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMatch {
    pub offering_id: String,
    pub name: String,
    pub score: u32,
    pub percentage: u8,
}

/// The option a user picked, for the result page recap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSummary {
    pub question_id: String,
    pub prompt: String,
    pub option_id: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// Every catalog offering, best match first
    pub matches: Vec<QuizMatch>,
    pub answers: Vec<AnswerSummary>,
    pub max_score: u32,
}

impl QuizResult {
    pub fn top(&self) -> Option<&QuizMatch> {
        self.matches.first()
    }
}

/// round(score / max * 100), clamped to 0-100. An empty bank scores 0.
pub fn match_percentage(score: u32, question_count: usize) -> u8 {
    let max = question_count as u32 * MAX_POINTS_PER_QUESTION;
    if max == 0 {
        return 0;
    }
    let pct = (score as f64 / max as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Score every catalog offering against the recorded answers
///
/// Answers for questions or options that are not in the bank are skipped.
/// Ties keep catalog order.
pub fn score_answers(bank: &QuizBank, catalog: &Catalog, answers: &Answers) -> QuizResult {
    let mut totals: Vec<u32> = vec![0; catalog.len()];
    let mut summary = Vec::with_capacity(answers.len());

    for question in bank.questions() {
        let Some(option) = answers
            .get(&question.id)
            .and_then(|option_id| question.option(option_id))
        else {
            continue;
        };

        for (idx, offering) in catalog.iter().enumerate() {
            totals[idx] += option.contribution(&offering.id) as u32;
        }

        summary.push(AnswerSummary {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            option_id: option.id.clone(),
            answer: option.label.clone(),
        });
    }

    let mut matches: Vec<QuizMatch> = catalog
        .iter()
        .zip(totals)
        .map(|(offering, score)| QuizMatch {
            offering_id: offering.id.clone(),
            name: offering.name.clone(),
            score,
            percentage: match_percentage(score, bank.len()),
        })
        .collect();

    // Stable: equal scores stay in catalog order
    matches.sort_by(|a, b| b.score.cmp(&a.score));

    QuizResult {
        matches,
        answers: summary,
        max_score: bank.max_score(),
    }
}
