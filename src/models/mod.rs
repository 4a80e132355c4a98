// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Currency, Offering, OfferingSummary, QuizOption, QuizQuestion};
pub use requests::{NwayCompareRequest, QuizAction, QuizScoreRequest, QuizTransitionRequest};
pub use responses::{
    ErrorResponse, HealthResponse, NwayResponse, PairwiseResponse, QuizBankResponse,
    QuizResultResponse, QuizTransitionResponse,
};
