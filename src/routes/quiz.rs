use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use crate::core::{narrative, Answers, QuizState};
use crate::models::{
    QuizAction, QuizBankResponse, QuizResultResponse, QuizScoreRequest, QuizTransitionRequest,
    QuizTransitionResponse,
};
use crate::routes::compare::{error_response, AppState};

/// Configure quiz routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/quiz", web::get().to(get_questions))
        .route("/quiz/transition", web::post().to(transition))
        .route("/quiz/score", web::post().to(score));
}

fn result_response(state: &AppState, answers: &Answers) -> QuizResultResponse {
    let result = state.engine.score_quiz(&state.quiz, &state.catalog, answers);
    let summary = narrative::quiz_summary(&result);
    QuizResultResponse { result, summary }
}

/// GET /api/v1/quiz
async fn get_questions(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(QuizBankResponse {
        questions: state.quiz.questions().to_vec(),
    })
}

/// Apply a quiz navigation action
///
/// POST /api/v1/quiz/transition
///
/// Request body:
/// ```json
/// {
///   "state": { "state": "in_progress", "questionIndex": 0, "answers": {} },
///   "action": { "type": "choose", "optionId": "under_100" }
/// }
/// ```
async fn transition(
    state: web::Data<AppState>,
    req: web::Json<QuizTransitionRequest>,
) -> impl Responder {
    let QuizTransitionRequest { state: current, action } = req.into_inner();

    let next = match action {
        QuizAction::Choose { option_id } => match current.choose(&state.quiz, &option_id) {
            Ok(next) => next,
            Err(e) => {
                tracing::info!("Rejected quiz answer: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Invalid answer", e.to_string());
            }
        },
        QuizAction::Back => current.back(&state.quiz),
        QuizAction::Restart => current.restart(),
    };

    let (question, result) = match &next {
        QuizState::InProgress { question_index, .. } => {
            (state.quiz.question(*question_index).cloned(), None)
        }
        QuizState::Completed { answers } => (None, Some(result_response(&state, answers))),
    };

    HttpResponse::Ok().json(QuizTransitionResponse {
        state: next,
        question,
        result,
    })
}

/// Score answers directly
///
/// POST /api/v1/quiz/score
///
/// Request body:
/// ```json
/// { "answers": { "budget": "under_100", "style": "swing" } }
/// ```
async fn score(state: web::Data<AppState>, req: web::Json<QuizScoreRequest>) -> impl Responder {
    let stale = req
        .answers
        .keys()
        .filter(|q| !state.quiz.questions().iter().any(|question| &question.id == *q))
        .count();
    if stale > 0 {
        tracing::warn!("Ignoring {} answers for unknown questions", stale);
    }

    let response = result_response(&state, &req.answers);
    tracing::debug!("Quiz scored: {}", response.summary);

    HttpResponse::Ok().json(response)
}
