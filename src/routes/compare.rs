use actix_web::{http::header, http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{
    pairs::parse_route, Catalog, ComparatorSession, PairError, PairLookup, PairRegistry, QuizBank,
    ScoringEngine, SelectionError,
};
use crate::models::{
    ErrorResponse, HealthResponse, NwayCompareRequest, NwayResponse, OfferingSummary,
    PairwiseResponse,
};
use crate::services::{StaticData, VerdictCache};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub pairs: Arc<PairRegistry>,
    pub quiz: Arc<QuizBank>,
    pub engine: Arc<ScoringEngine>,
    pub cache: VerdictCache,
}

impl AppState {
    pub fn new(data: StaticData, engine: ScoringEngine, cache: VerdictCache) -> Self {
        Self {
            catalog: Arc::new(data.catalog),
            pairs: Arc::new(data.pairs),
            quiz: Arc::new(data.quiz),
            engine: Arc::new(engine),
            cache,
        }
    }
}

/// Configure health, catalog and comparison routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/offerings", web::get().to(list_offerings))
        .route("/compare/pairs", web::get().to(list_pairs))
        .route("/compare/{pair}", web::get().to(compare_pair))
        .route("/compare", web::post().to(compare_many));
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn not_found(err: PairError) -> HttpResponse {
    error_response(StatusCode::NOT_FOUND, "Not found", err.to_string())
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        offerings: state.catalog.len(),
        timestamp: chrono::Utc::now(),
    })
}

/// Catalog listing in catalog order
///
/// GET /api/v1/offerings
async fn list_offerings(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.catalog.summaries())
}

/// Registered editorial comparisons
///
/// GET /api/v1/compare/pairs
async fn list_pairs(state: web::Data<AppState>) -> impl Responder {
    let routes: Vec<serde_json::Value> = state
        .pairs
        .pairs()
        .iter()
        .map(|p| serde_json::json!({ "first": p.first, "second": p.second, "route": p.route() }))
        .collect();
    HttpResponse::Ok().json(routes)
}

/// Pairwise comparison page
///
/// GET /api/v1/compare/{a}-vs-{b}
///
/// Reversed pairs answer with a permanent redirect to the canonical route;
/// unknown offerings and unregistered pairs are 404s.
async fn compare_pair(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let route = path.into_inner();

    let (a, b) = match parse_route(&route) {
        Ok(slugs) => slugs,
        Err(e) => return not_found(e),
    };
    for slug in [&a, &b] {
        if state.catalog.by_slug(slug).is_none() {
            return not_found(PairError::UnknownEntity(slug.clone()));
        }
    }

    let pair = match state.pairs.resolve(&a, &b) {
        Ok(PairLookup::Canonical(pair)) => pair,
        Ok(PairLookup::NonCanonical(pair)) => {
            tracing::debug!("Redirecting {} to canonical {}", route, pair.route());
            return HttpResponse::PermanentRedirect()
                .insert_header((header::LOCATION, format!("/api/v1/compare/{}", pair.route())))
                .finish();
        }
        Err(e) => {
            tracing::debug!("Rejected comparison {}: {}", route, e);
            return not_found(e);
        }
    };

    let (Some(first), Some(second)) = (
        state.catalog.by_slug(&pair.first),
        state.catalog.by_slug(&pair.second),
    ) else {
        return not_found(PairError::InvalidComparisonPair(pair.first, pair.second));
    };

    let comparison = state
        .cache
        .get_or_compute(&pair, || state.engine.compare_pair(first, second))
        .await;

    tracing::info!(
        "Compared {}: verdict {:?}, table {:?}",
        pair.route(),
        comparison.verdict.outcome,
        comparison.table.leader()
    );

    HttpResponse::Ok().json(PairwiseResponse {
        route: pair.route(),
        offerings: [OfferingSummary::from(first), OfferingSummary::from(second)],
        comparison: (*comparison).clone(),
        pair,
    })
}

/// Interactive comparator
///
/// POST /api/v1/compare
///
/// Request body:
/// ```json
/// { "slots": ["ftmo", "the5ers", null] }
/// ```
async fn compare_many(
    state: web::Data<AppState>,
    req: web::Json<NwayCompareRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for compare request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let session = match ComparatorSession::from_slots(&req.slots, &state.catalog) {
        Ok(session) => session,
        Err(e @ SelectionError::UnknownEntity(_)) => {
            return error_response(StatusCode::NOT_FOUND, "Not found", e.to_string())
        }
        Err(e @ SelectionError::SlotCount(_)) => {
            return error_response(StatusCode::BAD_REQUEST, "Validation failed", e.to_string())
        }
    };

    let outcome = state.engine.evaluate_session(&session, &state.catalog);
    let summary = state.engine.nway_summary(&outcome, &state.catalog);

    tracing::debug!("Compared {:?}: {:?}", session.selected_ids(), summary);

    HttpResponse::Ok().json(NwayResponse {
        slots: session.slots().to_vec(),
        outcome,
        summary,
    })
}
