// Integration tests for PropFirm Match

use actix_web::{http::StatusCode, test, web, App};
use propfirm_match::config::DataSettings;
use propfirm_match::core::{Answers, Outcome, PairLookup, QuizState};
use propfirm_match::routes::{self, AppState};
use propfirm_match::services::{self, StaticData, VerdictCache};
use propfirm_match::ScoringEngine;
use serde_json::{json, Value};

fn static_data() -> StaticData {
    services::load_all(&DataSettings::default()).expect("bundled data should load")
}

fn app_state() -> AppState {
    AppState::new(static_data(), ScoringEngine::with_defaults(), VerdictCache::new(100, 60))
}

#[::core::prelude::v1::test]
fn test_integration_bundled_data_is_consistent() {
    let data = static_data();

    assert_eq!(data.catalog.len(), 5);
    assert_eq!(data.pairs.len(), 6);
    assert_eq!(data.quiz.len(), 6);
    assert_eq!(data.quiz.max_score(), 30);

    for pair in data.pairs.pairs() {
        assert!(data.catalog.by_slug(&pair.first).is_some());
        assert!(data.catalog.by_slug(&pair.second).is_some());
    }
}

#[::core::prelude::v1::test]
fn test_integration_every_registered_pair() {
    let data = static_data();
    let engine = ScoringEngine::with_defaults();

    for pair in data.pairs.pairs() {
        let a = data.catalog.by_slug(&pair.first).unwrap();
        let b = data.catalog.by_slug(&pair.second).unwrap();

        let forward = engine.compare_pair(a, b);
        let reverse = engine.compare_pair(b, a);

        assert_eq!(forward.table.rows.len(), engine.categories().len());
        assert_eq!(forward.verdict.outcome, reverse.verdict.outcome);
        assert_eq!(forward.table.leader(), reverse.table.leader());
        assert_eq!(
            forward.table.wins_of(&a.id) + forward.table.wins_of(&b.id) + forward.table.ties,
            forward.table.rows.len()
        );
        assert!(!forward.conclusion.is_empty());
        assert_eq!(forward.explanations.len(), forward.table.rows.len());
    }
}

#[::core::prelude::v1::test]
fn test_integration_reversed_route_is_non_canonical() {
    let data = static_data();

    match data.pairs.resolve("fundednext", "ftmo").unwrap() {
        PairLookup::NonCanonical(pair) => assert_eq!(pair.route(), "ftmo-vs-fundednext"),
        PairLookup::Canonical(_) => panic!("reversed pair should not be canonical"),
    }
    assert!(data.pairs.resolve("ftmo", "alpha-capital").is_err());
}

#[::core::prelude::v1::test]
fn test_integration_quiz_walkthrough() {
    let data = static_data();
    let engine = ScoringEngine::with_defaults();

    let mut state = QuizState::start();
    for option in ["under_100", "two", "max_split", "biweekly", "mt5", "established"] {
        state = state.choose(&data.quiz, option).unwrap();
    }
    assert!(state.is_completed());

    let result = engine.score_quiz(&data.quiz, &data.catalog, state.answers());
    assert_eq!(result.answers.len(), 6);
    assert_eq!(result.top().map(|m| m.offering_id.as_str()), Some("the5ers"));
    assert_eq!(result.top().map(|m| m.percentage), Some(100));
    for pair in result.matches.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[::core::prelude::v1::test]
fn test_integration_quiz_ignores_stale_answers() {
    let data = static_data();
    let engine = ScoringEngine::with_defaults();

    let answers = Answers::from([
        ("phases".to_string(), "one".to_string()),
        ("retired_question".to_string(), "whatever".to_string()),
    ]);
    let result = engine.score_quiz(&data.quiz, &data.catalog, &answers);

    assert_eq!(result.answers.len(), 1);
    assert_eq!(result.top().map(|m| m.offering_id.as_str()), Some("fxify"));
}

#[actix_web::test]
async fn test_api_health() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["offerings"], 5);
}

#[actix_web::test]
async fn test_api_pairwise_comparison() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/compare/ftmo-vs-fundednext")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["route"], "ftmo-vs-fundednext");
    assert_eq!(body["comparison"]["offeringIds"], json!(["ftmo", "fundednext"]));
    assert!(body["comparison"]["table"]["rows"].as_array().unwrap().len() >= 13);
    assert!(body["comparison"]["verdict"]["summary"].is_string());
}

#[actix_web::test]
async fn test_api_reversed_pair_redirects() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/compare/fundednext-vs-ftmo")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(
        resp.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/api/v1/compare/ftmo-vs-fundednext")
    );
}

#[actix_web::test]
async fn test_api_unknown_pairs_are_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    for uri in [
        "/api/v1/compare/ftmo-vs-nosuchfirm",
        "/api/v1/compare/ftmo-vs-alpha-capital",
        "/api/v1/compare/ftmo",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_api_nway_compare() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/compare")
        .set_json(json!({ "slots": ["ftmo", "the5ers", "fxify"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["outcome"]["status"], "ranked");
    assert_eq!(body["outcome"]["winCounts"].as_array().unwrap().len(), 3);
    assert!(body["summary"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/v1/compare")
        .set_json(json!({ "slots": ["ftmo", null] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["outcome"]["status"], "insufficient_selection");
    assert!(body["summary"].is_null());
}

#[actix_web::test]
async fn test_api_nway_rejects_bad_slot_counts() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/compare")
        .set_json(json!({ "slots": ["ftmo", "the5ers", "fxify", "fundednext", "alpha-capital"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_api_quiz_transition() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/quiz/transition")
        .set_json(json!({ "action": { "type": "choose", "optionId": "under_100" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["state"]["state"], "in_progress");
    assert_eq!(body["state"]["questionIndex"], 1);
    assert_eq!(body["question"]["id"], "phases");

    let req = test::TestRequest::post()
        .uri("/api/v1/quiz/transition")
        .set_json(json!({ "action": { "type": "choose", "optionId": "not_an_option" } }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_api_quiz_transition_rejects_stale_index() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/quiz/transition")
        .set_json(json!({
            "state": { "state": "in_progress", "questionIndex": 42, "answers": {} },
            "action": { "type": "choose", "optionId": "under_100" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("out of range"));
}

#[actix_web::test]
async fn test_api_quiz_score() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state()))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/quiz/score")
        .set_json(json!({ "answers": { "phases": "one" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["matches"][0]["offeringId"], "fxify");
    assert!(body["summary"].is_string());
}

#[::core::prelude::v1::test]
fn test_integration_verdict_table_divergence_flag() {
    let data = static_data();
    let engine = ScoringEngine::with_defaults();
    let a = data.catalog.get("ftmo").unwrap();
    let b = data.catalog.get("fundednext").unwrap();

    let comparison = engine.compare_pair(a, b);
    let agrees = comparison.table.leader() == comparison.verdict.outcome;
    assert_eq!(comparison.verdict_agrees_with_table, agrees);
    assert!(matches!(comparison.verdict.outcome, Outcome::Winner(_) | Outcome::Tie));
}
