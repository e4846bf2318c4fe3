//! Integration tests for radio-api endpoints
//!
//! Tests cover:
//! - Root and health endpoints
//! - Episode listing with and without program filter
//! - Date filter (year, month, program)
//! - Title search and its boundary validation
//! - Startup with a missing program source

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use radio_api::{build_router, AppState};
use radio_common::catalog::CatalogLoader;
use radio_common::{Catalog, CatalogBuilder, Episode};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: fixture catalog built in memory
fn fixture_catalog() -> Catalog {
    CatalogBuilder::new()
        .program(
            "6x3",
            vec![
                Episode::new("6x3", "1", "Beethoven y el piano", "https://radio/6x3/1", 2010, 10),
                Episode::new("6x3", "2", "Jazz de verano", "https://radio/6x3/2", 2010, 7),
                Episode::new("6x3", "3", "Schubert", "https://radio/6x3/3", 2011, 10),
            ],
        )
        .program(
            "Discopolis",
            vec![
                Episode::new("Discopolis", "D-1", "Rock de los 80", "https://radio/d/1", 2010, 10),
                Episode::new("Discopolis", "D-2", "", "https://radio/d/2", 2010, 10),
            ],
        )
        .program(
            "Música y Significado",
            vec![Episode::new(
                "Música y Significado",
                "15b",
                "La novena de BEETHOVEN",
                "https://radio/mys/15b",
                2010,
                10,
            )],
        )
        .build()
}

/// Test helper: Create app over the fixture catalog
fn setup_app() -> axum::Router {
    build_router(AppState::new(fixture_catalog()))
}

/// Test helper: Create GET request
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: send request and return status plus JSON body
async fn send(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(get(uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

/// Test helper: JSON array of episodes
fn episodes(body: &Value) -> &Vec<Value> {
    body.as_array().expect("Should be a JSON array")
}

// =============================================================================
// Root and Health
// =============================================================================

#[tokio::test]
async fn test_root_lists_programs() {
    let (status, body) = send(setup_app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert_eq!(
        body["programs"],
        serde_json::json!(["6x3", "Discopolis", "Música y Significado"])
    );
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(setup_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "radio-api");
    assert!(body["version"].is_string());
    assert_eq!(body["programs"], 3);
    assert_eq!(body["episodes"], 6);
}

#[tokio::test]
async fn test_unrouted_paths_are_not_found() {
    for uri in ["/api/buildinfo", "/programas/fecha"] {
        let response = setup_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_list_all_episodes() {
    let (status, body) = send(setup_app(), "/programas/").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 6);

    // Verify flat record shape
    let first = shows[0].as_object().unwrap();
    for field in ["program", "episodeNumber", "title", "url", "year", "month"] {
        assert!(first.contains_key(field), "missing field {}", field);
    }
    assert_eq!(first.len(), 6);
}

#[tokio::test]
async fn test_list_without_trailing_slash() {
    let (status, body) = send(setup_app(), "/programas").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(episodes(&body).len(), 6);
}

#[tokio::test]
async fn test_list_by_program() {
    let (status, body) = send(setup_app(), "/programas/?programa=6x3").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 3);
    assert!(shows.iter().all(|s| s["program"] == "6x3"));
}

#[tokio::test]
async fn test_list_by_program_with_encoded_name() {
    let (status, body) =
        send(setup_app(), "/programas/?programa=M%C3%BAsica%20y%20Significado").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0]["episodeNumber"], "15b");
}

#[tokio::test]
async fn test_list_unknown_program_is_empty() {
    let (status, body) = send(setup_app(), "/programas/?programa=Programa%20Inexistente").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_list_blank_program_means_all() {
    let (status, body) = send(setup_app(), "/programas/?programa=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(episodes(&body).len(), 6);
}

// =============================================================================
// Date Filter
// =============================================================================

#[tokio::test]
async fn test_date_filter_year_only() {
    let (status, body) = send(setup_app(), "/programas/fecha/2010").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 5);
    assert!(shows.iter().all(|s| s["year"] == 2010));
}

#[tokio::test]
async fn test_date_filter_year_and_month() {
    let (status, body) = send(setup_app(), "/programas/fecha/2010?mes=10").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 4);
    assert!(shows.iter().all(|s| s["year"] == 2010 && s["month"] == 10));
}

#[tokio::test]
async fn test_date_filter_year_month_and_program() {
    let (status, body) =
        send(setup_app(), "/programas/fecha/2010?mes=10&programa=Discopolis").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 2);
    assert!(shows
        .iter()
        .all(|s| s["year"] == 2010 && s["month"] == 10 && s["program"] == "Discopolis"));
}

#[tokio::test]
async fn test_date_filter_with_trailing_slash() {
    let (status, body) = send(setup_app(), "/programas/fecha/2010/?mes=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(episodes(&body).len(), 4);
}

#[tokio::test]
async fn test_date_filter_without_data_is_empty() {
    let (status, body) = send(setup_app(), "/programas/fecha/1900?mes=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_date_filter_unknown_program_is_empty() {
    let (status, body) =
        send(setup_app(), "/programas/fecha/2010?mes=1&programa=Programa%20Inexistente").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_date_filter_invalid_year() {
    let (status, body) = send(setup_app(), "/programas/fecha/dosmil").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Invalid path parameter"));
}

#[tokio::test]
async fn test_date_filter_invalid_month() {
    let (status, body) = send(setup_app(), "/programas/fecha/2010?mes=octubre").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("Invalid query parameter"));
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_by_title() {
    let (status, body) = send(setup_app(), "/programas/buscar/?q=Beethoven").await;

    assert_eq!(status, StatusCode::OK);
    let shows = episodes(&body);
    assert_eq!(shows.len(), 2);
    assert!(shows
        .iter()
        .all(|s| s["title"].as_str().unwrap().to_lowercase().contains("beethoven")));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let (_, lower) = send(setup_app(), "/programas/buscar/?q=beethoven").await;
    let (_, upper) = send(setup_app(), "/programas/buscar/?q=BEETHOVEN").await;

    assert_eq!(lower, upper);
}

#[tokio::test]
async fn test_search_without_trailing_slash() {
    let (status, body) = send(setup_app(), "/programas/buscar?q=jazz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(episodes(&body).len(), 1);
}

#[tokio::test]
async fn test_search_min_length_validation() {
    let (status, body) = send(setup_app(), "/programas/buscar/?q=ab").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("too short"));
}

#[tokio::test]
async fn test_search_exactly_min_length_accepted() {
    let (status, body) = send(setup_app(), "/programas/buscar/?q=roc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(episodes(&body).len(), 1);
}

#[tokio::test]
async fn test_search_missing_term() {
    let (status, body) = send(setup_app(), "/programas/buscar/").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("q"));
}

#[tokio::test]
async fn test_search_no_match_is_empty() {
    let (status, body) = send(setup_app(), "/programas/buscar/?q=zarzuela").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

// =============================================================================
// Startup with a missing source
// =============================================================================

#[tokio::test]
async fn test_missing_source_still_serves_other_programs() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("6x3_all.csv"),
        "Episodio n;Titulo;URL;Año;Mes\n1;Bach;https://radio/6x3/1;2010;10\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Musica_y_significado_all.csv"),
        "Episodio n;Titulo;URL;Año;Mes\n2;Mahler;https://radio/mys/2;2012;5\n",
    )
    .unwrap();

    let (catalog, _) = CatalogLoader::new(dir.path()).load();
    let app = build_router(AppState::new(catalog));

    let (status, body) = send(app.clone(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["programs"], serde_json::json!(["6x3", "Música y Significado"]));

    let (status, body) = send(app.clone(), "/programas/?programa=Discopolis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));

    let (_, body) = send(app, "/programas/").await;
    assert_eq!(episodes(&body).len(), 2);
}
