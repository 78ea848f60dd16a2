//! Integration tests for survey-api endpoints
//!
//! Tests cover:
//! - Survey upload: 201 with a new id, stored row contents and defaults
//! - Rejections: malformed bodies, missing fields, invalid email, storage failure
//! - Response shape and content type
//! - Health endpoint

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use sqlx::Row;
use survey_api::{build_router, AppState};
use survey_common::db::{Datastore, SqliteDatastore};
use survey_common::SurveyRecord;
use tower::util::ServiceExt; // for `oneshot` method

const BODY_LIMIT: usize = 64 * 1024;

/// Test helper: fresh in-memory datastore
async fn setup_store() -> SqliteDatastore {
    SqliteDatastore::in_memory()
        .await
        .expect("Should create in-memory datastore")
}

/// Test helper: Create app over the given datastore
fn setup_app(datastore: Arc<dyn Datastore>) -> axum::Router {
    build_router(AppState::new(datastore, BODY_LIMIT))
}

/// Datastore that always fails, standing in for a lost connection
struct UnavailableDatastore;

#[async_trait]
impl Datastore for UnavailableDatastore {
    async fn insert_survey_record(&self, _record: &SurveyRecord) -> survey_common::Result<i64> {
        Err(survey_common::Error::Database(sqlx::Error::PoolTimedOut))
    }
}

fn upload_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload_results")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn upload_json(value: &Value) -> Request<Body> {
    upload_request(serde_json::to_vec(value).unwrap())
}

/// Test helper: Extract JSON body from response
async fn extract_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn acme_survey() -> Value {
    json!({
        "Organization": "Acme",
        "Contact_Person": "Jane",
        "Contact_Person_role": "CTO",
        "Email": "jane@acme.com",
        "Industry": "Tech",
        "Date": "2024-03-01",
        "Maturity_Stage": "Defined",
        "Overall_Score": 72.5
    })
}

// =============================================================================
// Accepted submissions
// =============================================================================

#[tokio::test]
async fn test_upload_creates_row() {
    let store = setup_store().await;
    let app = setup_app(Arc::new(store.clone()));

    let response = app.oneshot(upload_json(&acme_survey())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );

    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["message"], "Inserted successfully");
    let survey_id = body["survey_id"].as_i64().expect("survey_id should be an integer");
    assert!(survey_id > 0);

    let row = sqlx::query("SELECT * FROM survey_results WHERE id = ?")
        .bind(survey_id)
        .fetch_one(store.pool())
        .await
        .unwrap();

    assert_eq!(row.get::<String, _>("Organization"), "Acme");
    assert_eq!(row.get::<String, _>("Email"), "jane@acme.com");
    assert_eq!(
        row.get::<NaiveDate, _>("Date"),
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    );
    assert_eq!(row.get::<f64, _>("Overall_Score"), 72.5);
    // omitted scores and recommendations take their defaults
    for column in ["Strategy", "Data", "Technology", "People", "Governance"] {
        assert_eq!(row.get::<f64, _>(column), 0.0, "{} should default to 0", column);
    }
    assert_eq!(row.get::<String, _>("Recommendations"), "");
}

#[tokio::test]
async fn test_successive_uploads_get_distinct_ids() {
    let store = setup_store().await;
    let datastore: Arc<dyn Datastore> = Arc::new(store);

    let first = setup_app(datastore.clone())
        .oneshot(upload_json(&acme_survey()))
        .await
        .unwrap();
    let second = setup_app(datastore)
        .oneshot(upload_json(&acme_survey()))
        .await
        .unwrap();

    let first_id = extract_json(first).await["survey_id"].as_i64().unwrap();
    let second_id = extract_json(second).await["survey_id"].as_i64().unwrap();
    assert_ne!(first_id, second_id);
}

#[tokio::test]
async fn test_upload_normalizes_fields() {
    let store = setup_store().await;
    let app = setup_app(Arc::new(store.clone()));

    let mut survey = acme_survey();
    survey["Organization"] = json!("   Acme Ltd  ");
    survey["Date"] = json!("15 Jan 2024");
    survey["Strategy"] = json!("3.5");
    survey["People"] = json!("lots");
    survey["Recommendations"] = json!("\u{4e2d}".repeat(3000));

    let response = app.oneshot(upload_json(&survey)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let survey_id = extract_json(response).await["survey_id"].as_i64().unwrap();

    let row = sqlx::query("SELECT * FROM survey_results WHERE id = ?")
        .bind(survey_id)
        .fetch_one(store.pool())
        .await
        .unwrap();

    assert_eq!(row.get::<String, _>("Organization"), "Acme Ltd");
    assert_eq!(
        row.get::<NaiveDate, _>("Date"),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    );
    assert_eq!(row.get::<f64, _>("Strategy"), 3.5);
    assert_eq!(row.get::<f64, _>("People"), 0.0);

    let recommendations = row.get::<String, _>("Recommendations");
    assert_eq!(recommendations.chars().count(), 1498);
    assert!(recommendations.ends_with('\u{2026}'));
}

#[tokio::test]
async fn test_short_date_forms_stored_with_full_year() {
    let store = setup_store().await;
    let datastore: Arc<dyn Datastore> = Arc::new(store.clone());

    let cases = [
        ("March 2024", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        ("15 Jan 24", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        ("15-01-24", NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
        ("March 1st, 2024", NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
    ];

    for (raw, expected) in cases {
        let mut survey = acme_survey();
        survey["Date"] = json!(raw);

        let response = setup_app(datastore.clone())
            .oneshot(upload_json(&survey))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let survey_id = extract_json(response).await["survey_id"].as_i64().unwrap();

        let stored: NaiveDate = sqlx::query("SELECT Date FROM survey_results WHERE id = ?")
            .bind(survey_id)
            .fetch_one(store.pool())
            .await
            .unwrap()
            .get(0);
        assert_eq!(stored, expected, "Date '{}' stored wrong", raw);
    }
}

#[tokio::test]
async fn test_unparseable_date_still_accepted() {
    let store = setup_store().await;
    let app = setup_app(Arc::new(store.clone()));

    let mut survey = acme_survey();
    survey["Date"] = json!("not a date");

    let response = app.oneshot(upload_json(&survey)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let survey_id = extract_json(response).await["survey_id"].as_i64().unwrap();

    let stored: NaiveDate = sqlx::query("SELECT Date FROM survey_results WHERE id = ?")
        .bind(survey_id)
        .fetch_one(store.pool())
        .await
        .unwrap()
        .get(0);
    assert!(stored > NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
}

// =============================================================================
// Rejected submissions
// =============================================================================

#[tokio::test]
async fn test_missing_fields_all_listed() {
    let store = setup_store().await;
    let app = setup_app(Arc::new(store.clone()));

    let survey = json!({
        "Contact_Person": "Jane",
        "Contact_Person_role": "CTO",
        "Email": "not-an-email",
        "Date": "2024-03-01",
        "Maturity_Stage": "   "
    });

    let response = app.oneshot(upload_json(&survey)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Missing required fields: Organization, Industry, Maturity_Stage"
    );
    assert!(body.get("survey_id").is_none());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM survey_results")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_invalid_email_rejected() {
    let app = setup_app(Arc::new(setup_store().await));

    let mut survey = acme_survey();
    survey["Email"] = json!("not-an-email");

    let response = app.oneshot(upload_json(&survey)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(extract_json(response).await["message"], "Invalid email format.");
}

#[tokio::test]
async fn test_empty_body_rejected() {
    let app = setup_app(Arc::new(setup_store().await));

    let response = app.oneshot(upload_request(Body::empty())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json; charset=utf-8"
    );
    assert_eq!(extract_json(response).await["message"], "Empty request body.");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = setup_app(Arc::new(setup_store().await));

    let response = app
        .oneshot(upload_request("{\"Organization\": \"Acme\""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response).await;
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().starts_with("Malformed JSON"));
}

#[tokio::test]
async fn test_oversized_body_rejected_as_bad_request() {
    let app = setup_app(Arc::new(setup_store().await));

    let mut survey = acme_survey();
    survey["Recommendations"] = json!("x".repeat(BODY_LIMIT + 1));

    let response = app.oneshot(upload_json(&survey)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(extract_json(response).await["status"], "error");
}

#[tokio::test]
async fn test_storage_failure_is_generic_bad_request() {
    let app = setup_app(Arc::new(UnavailableDatastore));

    let response = app.oneshot(upload_json(&acme_survey())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Failed to store survey results.");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app(Arc::new(UnavailableDatastore));

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "survey-api");
    assert!(body["version"].is_string());
}
