//! HTTP API handlers for survey-api

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub mod health;
pub mod upload;

pub use health::health_routes;
pub use upload::upload_results;

/// Content type of every survey endpoint response
pub const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Success body for an accepted survey (HTTP 201)
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub status: &'static str,
    pub survey_id: i64,
    pub message: &'static str,
}

impl SubmitResponse {
    pub fn inserted(survey_id: i64) -> Self {
        Self {
            status: "ok",
            survey_id,
            message: "Inserted successfully",
        }
    }
}

/// Failure body for any rejected survey (HTTP 400)
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

/// Serialize `body` with an explicit UTF-8 JSON content type
pub fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_UTF8))],
        Json(body),
    )
        .into_response()
}
