//! Error types for survey-api
//!
//! Every pipeline stage returns a `SubmissionError`. The kinds stay distinct
//! for logging and tests, but all of them answer HTTP 400 with the same
//! `{"status":"error","message":...}` shape.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::{json_response, ErrorResponse};

/// Rejected submission content
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more required fields are empty, listed in field order
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Invalid email format.")]
    InvalidEmail,
}

/// Pipeline failure
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Body missing, unreadable or not a JSON object
    #[error("{0}")]
    MalformedInput(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failed; details stay in the logs
    #[error("Failed to store survey results.")]
    Storage(#[source] survey_common::Error),
}

impl SubmissionError {
    /// Short kind label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            SubmissionError::MalformedInput(_) => "malformed_input",
            SubmissionError::Validation(_) => "validation",
            SubmissionError::Storage(_) => "storage",
        }
    }
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        json_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                status: "error",
                message: self.to_string(),
            },
        )
    }
}
