//! Survey upload endpoint

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use super::{json_response, SubmitResponse};
use crate::error::SubmissionError;
use crate::submission::submit_survey;
use crate::AppState;

/// POST /upload_results
///
/// Body: one JSON survey object. Answers 201 with the new `survey_id`, or
/// 400 with an error message for any failure (including an unreadable or
/// oversized body).
pub async fn upload_results(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let outcome = match body {
        Ok(bytes) => submit_survey(state.datastore.as_ref(), &bytes).await,
        Err(rejection) => Err(SubmissionError::MalformedInput(format!(
            "Failed to read request body: {}",
            rejection.body_text()
        ))),
    };

    match outcome {
        Ok(survey_id) => {
            info!(survey_id, "Survey stored");
            json_response(StatusCode::CREATED, SubmitResponse::inserted(survey_id))
        }
        Err(err) => {
            match &err {
                SubmissionError::Storage(source) => {
                    error!(kind = err.kind(), "Failed to insert survey: {}", source);
                }
                other => warn!(kind = other.kind(), "Rejected survey submission: {}", other),
            }
            err.into_response()
        }
    }
}
