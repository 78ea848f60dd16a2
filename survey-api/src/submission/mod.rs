//! Survey submission pipeline
//!
//! Raw body → JSON field map → typed, trimmed fields → validation →
//! normalization → `Datastore` insert. Each stage returns a typed error;
//! the HTTP layer maps them to a response once.

use serde_json::{Map, Value};
use survey_common::db::Datastore;
use survey_common::SurveyRecord;
use tracing::debug;

use crate::error::SubmissionError;

pub mod coerce;
pub mod date;
pub mod recommendations;
pub mod validate;

use coerce::{coerce_string, parse_number_or_default};
use date::normalize_date;
use recommendations::format_recommendations;

/// Decoded request body
pub type FieldMap = Map<String, Value>;

/// Default for every score field the client leaves out
pub const DEFAULT_SCORE: f64 = 0.0;

/// One request's survey fields after extraction and trimming
///
/// Lives only for the duration of the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveySubmission {
    pub organization: String,
    pub contact_person: String,
    pub contact_person_role: String,
    pub email: String,
    pub industry: String,
    /// Date exactly as submitted (trimmed)
    pub date_raw: String,
    pub overall_score: f64,
    pub maturity_stage: String,
    pub strategy: f64,
    pub data: f64,
    pub technology: f64,
    pub people: f64,
    pub governance: f64,
    pub recommendations: String,
}

/// Parse the request body into a field map
pub fn decode(body: &[u8]) -> Result<FieldMap, SubmissionError> {
    if body.is_empty() {
        return Err(SubmissionError::MalformedInput("Empty request body.".to_string()));
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(SubmissionError::MalformedInput(
            "Request body must be a JSON object.".to_string(),
        )),
        Err(e) => Err(SubmissionError::MalformedInput(format!("Malformed JSON: {}", e))),
    }
}

impl SurveySubmission {
    /// Pull the survey fields out of a decoded body
    ///
    /// Absent text fields become `""`; absent or non-numeric scores become
    /// `DEFAULT_SCORE`. Unknown keys are ignored.
    pub fn from_fields(fields: &FieldMap) -> Self {
        let text = |key: &str| coerce_string(fields.get(key));
        let score = |key: &str| parse_number_or_default(fields.get(key), DEFAULT_SCORE);

        Self {
            organization: text("Organization"),
            contact_person: text("Contact_Person"),
            contact_person_role: text("Contact_Person_role"),
            email: text("Email"),
            industry: text("Industry"),
            date_raw: text("Date"),
            overall_score: score("Overall_Score"),
            maturity_stage: text("Maturity_Stage"),
            strategy: score("Strategy"),
            data: score("Data"),
            technology: score("Technology"),
            people: score("People"),
            governance: score("Governance"),
            recommendations: text("Recommendations"),
        }
    }

    /// Required fields with their wire names, in reporting order
    pub fn required_fields(&self) -> [(&'static str, &str); 7] {
        [
            ("Organization", self.organization.as_str()),
            ("Contact_Person", self.contact_person.as_str()),
            ("Contact_Person_role", self.contact_person_role.as_str()),
            ("Email", self.email.as_str()),
            ("Industry", self.industry.as_str()),
            ("Date", self.date_raw.as_str()),
            ("Maturity_Stage", self.maturity_stage.as_str()),
        ]
    }

    /// Validate, then normalize into a storable record
    pub fn into_record(self) -> Result<SurveyRecord, SubmissionError> {
        validate::validate(&self)?;

        let date = normalize_date(&self.date_raw);

        Ok(SurveyRecord {
            organization: self.organization,
            contact_person: self.contact_person,
            contact_person_role: self.contact_person_role,
            email: self.email,
            industry: self.industry,
            date: date.date,
            overall_score: self.overall_score,
            maturity_stage: self.maturity_stage,
            strategy: self.strategy,
            data: self.data,
            technology: self.technology,
            people: self.people,
            governance: self.governance,
            recommendations: format_recommendations(&self.recommendations),
        })
    }
}

/// Run the whole pipeline for one request body, returning the new survey id
pub async fn submit_survey(
    datastore: &dyn Datastore,
    body: &[u8],
) -> Result<i64, SubmissionError> {
    let fields = decode(body)?;
    let record = SurveySubmission::from_fields(&fields).into_record()?;
    debug!(
        organization = %record.organization,
        date = %record.date,
        "Survey submission accepted for storage"
    );

    datastore
        .insert_survey_record(&record)
        .await
        .map_err(SubmissionError::Storage)
}
