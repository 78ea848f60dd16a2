//! Persisted survey model

use chrono::NaiveDate;

/// Maximum character width of the `Recommendations` column
pub const RECOMMENDATIONS_CAPACITY: usize = 2500;

/// One normalized survey submission, ready to become a `survey_results` row.
///
/// Fields bind to the table columns in `INSERT_SURVEY_SQL` order. The row
/// id is assigned by the database and is not part of this struct.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyRecord {
    pub organization: String,
    pub contact_person: String,
    pub contact_person_role: String,
    pub email: String,
    pub industry: String,
    pub date: NaiveDate,
    pub overall_score: f64,
    pub maturity_stage: String,
    pub strategy: f64,
    pub data: f64,
    pub technology: f64,
    pub people: f64,
    pub governance: f64,
    pub recommendations: String,
}
