//! Required-field and email checks

use validator::ValidateEmail;

use super::SurveySubmission;
use crate::error::ValidationError;

/// Check required fields, then the email format
///
/// Every empty required field is collected before failing. The email rule
/// only runs once all required fields are present.
pub fn validate(submission: &SurveySubmission) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = submission
        .required_fields()
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if !submission.email.validate_email() {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(())
}
