//! Report form input and the checks it must pass before it is stored.

use thiserror::Error;

use crate::validation::Validator;

/// Placeholder shown in an untouched description box.
pub const DESCRIPTION_PLACEHOLDER: &str = "Provide detailed information...";

/// Placeholder shown in an untouched name box.
pub const NAME_PLACEHOLDER: &str = "Juan Dela Cruz";

/// Placeholder shown in an untouched contact box.
pub const CONTACT_PLACEHOLDER: &str = "09XX XXX XXXX";

/// Raw values from the incident report form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    /// Selected incident type, possibly the long `"Medical Emergency"` label.
    pub incident_type: String,
    /// Location of the incident.
    pub location: String,
    /// What happened.
    pub description: String,
    /// Reporter's name.
    pub reporter: String,
    /// Reporter's contact number.
    pub contact: String,
}

/// Why a [`ReportForm`] was rejected. The display text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Description is blank or still the placeholder.
    #[error("Please provide an incident description.")]
    MissingDescription,

    /// Name is blank or still the placeholder.
    #[error("Please enter your name.")]
    MissingName,

    /// Name failed the name validator.
    #[error("{0}")]
    InvalidName(String),

    /// Contact is blank or still the placeholder.
    #[error("Please enter your contact number.")]
    MissingContact,

    /// Contact failed the phone validator.
    #[error("{0}")]
    InvalidContact(String),
}

/// Errors from [`crate::IncidentService::submit_report`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The form failed validation; nothing was stored.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The repository refused the record.
    #[error("Failed to save report. Please try again.")]
    SaveFailed,
}

fn is_blank_or(value: &str, placeholder: &str) -> bool {
    value.trim().is_empty() || value == placeholder
}

impl ReportForm {
    /// Checks the form, in order: description, name, contact. The first
    /// failure wins.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for the first field that fails.
    pub fn validate(
        &self,
        name_validator: &dyn Validator,
        phone_validator: &dyn Validator,
    ) -> Result<(), ValidationError> {
        if is_blank_or(&self.description, DESCRIPTION_PLACEHOLDER) {
            return Err(ValidationError::MissingDescription);
        }

        if is_blank_or(&self.reporter, NAME_PLACEHOLDER) {
            return Err(ValidationError::MissingName);
        }
        if !name_validator.is_valid(&self.reporter) {
            return Err(ValidationError::InvalidName(
                name_validator.error_message().to_string(),
            ));
        }

        if is_blank_or(&self.contact, CONTACT_PLACEHOLDER) {
            return Err(ValidationError::MissingContact);
        }
        if !phone_validator.is_valid(&self.contact) {
            return Err(ValidationError::InvalidContact(
                phone_validator.error_message().to_string(),
            ));
        }

        Ok(())
    }
}
