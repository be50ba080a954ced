//! Field validators for the report form.
//!
//! Validators are pluggable through the [`Validator`] trait so a caller
//! (or a test) can swap in different rules without touching submission.

use std::sync::LazyLock;

use regex::Regex;

/// Names: letters (including Latin-1 accented), whitespace, apostrophes,
/// and hyphens, at least two characters.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]{2,}$").expect("valid regex"));

/// Philippine mobile numbers once spaces and dashes are removed.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09[0-9]{9}$").expect("valid regex"));

/// Separators allowed inside a typed phone number.
static PHONE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]").expect("valid regex"));

/// A single-field validation rule.
pub trait Validator: Send + Sync {
    /// Whether `input` satisfies the rule. Empty or whitespace-only input
    /// is never valid.
    fn is_valid(&self, input: &str) -> bool;

    /// Message to show when [`Self::is_valid`] returns `false`.
    fn error_message(&self) -> &str;
}

/// Validates a person's name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameValidator;

impl Validator for NameValidator {
    fn is_valid(&self, input: &str) -> bool {
        !input.trim().is_empty() && NAME_RE.is_match(input)
    }

    fn error_message(&self) -> &str {
        "Please enter a valid name (letters and spaces only)."
    }
}

/// Validates a Philippine mobile number such as `0912 345 6789`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneNumberValidator;

impl Validator for PhoneNumberValidator {
    fn is_valid(&self, input: &str) -> bool {
        if input.trim().is_empty() {
            return false;
        }
        let digits = PHONE_SEPARATOR_RE.replace_all(input, "");
        PHONE_RE.is_match(&digits)
    }

    fn error_message(&self) -> &str {
        "Please enter a valid Philippine mobile number (e.g., 09XX XXX XXXX)."
    }
}
