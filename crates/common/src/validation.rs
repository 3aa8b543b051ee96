//! Reusable input validators.
//!
//! Each validator has the `validator` crate's custom-function shape so it
//! can be used from `#[validate(custom(function = ...))]`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use validator::ValidationError;

/// Maximum slug length.
pub const SLUG_MAX_LEN: usize = 100;

static SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

fn error(code: &'static str, message: &'static str, value: &str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err.add_param(Cow::Borrowed("value"), &value);
    err
}

/// Lowercase letters, digits and single inner hyphens.
pub fn validate_slug(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("slug_empty", "Slug cannot be empty", value));
    }
    if value.chars().count() > SLUG_MAX_LEN {
        return Err(error("length", "Slug must be at most 100 characters", value));
    }
    if !SLUG_RE.is_match(value) {
        return Err(error(
            "slug_format",
            "Slug must contain only lowercase letters, numbers, and hyphens",
            value,
        ));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(error(
            "slug_hyphen_edge",
            "Slug cannot start or end with a hyphen",
            value,
        ));
    }
    if value.contains("--") {
        return Err(error(
            "slug_double_hyphen",
            "Slug cannot contain consecutive hyphens",
            value,
        ));
    }
    Ok(())
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "Value cannot be empty", value));
    }
    Ok(())
}

/// Loose address shape check.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(error("email_empty", "Email cannot be empty", value));
    }
    if !EMAIL_RE.is_match(value) {
        return Err(error("email", "Invalid email format", value));
    }
    Ok(())
}

/// Trim surrounding whitespace, reusing the allocation when nothing changes.
#[must_use]
pub fn trimmed(value: String) -> String {
    let t = value.trim();
    if t.len() == value.len() {
        value
    } else {
        t.to_string()
    }
}
