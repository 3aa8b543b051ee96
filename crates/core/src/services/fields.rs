//! Field checks shared by the update inputs.
//!
//! Create inputs use the `validator` derive. Update inputs carry
//! [`Patch`] fields, which the derive cannot see through, so they are
//! checked here with the same codes and messages.

use helpcenter_common::{AppError, AppResult, FieldError, Patch, field_errors};
use serde_json::Value;
use validator::{ValidationError, ValidationErrors};

/// Accumulates field errors until [`FieldChecks::finish`].
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    errors: Vec<FieldError>,
}

impl FieldChecks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start from the outcome of a derived `validate()`.
    pub(crate) fn from_derived(result: Result<(), ValidationErrors>) -> Self {
        Self {
            errors: result.err().map(|e| field_errors(&e)).unwrap_or_default(),
        }
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = FieldError>) {
        self.errors.extend(errors);
    }

    /// Record a custom validator outcome against `field`.
    pub(crate) fn check(&mut self, field: &str, result: Result<(), ValidationError>) {
        if let Err(e) = result {
            self.errors.push(FieldError::from_validation(field, &e));
        }
    }

    /// Character count within `min..=max`.
    pub(crate) fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            let message = if min == 0 {
                format!("Must be at most {max} characters")
            } else {
                format!("Must be between {min} and {max} characters")
            };
            self.errors.push(FieldError::new(
                field,
                message,
                Value::String(value.to_string()),
                "length",
            ));
        }
    }

    /// Reject an explicit `null` on a column that cannot be cleared.
    pub(crate) fn not_null<T>(&mut self, field: &str, patch: &Patch<T>) {
        if matches!(patch, Patch::Null) {
            self.errors.push(FieldError::new(
                field,
                "Field cannot be null",
                Value::Null,
                "null_not_allowed",
            ));
        }
    }

    pub(crate) fn finish(self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}
