//! Declarative form validation.
//!
//! Forms describe their rules against a [`Validator`]; the first failing rule
//! per field is kept, so a blank field reports "required" and not also
//! "too short".

use serde::Serialize;

/// A single failed rule, addressed by the form field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field failures of one form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field,
            message: message.into(),
        }])
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// First message reported for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn has(&self, field: &str) -> bool {
        self.message_for(field).is_some()
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Accumulates field failures for one form.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn failed(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Record `message` for `field` unless `ok` holds or the field already failed.
    pub fn check(&mut self, ok: bool, field: &'static str, message: &str) -> &mut Self {
        if !ok && !self.failed(field) {
            self.errors.push(FieldError {
                field,
                message: message.to_string(),
            });
        }
        self
    }

    pub fn required(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), field, message)
    }

    /// Length in characters, not bytes (names and addresses carry accents).
    pub fn min_chars(&mut self, field: &'static str, value: &str, min: usize, message: &str) -> &mut Self {
        self.check(value.chars().count() >= min, field, message)
    }

    pub fn max_chars(&mut self, field: &'static str, value: &str, max: usize, message: &str) -> &mut Self {
        self.check(value.chars().count() <= max, field, message)
    }

    pub fn email(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        self.check(looks_like_email(value), field, message)
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(std::mem::take(&mut self.errors)))
        }
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
