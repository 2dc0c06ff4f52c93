// Common validation types and traits

use serde::Serialize;

/// Outcome of an exhaustive validation pass.
///
/// Serializes as `{ "valid": bool, "errors": [string] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    #[serde(rename = "valid")]
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    pub fn add_field_error(&mut self, field: &str, message: &str) {
        self.add_error(format!("{}: {}", field, message));
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Validator<T: ?Sized> {
    fn validate(&self, data: &T) -> ValidationResult;
}
