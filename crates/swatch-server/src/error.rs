//! JSON error bodies returned by the API.

use std::collections::BTreeMap;

use serde::Serialize;
use validator::ValidationErrors;

/// Error response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetail,
}

/// Error details.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Human-readable message.
    pub message: String,
    /// Error category, e.g. `invalid_request_error`.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Per-field validation failures, keyed by field name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Vec<String>>,
}

impl ErrorResponse {
    /// Creates an error response with no field details.
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Attaches the field failures from a validation run.
    #[must_use]
    pub fn with_validation_errors(mut self, errors: &ValidationErrors) -> Self {
        for (field, failures) in errors.field_errors() {
            let messages = failures
                .iter()
                .map(|f| {
                    f.message
                        .as_ref()
                        .map_or_else(|| f.code.to_string(), ToString::to_string)
                })
                .collect();
            self.error.fields.insert(field.to_string(), messages);
        }
        self
    }
}
