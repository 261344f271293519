//! Flash and confirmation records.

use serde::{Deserialize, Serialize};

/// A validation error raised while submitting a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmissionError {
    /// Path to the offending field, e.g. `["address", "postcode"]`.
    pub path: Vec<String>,
    /// Anchor link to the field, e.g. `#postcode`.
    pub href: String,
    pub name: String,
    /// Human-readable message.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl FormSubmissionError {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: vec![name.clone()],
            href: format!("#{name}"),
            name,
            text: text.into(),
            context: None,
        }
    }
}

/// Errors queued for exactly one subsequent read, typically across a redirect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub errors: Vec<FormSubmissionError>,
}

impl FlashMessage {
    pub fn new(errors: Vec<FormSubmissionError>) -> Self {
        Self { errors }
    }
}

/// State kept after a form has been submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationState {
    pub confirmed: bool,
}
