//! Reference numbers assigned to form instances.

use formflow_types::FormModel;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Result, ServerError};

/// Generates user-facing reference numbers.
pub trait ReferenceNumberGenerator: Send + Sync {
    /// A new reference, unique per form instance.
    fn generate(&self, prefix: Option<&str>) -> String;
}

/// Nine random hex digits from a v4 UUID, as `XXX-XXX-XXX`, after the
/// prefix when one is configured (`PREFIX-XXX-XXX-XXX`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReferenceGenerator;

impl ReferenceNumberGenerator for RandomReferenceGenerator {
    fn generate(&self, prefix: Option<&str>) -> String {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        let digits = format!("{}-{}-{}", &hex[0..3], &hex[3..6], &hex[6..9]);
        match prefix {
            Some(prefix) => format!("{prefix}-{digits}"),
            None => digits,
        }
    }
}

/// The model's configured prefix, validated.
pub fn reference_prefix(model: &dyn FormModel) -> Result<Option<String>> {
    match model.reference_number_prefix() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(prefix)) => Ok(Some(prefix.clone())),
        Some(other) => Err(ServerError::InvalidConfiguration(format!(
            "referenceNumberPrefix on form '{}' must be a string, got {}",
            model.name(),
            other
        ))),
    }
}
