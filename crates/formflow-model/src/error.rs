//! Error types for model loading.

use formflow_types::FormStatus;

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No metadata exists for the slug.
    #[error("Form not found: {0}")]
    FormNotFound(String),

    /// The form exists but has no version in the requested status.
    #[error("Form '{slug}' has no {status} version")]
    StatusNotFound { slug: String, status: FormStatus },

    /// Metadata exists but the definition is gone.
    #[error("No {status} definition for form {form_id}")]
    DefinitionNotFound { form_id: String, status: FormStatus },

    /// A live form with nowhere to send submissions.
    #[error("Form '{0}' has no submission email address")]
    MissingNotificationEmail(String),

    /// Error from a metadata or definition provider.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The definition could not be compiled.
    #[error("Build error: {0}")]
    Build(String),
}

impl ModelError {
    /// Whether the error means "no such form/version" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ModelError::FormNotFound(_)
                | ModelError::StatusNotFound { .. }
                | ModelError::DefinitionNotFound { .. }
        )
    }
}

/// Result type for model loading.
pub type Result<T> = std::result::Result<T, ModelError>;
