//! Session key derivation.
//!
//! Wire format: `<sessionId>:<formStatus>:<formSlug>:<pagePath>`, with
//! `:<subNamespace>` appended for secondary stores. Other deployments read
//! these keys, so the format must not drift.

use std::fmt;

use formflow_types::FormRequest;

use crate::error::{Result, SessionError};
use crate::persistence::{NoPersistence, SessionPersistence};

/// Store segment all form session keys live under.
pub const CACHE_SEGMENT: &str = "cache";

/// Address of a value in a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub segment: String,
    pub id: String,
}

impl SessionKey {
    /// Key in the default cache segment.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            segment: CACHE_SEGMENT.to_string(),
            id: id.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Derive a key using the default algorithm.
pub fn derive_key(request: &FormRequest, sub_namespace: Option<&str>) -> Result<SessionKey> {
    derive_key_with(request, sub_namespace, &NoPersistence)
}

/// Derive a key, letting `persistence` supply the base id.
///
/// A generator-supplied id is used verbatim; uniqueness is then the
/// generator's problem. The sub-namespace is appended either way, which
/// yields a double colon when the page path is empty.
pub fn derive_key_with(
    request: &FormRequest,
    sub_namespace: Option<&str>,
    persistence: &dyn SessionPersistence,
) -> Result<SessionKey> {
    let session_id = request
        .session_id
        .as_deref()
        .ok_or(SessionError::MissingSession)?;

    let base = match persistence.key(request) {
        Some(id) => id,
        None => {
            let params = &request.params;
            format!(
                "{}:{}:{}:{}",
                session_id,
                params.state.map(|s| s.as_str()).unwrap_or_default(),
                params.slug.as_deref().unwrap_or_default(),
                params.path.as_deref().unwrap_or_default(),
            )
        }
    };

    let id = match sub_namespace {
        Some(ns) => format!("{base}:{ns}"),
        None => base,
    };

    Ok(SessionKey::new(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_types::FormStatus;

    fn tax_form_request() -> FormRequest {
        FormRequest::new("abc")
            .with_status(FormStatus::Live)
            .with_slug("tax-form")
            .with_path("")
    }

    #[test]
    fn test_default_key_format() {
        let key = derive_key(&tax_form_request(), None).unwrap();
        assert_eq!(key.id, "abc:live:tax-form:");
        assert_eq!(key.segment, CACHE_SEGMENT);
    }

    #[test]
    fn test_sub_namespace_appends_with_double_colon() {
        let key = derive_key(&tax_form_request(), Some("confirmation")).unwrap();
        assert_eq!(key.id, "abc:live:tax-form::confirmation");
    }

    #[test]
    fn test_absent_params_are_empty_segments() {
        let key = derive_key(&FormRequest::new("abc"), None).unwrap();
        assert_eq!(key.id, "abc:::");
    }

    #[test]
    fn test_deterministic() {
        let a = derive_key(&tax_form_request().with_path("income"), None).unwrap();
        let b = derive_key(&tax_form_request().with_path("income"), None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id, "abc:live:tax-form:income");
    }

    #[test]
    fn test_distinct_tuples_distinct_keys() {
        let live = derive_key(&tax_form_request(), None).unwrap();
        let draft = derive_key(&tax_form_request().with_status(FormStatus::Draft), None).unwrap();
        let other = derive_key(&FormRequest::new("xyz").with_slug("tax-form"), None).unwrap();
        assert_ne!(live, draft);
        assert_ne!(live, other);
    }

    #[test]
    fn test_missing_session() {
        let request = FormRequest::default().with_slug("tax-form");
        let err = derive_key(&request, None).unwrap_err();
        assert!(matches!(err, SessionError::MissingSession));
    }

    struct FixedKey;

    impl SessionPersistence for FixedKey {
        fn key(&self, request: &FormRequest) -> Option<String> {
            Some(format!("user-42:{}", request.params.slug.as_deref().unwrap_or_default()))
        }
    }

    #[test]
    fn test_generator_overrides_base_id() {
        let key = derive_key_with(&tax_form_request(), None, &FixedKey).unwrap();
        assert_eq!(key.id, "user-42:tax-form");

        let key = derive_key_with(&tax_form_request(), Some("flash"), &FixedKey).unwrap();
        assert_eq!(key.id, "user-42:tax-form:flash");
    }

    #[test]
    fn test_generator_still_requires_session() {
        let request = FormRequest::default().with_slug("tax-form");
        let err = derive_key_with(&request, None, &FixedKey).unwrap_err();
        assert!(matches!(err, SessionError::MissingSession));
    }
}
