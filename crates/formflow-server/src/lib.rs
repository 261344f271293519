//! Navigation and HTTP integration for Formflow form sessions.
//!
//! Ties the session stores and the model cache together behind
//! [`AppState`], and decides per request whether a page may be shown
//! ([`NavigationResolver::resolve`]).
//!
//! # Example
//!
//! ```ignore
//! use formflow_server::{AppState, ServerConfig};
//!
//! let state = AppState::new(ServerConfig::new(), metadata, definitions, builder)?;
//!
//! let mut request = FormRequest::new(session_id)
//!     .with_slug("tax-form")
//!     .with_status(FormStatus::Live)
//!     .with_path("/income");
//! state.attach_model(&mut request).await?;
//!
//! let response = state
//!     .resolver
//!     .resolve(&mut request, |page, context| async move { render(page, context) })
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod navigation;
pub mod reference;
pub mod state;

pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, ServerError};
pub use navigation::{NavigationResolver, RETURN_URL_PARAM};
pub use reference::{RandomReferenceGenerator, ReferenceNumberGenerator, reference_prefix};
pub use state::AppState;
