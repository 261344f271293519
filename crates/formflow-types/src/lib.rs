//! Shared types for the Formflow form session engine.
//!
//! Everything here is plain data or a trait describing a collaborator:
//! the answer state model, the per-request [`FormRequest`], flash and
//! confirmation records, and the contract the navigation layer expects
//! from the external relevance engine ([`FormModel`] / [`FormPage`]).

pub mod config;
pub mod engine;
pub mod message;
pub mod request;
pub mod state;

pub use config::{
    ConfigProvider, HasSessionConfig, SessionConfigProvider, defaults as config_defaults,
};
pub use engine::{FormContext, FormModel, FormPage};
pub use message::{ConfirmationState, FlashMessage, FormSubmissionError};
pub use request::{FormParams, FormRequest, FormStatus};
pub use state::{FormState, FormValue, REFERENCE_NUMBER_FIELD};
