//! Localized request validation errors for axum services.
//!
//! Handlers reject with [`ValidationFailure`] (or use the [`ValidatedJson`]
//! extractor); the middleware installed by [`setup`] picks the caller's
//! locale and rewrites every error `msg` from the per-locale catalogs.

pub mod config;
pub mod handler;
pub mod i18n;
pub mod mapper;
pub mod middleware;
pub mod validation;

pub use handler::{i18n_error_response, ErrorBody, ValidationFailure};
pub use i18n::{TranslateError, Translator, TranslatorRegistry};
pub use mapper::map_errors;
pub use middleware::{setup, I18nState, RequestLocale};
pub use validation::{Validate, ValidatedJson, ValidationErrorItem};
