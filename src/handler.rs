//! 422 responses for validation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::i18n::Translator;
use crate::mapper::map_errors;
use crate::validation::ValidationErrorItem;

/// JSON body of a validation failure response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ValidationErrorItem>,
}

/// A request that failed validation.
///
/// Returned as a rejection or handler error. On its own it renders the
/// untranslated errors; behind the i18n middleware the response is rebuilt
/// in the request's locale.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    errors: Vec<ValidationErrorItem>,
}

impl ValidationFailure {
    pub fn new(errors: Vec<ValidationErrorItem>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationErrorItem] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ValidationErrorItem> {
        self.errors
    }
}

impl From<Vec<ValidationErrorItem>> for ValidationFailure {
    fn from(errors: Vec<ValidationErrorItem>) -> Self {
        Self::new(errors)
    }
}

impl IntoResponse for ValidationFailure {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            errors: self.errors.clone(),
        };
        let mut response = (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        // Picked up by the middleware, which knows the request locale
        response.extensions_mut().insert(self);
        response
    }
}

/// Build the translated 422 response for `errors`.
///
/// A hard translation failure is logged and the untranslated errors are
/// returned instead, so the validation failure itself is never hidden.
pub fn i18n_error_response(translator: &Translator, errors: &[ValidationErrorItem]) -> Response {
    let errors = match map_errors(translator, errors) {
        Ok(translated) => translated,
        Err(err) => {
            error!(
                locale = translator.locale(),
                error = %err,
                "Failed to translate validation errors"
            );
            errors.to_vec()
        }
    };

    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody { errors })).into_response()
}
