use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::handler::ValidationFailure;
use crate::validation::{rules, Loc, ValidationErrorItem};

/// Field-level checks run after a payload deserializes.
pub trait Validate {
    /// Return every failed check; `loc` is the path of `self` in the request.
    fn validate(&self, loc: &Loc) -> Vec<ValidationErrorItem>;
}

/// JSON body extractor that rejects with structured validation errors.
///
/// Bodies that are not JSON produce a single opaque `json_invalid` error.
/// JSON that does not fit `T` produces a `value_error`. Otherwise every
/// error from [`Validate::validate`] is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidationFailure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ValidationFailure::from(vec![rules::json_invalid(&rejection.body_text())])
        })?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|err| {
            ValidationFailure::from(vec![rules::json_invalid(&err.to_string())])
        })?;

        let payload: T = serde_json::from_value(value.clone()).map_err(|err| {
            ValidationFailure::from(vec![rules::value_error(
                Loc::body(),
                value,
                &err.to_string(),
            )])
        })?;

        let errors = payload.validate(&Loc::body());
        if !errors.is_empty() {
            return Err(ValidationFailure::from(errors));
        }

        Ok(ValidatedJson(payload))
    }
}
