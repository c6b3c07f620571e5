//! Error mapper: swaps each error's `msg` for its translation.

use crate::i18n::{derive_template, message_key, DerivedKey, TranslateError, Translator};
use crate::validation::{Ctx, ValidationErrorItem};

/// Translate a list of validation errors.
///
/// The output has the same length and order as `errors`; only `msg` differs.
///
/// # Errors
/// The first hard translation failure (malformed catalog, placeholder the
/// context does not provide). Missing keys are not failures.
pub fn map_errors(
    translator: &Translator,
    errors: &[ValidationErrorItem],
) -> Result<Vec<ValidationErrorItem>, TranslateError> {
    errors
        .iter()
        .map(|error| {
            let msg = translate_message(translator, &error.msg, error.ctx.as_ref())?;
            Ok(ValidationErrorItem {
                msg,
                ..error.clone()
            })
        })
        .collect()
}

/// Translate one rendered message using the context it was rendered with.
pub fn translate_message(
    translator: &Translator,
    msg: &str,
    ctx: Option<&Ctx>,
) -> Result<String, TranslateError> {
    match derive_template(msg, ctx) {
        DerivedKey::Opaque(msg) => Ok(msg),
        DerivedKey::Template(fragment) => {
            let empty = Ctx::new();
            translator.translate(&message_key(&fragment), ctx.unwrap_or(&empty))
        }
    }
}
