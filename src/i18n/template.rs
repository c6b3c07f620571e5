//! Template key derivation.
//!
//! Validation messages arrive with their context values already substituted
//! ("String should have at most 10 characters"). To find the message in a
//! catalog the concrete values are turned back into `{name}` placeholders
//! using the error's context as a guide.
//!
//! This is a best-effort heuristic. Context entries are applied in insertion
//! order and each one rewrites *every* occurrence of its rendered value, so
//! when two values render to the same or overlapping text the first entry
//! wins. Errors that can name their template directly avoid the ambiguity.

use std::borrow::Cow;

use serde_json::Value;

use crate::validation::Ctx;

/// Catalog group that holds validation messages.
pub const MESSAGE_GROUP: &str = "message";

/// Messages that are returned as-is: no templating, no catalog lookup.
pub const OPAQUE_MESSAGES: &[&str] = &["JSON decode error"];

/// The result of reversing a message into its template shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedKey {
    /// A template fragment to look up under [`MESSAGE_GROUP`].
    Template(String),
    /// A message that must be passed through untouched.
    Opaque(String),
}

pub fn is_opaque(msg: &str) -> bool {
    OPAQUE_MESSAGES.contains(&msg)
}

/// Reconstruct the template a message was rendered from.
///
/// # Example
/// ```
/// use serde_json::json;
/// use validation_i18n::i18n::{derive_template, DerivedKey};
///
/// let ctx = json!({"max_length": 10});
/// let derived = derive_template(
///     "String should have at most 10 characters",
///     ctx.as_object(),
/// );
/// assert_eq!(
///     derived,
///     DerivedKey::Template("String should have at most {max_length} characters".into())
/// );
/// ```
pub fn derive_template(msg: &str, ctx: Option<&Ctx>) -> DerivedKey {
    if is_opaque(msg) {
        return DerivedKey::Opaque(msg.to_string());
    }

    let mut template = msg.to_string();
    for (name, value) in ctx.into_iter().flatten() {
        let rendered = render_value(value);
        // An empty needle would match between every character
        if rendered.is_empty() {
            continue;
        }
        template = template.replace(rendered.as_ref(), &format!("{{{}}}", name));
    }

    DerivedKey::Template(template)
}

/// Full lookup key for a template fragment.
pub fn message_key(fragment: &str) -> String {
    format!("{}.{}", MESSAGE_GROUP, fragment)
}

/// String form of a context value as it appears in rendered messages.
///
/// Strings are used without quotes; everything else uses its JSON text.
pub fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}
