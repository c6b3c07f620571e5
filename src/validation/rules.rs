//! Constructors for common validation errors.
//!
//! Messages are rendered from the same English templates the bundled
//! catalogs are keyed by, so every error built here can be translated.

use serde_json::{json, Value};

use crate::validation::{Ctx, Loc, ValidationErrorItem};

pub const FIELD_REQUIRED: &str = "Field required";
pub const STRING_TYPE: &str = "Input should be a valid string";
pub const INT_PARSING: &str =
    "Input should be a valid integer, unable to parse string as an integer";
pub const STRING_TOO_SHORT: &str = "String should have at least {min_length} characters";
pub const STRING_TOO_LONG: &str = "String should have at most {max_length} characters";
pub const GREATER_THAN_EQUAL: &str = "Input should be greater than or equal to {ge}";
pub const LESS_THAN_EQUAL: &str = "Input should be less than or equal to {le}";
pub const LITERAL_ERROR: &str = "Input should be {expected}";
pub const TOO_SHORT: &str =
    "{field_type} should have at least {min_length} items after validation, not {actual_length}";
pub const TOO_LONG: &str =
    "{field_type} should have at most {max_length} items after validation, not {actual_length}";
pub const VALUE_ERROR: &str = "Value error, {error}";
pub const JSON_INVALID: &str = "JSON decode error";

fn ctx(value: Value) -> Ctx {
    match value {
        Value::Object(map) => map,
        _ => Ctx::new(),
    }
}

pub fn missing(loc: Loc) -> ValidationErrorItem {
    ValidationErrorItem::new("missing", loc, FIELD_REQUIRED, Value::Null)
}

pub fn string_type(loc: Loc, input: Value) -> ValidationErrorItem {
    ValidationErrorItem::new("string_type", loc, STRING_TYPE, input)
}

pub fn int_parsing(loc: Loc, input: Value) -> ValidationErrorItem {
    ValidationErrorItem::new("int_parsing", loc, INT_PARSING, input)
}

pub fn string_too_short(loc: Loc, input: &str, min_length: usize) -> ValidationErrorItem {
    ValidationErrorItem::from_template(
        "string_too_short",
        loc,
        STRING_TOO_SHORT,
        json!(input),
        ctx(json!({ "min_length": min_length })),
    )
}

pub fn string_too_long(loc: Loc, input: &str, max_length: usize) -> ValidationErrorItem {
    ValidationErrorItem::from_template(
        "string_too_long",
        loc,
        STRING_TOO_LONG,
        json!(input),
        ctx(json!({ "max_length": max_length })),
    )
}

pub fn greater_than_equal(
    loc: Loc,
    input: impl Into<Value>,
    ge: impl Into<Value>,
) -> ValidationErrorItem {
    let ge: Value = ge.into();
    ValidationErrorItem::from_template(
        "greater_than_equal",
        loc,
        GREATER_THAN_EQUAL,
        input.into(),
        ctx(json!({ "ge": ge })),
    )
}

pub fn less_than_equal(
    loc: Loc,
    input: impl Into<Value>,
    le: impl Into<Value>,
) -> ValidationErrorItem {
    let le: Value = le.into();
    ValidationErrorItem::from_template(
        "less_than_equal",
        loc,
        LESS_THAN_EQUAL,
        input.into(),
        ctx(json!({ "le": le })),
    )
}

/// The input is not one of `expected`.
pub fn literal_error(loc: Loc, input: impl Into<Value>, expected: &[&str]) -> ValidationErrorItem {
    ValidationErrorItem::from_template(
        "literal_error",
        loc,
        LITERAL_ERROR,
        input.into(),
        ctx(json!({ "expected": expected_literals(expected) })),
    )
}

/// A collection has fewer than `min_length` items.
pub fn too_short(
    loc: Loc,
    input: Value,
    field_type: &str,
    min_length: usize,
    actual_length: usize,
) -> ValidationErrorItem {
    ValidationErrorItem::from_template(
        "too_short",
        loc,
        TOO_SHORT,
        input,
        ctx(json!({
            "field_type": field_type,
            "min_length": min_length,
            "actual_length": actual_length,
        })),
    )
}

/// A collection has more than `max_length` items.
pub fn too_long(
    loc: Loc,
    input: Value,
    field_type: &str,
    max_length: usize,
    actual_length: usize,
) -> ValidationErrorItem {
    ValidationErrorItem::from_template(
        "too_long",
        loc,
        TOO_LONG,
        input,
        ctx(json!({
            "field_type": field_type,
            "max_length": max_length,
            "actual_length": actual_length,
        })),
    )
}

pub fn value_error(loc: Loc, input: Value, error: &str) -> ValidationErrorItem {
    ValidationErrorItem::from_template(
        "value_error",
        loc,
        VALUE_ERROR,
        input,
        ctx(json!({ "error": error })),
    )
}

/// The request body is not JSON at all.
///
/// The message is opaque and is never translated.
pub fn json_invalid(error: &str) -> ValidationErrorItem {
    ValidationErrorItem {
        ctx: Some(ctx(json!({ "error": error }))),
        ..ValidationErrorItem::new("json_invalid", Loc::body(), JSON_INVALID, json!({}))
    }
}

/// `'a'`, `'a' or 'b'`, `'a', 'b' or 'c'`.
fn expected_literals(expected: &[&str]) -> String {
    let quoted: Vec<String> = expected.iter().map(|v| format!("'{}'", v)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}
