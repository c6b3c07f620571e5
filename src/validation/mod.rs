//! Structured validation errors.
//!
//! The shape mirrors what request validators conventionally emit: an error
//! `type`, the `loc` path of the offending field, an English `msg` rendered
//! from a template, the rejected `input`, and the `ctx` values the template
//! was rendered with.

mod extract;
pub mod rules;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::i18n::render_value;

pub use extract::{Validate, ValidatedJson};

/// Named template parameters, in the order the validator inserted them.
pub type Ctx = Map<String, Value>;

/// One step of a field path: an object key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocSegment {
    Index(i64),
    Key(String),
}

impl From<&str> for LocSegment {
    fn from(key: &str) -> Self {
        LocSegment::Key(key.to_string())
    }
}

impl From<String> for LocSegment {
    fn from(key: String) -> Self {
        LocSegment::Key(key)
    }
}

impl From<usize> for LocSegment {
    fn from(index: usize) -> Self {
        LocSegment::Index(index as i64)
    }
}

impl fmt::Display for LocSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocSegment::Index(index) => write!(f, "{}", index),
            LocSegment::Key(key) => f.write_str(key),
        }
    }
}

/// Path of a field inside the request, e.g. `["body", "items", 0, "name"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Loc(Vec<LocSegment>);

impl Loc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of a JSON request body.
    pub fn body() -> Self {
        Self(vec![LocSegment::from("body")])
    }

    /// A child path one segment deeper.
    pub fn join(&self, segment: impl Into<LocSegment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[LocSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<LocSegment>> FromIterator<S> for Loc {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationErrorItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub loc: Loc,
    pub msg: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<Ctx>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ValidationErrorItem {
    pub fn new(kind: impl Into<String>, loc: Loc, msg: impl Into<String>, input: Value) -> Self {
        Self {
            kind: kind.into(),
            loc,
            msg: msg.into(),
            input,
            ctx: None,
            url: None,
        }
    }

    /// Build an error whose `msg` is `template` rendered with `ctx`.
    pub fn from_template(
        kind: impl Into<String>,
        loc: Loc,
        template: &str,
        input: Value,
        ctx: Ctx,
    ) -> Self {
        let mut msg = template.to_string();
        for (name, value) in &ctx {
            msg = msg.replace(&format!("{{{}}}", name), &render_value(value));
        }

        Self {
            ctx: if ctx.is_empty() { None } else { Some(ctx) },
            ..Self::new(kind, loc, msg, input)
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Loc Tests ====================

    #[test]
    fn test_loc_join() {
        let loc = Loc::body().join("items").join(0usize).join("name");

        assert_eq!(loc.len(), 4);
        assert_eq!(loc.segments()[2], LocSegment::Index(0));
        assert_eq!(loc.to_string(), "body.items.0.name");
    }

    #[test]
    fn test_loc_serializes_as_mixed_array() {
        let loc = Loc::body().join("items").join(1usize);
        assert_eq!(serde_json::to_value(&loc).unwrap(), json!(["body", "items", 1]));
    }

    #[test]
    fn test_loc_deserializes_mixed_array() {
        let loc: Loc = serde_json::from_value(json!(["query", 3, "q"])).unwrap();
        assert_eq!(
            loc.segments(),
            [
                LocSegment::Key("query".into()),
                LocSegment::Index(3),
                LocSegment::Key("q".into())
            ]
        );
    }

    #[test]
    fn test_loc_from_iter() {
        let loc: Loc = ["body", "name"].into_iter().collect();
        assert_eq!(loc, Loc::body().join("name"));
    }

    // ==================== Error Item Tests ====================

    #[test]
    fn test_from_template_renders_msg() {
        let ctx = json!({"max_length": 5}).as_object().cloned().unwrap();

        let error = ValidationErrorItem::from_template(
            "string_too_long",
            Loc::body().join("name"),
            "String should have at most {max_length} characters",
            json!("abcdefgh"),
            ctx,
        );

        assert_eq!(error.msg, "String should have at most 5 characters");
        assert_eq!(error.ctx.unwrap()["max_length"], 5);
    }

    #[test]
    fn test_from_template_empty_ctx_is_none() {
        let error = ValidationErrorItem::from_template(
            "missing",
            Loc::body(),
            "Field required",
            Value::Null,
            Ctx::new(),
        );
        assert!(error.ctx.is_none());
    }

    #[test]
    fn test_error_json_shape() {
        let error = ValidationErrorItem::new(
            "missing",
            Loc::body().join("x"),
            "Field required",
            Value::Null,
        )
        .with_url("https://example.com/missing");

        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(
            json,
            json!({
                "type": "missing",
                "loc": ["body", "x"],
                "msg": "Field required",
                "input": null,
                "url": "https://example.com/missing"
            })
        );
    }

    #[test]
    fn test_error_json_roundtrip_keeps_ctx_order() {
        let raw =
            r#"{"type":"too_long","loc":["body",0],"msg":"m","input":"x","ctx":{"z":1,"a":2}}"#;

        let error: ValidationErrorItem = serde_json::from_str(raw).unwrap();

        let keys: Vec<_> = error.ctx.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(serde_json::to_string(&error).unwrap(), raw);
    }
}
