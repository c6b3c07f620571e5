//! Translator: resolves dotted keys against a locale's catalogs.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::i18n::catalog::{CatalogLookup, CatalogStore};
use crate::i18n::template::render_value;
use crate::i18n::TranslateError;
use crate::validation::Ctx;

/// Translates keys for exactly one locale.
///
/// The translator owns its catalog cache, so sharing one instance (as the
/// registry does) and building one per request give identical output; the
/// shared instance only saves disk reads.
#[derive(Debug)]
pub struct Translator {
    locale: String,
    store: CatalogStore,
}

impl Translator {
    pub fn new(locale: impl Into<String>, locale_path: impl Into<PathBuf>) -> Self {
        Self {
            locale: locale.into(),
            store: CatalogStore::new(locale_path),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn locale_path(&self) -> &Path {
        self.store.base_path()
    }

    pub fn catalogs(&self) -> &CatalogStore {
        &self.store
    }

    /// Translate `key` without interpolation.
    pub fn t(&self, key: &str) -> Result<String, TranslateError> {
        self.translate(key, &Ctx::new())
    }

    /// Resolve `key` (`group.path.to.template`) and interpolate `ctx`.
    ///
    /// A missing catalog or key yields [`Translator::not_found`] rather than
    /// an error. With an empty `ctx` the template is returned verbatim,
    /// braces included.
    ///
    /// # Errors
    /// Catalog load failures, and templates that reference a name `ctx`
    /// does not provide.
    pub fn translate(&self, key: &str, ctx: &Ctx) -> Result<String, TranslateError> {
        let mut segments = key.split('.');
        let group = segments.next().unwrap_or_default();

        let tree = match self.store.load(&self.locale, group)? {
            CatalogLookup::Found(tree) => tree,
            CatalogLookup::Absent => return Ok(self.not_found(key)),
        };

        let mut node = tree.as_ref();
        for segment in segments {
            match node.get(segment) {
                Some(child) => node = child,
                None => {
                    self.store.metrics().record_missing_key();
                    return Ok(self.not_found(key));
                }
            }
        }

        let Some(template) = node.as_str() else {
            warn!(key, locale = %self.locale, "Key resolves to a subtree, not a message");
            self.store.metrics().record_missing_key();
            return Ok(self.not_found(key));
        };

        if ctx.is_empty() {
            return Ok(template.to_string());
        }

        interpolate(key, template, ctx)
    }

    /// Placeholder returned when a key cannot be resolved.
    pub fn not_found(&self, key: &str) -> String {
        format!("Key {} not found in {} locale", key, self.locale)
    }
}

/// Replace `{name}` tokens with values from `ctx`.
///
/// `{{` and `}}` produce literal braces.
fn interpolate(key: &str, template: &str, ctx: &Ctx) -> Result<String, TranslateError> {
    let malformed = |reason: &'static str| TranslateError::MalformedTemplate {
        key: key.to_string(),
        reason,
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(malformed("unclosed '{'")),
                    }
                }
                if name.is_empty() {
                    return Err(malformed("positional placeholder '{}'"));
                }
                let value = ctx
                    .get(&name)
                    .ok_or_else(|| TranslateError::MissingPlaceholder {
                        key: key.to_string(),
                        name: name.clone(),
                    })?;
                out.push_str(&render_value(value));
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(malformed("single '}'")),
            c => out.push(c),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx(value: Value) -> Ctx {
        value.as_object().cloned().expect("ctx must be an object")
    }

    fn translator_with(catalog: &str) -> (TempDir, Translator) {
        let dir = TempDir::new().unwrap();
        let locale_dir = dir.path().join("en-US");
        fs::create_dir_all(&locale_dir).unwrap();
        fs::write(locale_dir.join("message.json"), catalog).unwrap();
        let translator = Translator::new("en-US", dir.path());
        (dir, translator)
    }

    // ==================== Lookup Tests ====================

    #[test]
    fn test_interpolation() {
        let (_dir, t) = translator_with(r#"{"field_required": "{field} is required"}"#);

        let out = t
            .translate("message.field_required", &ctx(json!({"field": "name"})))
            .unwrap();

        assert_eq!(out, "name is required");
    }

    #[test]
    fn test_empty_ctx_returns_template_verbatim() {
        let (_dir, t) = translator_with(r#"{"raw": "keep {these} {{braces}} }"}"#);

        assert_eq!(t.t("message.raw").unwrap(), "keep {these} {{braces}} }");
    }

    #[test]
    fn test_nested_path() {
        let (_dir, t) = translator_with(r#"{"user": {"name": {"missing": "Name missing"}}}"#);

        assert_eq!(t.t("message.user.name.missing").unwrap(), "Name missing");
    }

    #[test]
    fn test_missing_catalog_placeholder() {
        let (_dir, t) = translator_with("{}");

        assert_eq!(
            t.t("nope.missing").unwrap(),
            "Key nope.missing not found in en-US locale"
        );
    }

    #[test]
    fn test_missing_segment_uses_full_key() {
        let (_dir, t) = translator_with(r#"{"user": {"name": "x"}}"#);

        assert_eq!(
            t.t("message.user.email.invalid").unwrap(),
            "Key message.user.email.invalid not found in en-US locale"
        );
        assert_eq!(t.catalogs().metrics().missing_keys(), 1);
    }

    #[test]
    fn test_missing_segment_ignores_ctx() {
        let (_dir, t) = translator_with("{}");

        let out = t
            .translate("message.absent {x}", &ctx(json!({"x": 1})))
            .unwrap();

        assert_eq!(out, "Key message.absent {x} not found in en-US locale");
    }

    #[test]
    fn test_descending_through_a_string_is_not_found() {
        let (_dir, t) = translator_with(r#"{"leaf": "text"}"#);

        assert!(t.t("message.leaf.deeper").unwrap().starts_with("Key "));
    }

    #[test]
    fn test_subtree_is_not_found() {
        let (_dir, t) = translator_with(r#"{"user": {"name": "x"}}"#);

        assert_eq!(
            t.t("message.user").unwrap(),
            "Key message.user not found in en-US locale"
        );
    }

    #[test]
    fn test_group_only_key() {
        let (_dir, t) = translator_with(r#"{"a": "b"}"#);

        assert_eq!(t.t("message").unwrap(), "Key message not found in en-US locale");
    }

    #[test]
    fn test_bundled_fallback() {
        let dir = TempDir::new().unwrap();
        let t = Translator::new("zh-TW", dir.path());

        let out = t
            .translate(
                "message.Input should be {expected}",
                &ctx(json!({"expected": "'cat'"})),
            )
            .unwrap();

        assert_eq!(out, "輸入應為 'cat'");
    }

    // ==================== Interpolation Error Tests ====================

    #[test]
    fn test_missing_placeholder_is_an_error() {
        let (_dir, t) = translator_with(r#"{"m": "{field} must be under {limit}"}"#);

        let err = t
            .translate("message.m", &ctx(json!({"field": "age"})))
            .unwrap_err();

        match err {
            TranslateError::MissingPlaceholder { key, name } => {
                assert_eq!(key, "message.m");
                assert_eq!(name, "limit");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_templates() {
        let (_dir, t) =
            translator_with(r#"{"open": "a {b", "close": "a } b", "positional": "a {} b"}"#);
        let context = ctx(json!({"b": 1}));

        for key in ["message.open", "message.close", "message.positional"] {
            assert!(matches!(
                t.translate(key, &context),
                Err(TranslateError::MalformedTemplate { .. })
            ));
        }
    }

    #[test]
    fn test_escaped_braces_with_ctx() {
        let (_dir, t) = translator_with(r#"{"m": "{{literal}} {value}"}"#);

        let out = t.translate("message.m", &ctx(json!({"value": 3}))).unwrap();

        assert_eq!(out, "{literal} 3");
    }

    #[test]
    fn test_malformed_catalog_propagates() {
        let (_dir, t) = translator_with("[1, 2,");

        assert!(matches!(
            t.t("message.anything"),
            Err(TranslateError::MalformedCatalog { .. })
        ));
    }

    // ==================== Determinism Tests ====================

    #[test]
    fn test_repeated_calls_are_identical() {
        let (_dir, t) = translator_with(r#"{"m": "{n} items"}"#);
        let context = ctx(json!({"n": 4}));

        let first = t.translate("message.m", &context).unwrap();
        let second = t.translate("message.m", &context).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_translations_agree() {
        let (_dir, t) = translator_with(r#"{"m": "{n} items"}"#);
        let translator = Arc::new(t);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let translator = Arc::clone(&translator);
                std::thread::spawn(move || {
                    translator
                        .translate("message.m", &ctx(json!({"n": i})))
                        .unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("{} items", i));
        }
        assert_eq!(translator.catalogs().cached_len(), 1);
    }

    #[test]
    fn test_cache_is_authoritative_after_first_load() {
        let (dir, t) = translator_with(r#"{"m": "before"}"#);
        assert_eq!(t.t("message.m").unwrap(), "before");

        let path = dir.path().join("en-US").join("message.json");
        fs::write(&path, r#"{"m": "after"}"#).unwrap();
        assert_eq!(t.t("message.m").unwrap(), "before");

        fs::remove_file(&path).unwrap();
        assert_eq!(t.t("message.m").unwrap(), "before");
    }
}
