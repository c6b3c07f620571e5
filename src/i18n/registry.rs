//! Translator registry: one shared translator per locale.
//!
//! The registry is owned by whoever builds the router and handed to the
//! middleware explicitly. It lives as long as the application does.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::i18n::metrics::MetricsReport;
use crate::i18n::template::MESSAGE_GROUP;
use crate::i18n::{TranslateError, Translator};

#[derive(Debug)]
pub struct TranslatorRegistry {
    locale_path: PathBuf,
    translators: RwLock<HashMap<String, Arc<Translator>>>,
}

impl TranslatorRegistry {
    /// Create an empty registry; translators are built on first use.
    pub fn new(locale_path: impl Into<PathBuf>) -> Self {
        Self {
            locale_path: locale_path.into(),
            translators: RwLock::new(HashMap::new()),
        }
    }

    /// Create translators for `locales` up front and load their message
    /// catalogs, so a broken catalog fails startup instead of a request.
    pub fn preloaded(
        locale_path: impl Into<PathBuf>,
        locales: &[String],
    ) -> Result<Self, TranslateError> {
        let registry = Self::new(locale_path);
        for locale in locales {
            let translator = registry.get(locale);
            translator.catalogs().load(locale, MESSAGE_GROUP)?;
        }
        info!(count = locales.len(), "Preloaded translators");
        Ok(registry)
    }

    pub fn locale_path(&self) -> &Path {
        &self.locale_path
    }

    /// Get the translator for `locale`, creating it if needed.
    pub fn get(&self, locale: &str) -> Arc<Translator> {
        if let Some(translator) = self
            .translators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
        {
            return Arc::clone(translator);
        }

        let mut translators = self
            .translators
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let translator = translators
            .entry(locale.to_string())
            .or_insert_with(|| Arc::new(Translator::new(locale, self.locale_path.clone())));
        Arc::clone(translator)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.translators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(locale)
    }

    /// Locales with a live translator, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self
            .translators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        locales.sort();
        locales
    }

    /// Catalog metrics for every live translator.
    pub fn metrics(&self) -> BTreeMap<String, MetricsReport> {
        self.translators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(locale, translator)| (locale.clone(), translator.catalogs().metrics().report()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ==================== Lookup Tests ====================

    #[test]
    fn test_get_returns_shared_instance() {
        let registry = TranslatorRegistry::new("locales");

        let first = registry.get("en-US");
        let second = registry.get("en-US");

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_get_binds_locale_and_path() {
        let registry = TranslatorRegistry::new("some/dir");

        let translator = registry.get("ja-JP");

        assert_eq!(translator.locale(), "ja-JP");
        assert_eq!(translator.locale_path(), Path::new("some/dir"));
    }

    #[test]
    fn test_locales_are_created_lazily() {
        let registry = TranslatorRegistry::new("locales");
        assert!(registry.locales().is_empty());
        assert!(!registry.contains("zh-TW"));

        registry.get("zh-TW");
        registry.get("en-US");

        assert!(registry.contains("zh-TW"));
        assert_eq!(registry.locales(), vec!["en-US", "zh-TW"]);
    }

    // ==================== Preload Tests ====================

    #[test]
    fn test_preloaded_warms_message_catalogs() {
        let dir = TempDir::new().unwrap();
        let locales = vec!["zh-TW".to_string(), "ja-JP".to_string()];

        let registry = TranslatorRegistry::preloaded(dir.path(), &locales).unwrap();

        assert_eq!(registry.locales(), vec!["ja-JP", "zh-TW"]);
        let metrics = registry.metrics();
        assert_eq!(metrics["zh-TW"].bundled_loads, 1);
        assert_eq!(metrics["ja-JP"].bundled_loads, 1);
    }

    #[test]
    fn test_preloaded_fails_on_malformed_catalog() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("en-US")).unwrap();
        fs::write(dir.path().join("en-US").join("message.json"), "{oops").unwrap();

        let result = TranslatorRegistry::preloaded(dir.path(), &["en-US".to_string()]);

        assert!(matches!(result, Err(TranslateError::MalformedCatalog { .. })));
    }

    #[test]
    fn test_preloaded_tolerates_absent_catalogs() {
        let dir = TempDir::new().unwrap();

        let registry = TranslatorRegistry::preloaded(dir.path(), &["fr-FR".to_string()]).unwrap();

        assert_eq!(registry.metrics()["fr-FR"].absent_catalogs, 1);
    }
}
