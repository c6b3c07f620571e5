//! Catalog store: lazily loads and caches one JSON tree per (locale, group).

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

use crate::i18n::bundled;
use crate::i18n::metrics::CatalogMetrics;
use crate::i18n::TranslateError;

/// Outcome of loading a catalog.
///
/// `Absent` means no file exists for the pair at all; it is distinct from a
/// key that is missing inside a catalog that does exist.
#[derive(Debug, Clone)]
pub enum CatalogLookup {
    Found(Arc<Value>),
    Absent,
}

impl CatalogLookup {
    pub fn is_absent(&self) -> bool {
        matches!(self, CatalogLookup::Absent)
    }
}

type CacheKey = (String, String);

/// Loads `{base_path}/{locale}/{group}.json`, falling back to the bundled
/// catalog for the same pair.
///
/// Once an entry is cached (including `Absent`) the store never touches the
/// disk for that pair again. Two threads racing on a cold entry may both
/// parse the file; the last insert wins and both results are identical.
#[derive(Debug)]
pub struct CatalogStore {
    base_path: PathBuf,
    entries: RwLock<HashMap<CacheKey, CatalogLookup>>,
    metrics: CatalogMetrics,
}

impl CatalogStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            entries: RwLock::new(HashMap::new()),
            metrics: CatalogMetrics::new(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn metrics(&self) -> &CatalogMetrics {
        &self.metrics
    }

    /// Path of the application-supplied catalog for a pair.
    pub fn catalog_path(&self, locale: &str, group: &str) -> PathBuf {
        self.base_path.join(locale).join(format!("{}.json", group))
    }

    /// Number of cached entries, `Absent` ones included.
    pub fn cached_len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Load the catalog for `(locale, group)`.
    ///
    /// # Errors
    /// `MalformedCatalog` if the file is not valid JSON, `CatalogIo` if it
    /// exists but cannot be read. Neither outcome is cached.
    pub fn load(&self, locale: &str, group: &str) -> Result<CatalogLookup, TranslateError> {
        let key = (locale.to_string(), group.to_string());

        if let Some(entry) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            self.metrics.record_cache_hit();
            return Ok(entry.clone());
        }

        let entry = self.read_catalog(locale, group)?;
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry.clone());

        Ok(entry)
    }

    fn read_catalog(&self, locale: &str, group: &str) -> Result<CatalogLookup, TranslateError> {
        if !is_path_segment(locale) || !is_path_segment(group) {
            debug!(locale, group, "Rejected catalog name outside the locale directory");
            self.metrics.record_absent_catalog();
            return Ok(CatalogLookup::Absent);
        }

        let path = self.catalog_path(locale, group);
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let tree = parse_catalog(&raw, &path)?;
                self.metrics.record_disk_load();
                debug!(path = %path.display(), "Loaded catalog");
                Ok(CatalogLookup::Found(Arc::new(tree)))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => match bundled::find(locale, group) {
                Some(catalog) => {
                    let tree = parse_catalog(catalog.source, &catalog.display_path())?;
                    self.metrics.record_bundled_load();
                    debug!(locale, group, "Loaded bundled catalog");
                    Ok(CatalogLookup::Found(Arc::new(tree)))
                }
                None => {
                    self.metrics.record_absent_catalog();
                    debug!(path = %path.display(), "No catalog on disk or bundled");
                    Ok(CatalogLookup::Absent)
                }
            },
            Err(source) => Err(TranslateError::CatalogIo { path, source }),
        }
    }
}

fn parse_catalog(raw: &str, path: &Path) -> Result<Value, TranslateError> {
    serde_json::from_str(raw).map_err(|source| TranslateError::MalformedCatalog {
        path: path.to_path_buf(),
        source,
    })
}

/// A single, non-traversing path component.
fn is_path_segment(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
