//! Default catalogs compiled into the binary.
//!
//! The store falls back to these when an application does not ship its own
//! `{locale}/{group}.json`. The same files can be written to disk with the
//! `export-locales` binary so applications can start from them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::info;

/// A catalog file shipped with the crate.
#[derive(Debug, Clone, Copy)]
pub struct BundledCatalog {
    pub locale: &'static str,
    pub group: &'static str,
    pub source: &'static str,
}

/// Locales that have a bundled default catalog.
pub const BUNDLED_LOCALES: [&str; 3] = ["zh-TW", "en-US", "ja-JP"];

/// The locale other bundled catalogs are checked against.
pub const REFERENCE_LOCALE: &str = "en-US";

const CATALOGS: &[BundledCatalog] = &[
    BundledCatalog {
        locale: "zh-TW",
        group: "message",
        source: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/zh-TW/message.json")),
    },
    BundledCatalog {
        locale: "en-US",
        group: "message",
        source: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/en-US/message.json")),
    },
    BundledCatalog {
        locale: "ja-JP",
        group: "message",
        source: include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/locales/ja-JP/message.json")),
    },
];

/// All bundled catalogs.
pub fn all() -> &'static [BundledCatalog] {
    CATALOGS
}

/// Look up the bundled catalog for a locale/group pair.
pub fn find(locale: &str, group: &str) -> Option<&'static BundledCatalog> {
    CATALOGS
        .iter()
        .find(|catalog| catalog.locale == locale && catalog.group == group)
}

pub fn is_bundled_locale(locale: &str) -> bool {
    BUNDLED_LOCALES.contains(&locale)
}

impl BundledCatalog {
    /// Pseudo-path used in logs and error messages for bundled content.
    pub fn display_path(&self) -> PathBuf {
        PathBuf::from(format!("<bundled>/{}/{}.json", self.locale, self.group))
    }
}

/// Write bundled catalogs below `target`.
///
/// With `locale` set, only that locale is exported into `target/<locale>/`.
/// The destination directory must not exist yet; existing translations are
/// never overwritten.
///
/// # Returns
/// The paths of every file written.
pub fn export_to(target: &Path, locale: Option<&str>) -> Result<Vec<PathBuf>> {
    let destination = match locale {
        Some(code) => {
            if !is_bundled_locale(code) {
                bail!(
                    "Locale {} is not supported. Supported locales are: {}",
                    code,
                    BUNDLED_LOCALES.join(", ")
                );
            }
            target.join(code)
        }
        None => target.to_path_buf(),
    };

    if destination.exists() {
        bail!(
            "Destination path {} already exists. Please remove it or choose a different destination path.",
            destination.display()
        );
    }

    let mut written = Vec::new();
    for catalog in CATALOGS
        .iter()
        .filter(|catalog| locale.is_none_or(|code| catalog.locale == code))
    {
        let dir = match locale {
            Some(_) => destination.clone(),
            None => destination.join(catalog.locale),
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(format!("{}.json", catalog.group));
        fs::write(&path, catalog.source)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Exported catalog");
        written.push(path);
    }

    Ok(written)
}
