use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::i18n::bundled::BUNDLED_LOCALES;

pub const DEFAULT_LOCALE_PATH: &str = "locales";
pub const DEFAULT_FALLBACK_LOCALE: &str = "zh-TW";
pub const DEFAULT_PORT: u16 = 8080;

/// Settings for the validation translator.
#[derive(Debug, Clone, PartialEq)]
pub struct I18nConfig {
    /// Root directory holding `<locale>/<group>.json` catalogs.
    pub locale_path: PathBuf,
    /// Locales a request may select, in negotiation order.
    pub locales: Vec<String>,
    /// Locale used when the request names none or an unsupported one.
    pub fallback_locale: String,
    /// Build every translator at startup instead of on first use.
    pub bind_to_lifespan: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locale_path: PathBuf::from(DEFAULT_LOCALE_PATH),
            locales: BUNDLED_LOCALES.iter().map(|l| l.to_string()).collect(),
            fallback_locale: DEFAULT_FALLBACK_LOCALE.to_string(),
            bind_to_lifespan: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub i18n: I18nConfig,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = I18nConfig::default();

        let locales = match std::env::var("I18N_LOCALES") {
            Ok(raw) => parse_locales(&raw),
            Err(_) => defaults.locales,
        };
        if locales.is_empty() {
            bail!("I18N_LOCALES must name at least one locale");
        }

        let bind_to_lifespan = match std::env::var("I18N_BIND_TO_LIFESPAN") {
            Ok(raw) => parse_flag(&raw)
                .with_context(|| format!("I18N_BIND_TO_LIFESPAN has invalid value '{}'", raw))?,
            Err(_) => defaults.bind_to_lifespan,
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT has invalid value '{}'", raw))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            i18n: I18nConfig {
                locale_path: std::env::var("I18N_LOCALE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.locale_path),
                locales,
                fallback_locale: std::env::var("I18N_FALLBACK_LOCALE")
                    .map(|v| v.trim().to_string())
                    .unwrap_or(defaults.fallback_locale),
                bind_to_lifespan,
            },
            port,
        })
    }
}

/// Comma-separated locale list; blanks are dropped.
fn parse_locales(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
