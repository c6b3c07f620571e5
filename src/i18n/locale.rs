//! Locale settings and per-request locale negotiation.

use anyhow::{bail, Result};

use crate::i18n::bundled::BUNDLED_LOCALES;

/// Supported locales plus the one to use when a request asks for none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    supported: Vec<String>,
    fallback: String,
}

/// Where a request may name its locale, in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleSources<'a> {
    /// Raw `Accept-Language` header value
    pub accept_language: Option<&'a str>,

    /// `locale` path parameter
    pub path: Option<&'a str>,

    /// `locale` query parameter
    pub query: Option<&'a str>,
}

impl LocaleSettings {
    /// Create settings from a list of locale codes.
    ///
    /// # Returns
    /// * `Ok(LocaleSettings)` if the list is non-empty and contains `fallback`
    /// * `Err` otherwise
    pub fn new<I, S>(supported: I, fallback: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supported: Vec<String> = supported
            .into_iter()
            .map(|code| {
                let code: String = code.into();
                code.trim().to_string()
            })
            .filter(|code| !code.is_empty())
            .collect();

        if supported.is_empty() {
            bail!("At least one locale must be supported");
        }
        if !supported.iter().any(|code| code == fallback) {
            bail!(
                "Fallback locale '{}' is not in the supported list ({})",
                fallback,
                supported.join(", ")
            );
        }

        Ok(Self {
            supported,
            fallback: fallback.to_string(),
        })
    }

    pub fn supported(&self) -> &[String] {
        &self.supported
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.canonical(code).is_some()
    }

    /// Pick the locale for a request.
    ///
    /// The first non-empty source wins, even when it names an unsupported
    /// locale; in that case the fallback is used rather than consulting the
    /// next source. For `Accept-Language` the first listed tag that is
    /// supported is taken. Quality values do not reorder tags, but `q=0` tags
    /// are skipped.
    pub fn negotiate(&self, sources: LocaleSources<'_>) -> String {
        let selected = if let Some(header) = non_empty(sources.accept_language) {
            self.pick_accept_language(header)
        } else if let Some(value) = non_empty(sources.path).or(non_empty(sources.query)) {
            self.canonical(value)
        } else {
            None
        };

        selected.unwrap_or(self.fallback.as_str()).to_string()
    }

    fn pick_accept_language(&self, header: &str) -> Option<&str> {
        header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                let refused = pieces.any(|param| is_zero_quality(param.trim()));
                (!tag.is_empty() && !refused).then_some(tag)
            })
            .find_map(|tag| self.canonical(tag))
    }

    /// The configured spelling of `code`, matched case-insensitively.
    fn canonical(&self, code: &str) -> Option<&str> {
        self.supported
            .iter()
            .find(|supported| supported.eq_ignore_ascii_case(code))
            .map(String::as_str)
    }
}

/// `q=0` marks a language as not acceptable.
fn is_zero_quality(param: &str) -> bool {
    param
        .strip_prefix("q=")
        .and_then(|q| q.trim().parse::<f32>().ok())
        .is_some_and(|q| q == 0.0)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            supported: BUNDLED_LOCALES.iter().map(|code| code.to_string()).collect(),
            fallback: BUNDLED_LOCALES[0].to_string(),
        }
    }
}
