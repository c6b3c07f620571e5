//! Catalog validation.
//!
//! Checks a locale's catalog against a reference catalog so that authoring
//! mistakes surface before a request trips over them. The important one is a
//! translated template naming a placeholder the reference does not: the error
//! context never carries that name, so interpolation would fail at runtime.

use regex::Regex;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::OnceLock;

/// One finding about a candidate catalog, keyed by dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// The template names placeholders the reference template does not.
    UnknownPlaceholder { key: String, names: Vec<String> },
    /// The leaf is a number, bool, null or array.
    NonStringLeaf { key: String, found: String },
    /// The reference has a key the candidate lacks.
    MissingKey { key: String },
    /// The candidate has a key the reference lacks.
    ExtraKey { key: String },
    /// The key contains `.` and can never be addressed.
    DottedKey { key: String },
}

impl CatalogIssue {
    /// Errors break interpolation at runtime; everything else only degrades
    /// to the "not found" text.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CatalogIssue::UnknownPlaceholder { .. } | CatalogIssue::NonStringLeaf { .. }
        )
    }

    pub fn key(&self) -> &str {
        match self {
            CatalogIssue::UnknownPlaceholder { key, .. }
            | CatalogIssue::NonStringLeaf { key, .. }
            | CatalogIssue::MissingKey { key }
            | CatalogIssue::ExtraKey { key }
            | CatalogIssue::DottedKey { key } => key,
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::UnknownPlaceholder { key, names } => write!(
                f,
                "Key '{}' uses placeholders {:?} that the reference does not provide",
                key, names
            ),
            CatalogIssue::NonStringLeaf { key, found } => {
                write!(f, "Key '{}' holds {} instead of a string", key, found)
            }
            CatalogIssue::MissingKey { key } => write!(f, "Key '{}' is missing a translation", key),
            CatalogIssue::ExtraKey { key } => {
                write!(f, "Key '{}' is not in the reference catalog", key)
            }
            CatalogIssue::DottedKey { key } => {
                write!(f, "Key '{}' contains '.' and cannot be looked up", key)
            }
        }
    }
}

/// Everything [`CatalogValidator::validate`] found, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogReport {
    issues: Vec<CatalogIssue>,
}

impl CatalogReport {
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    pub fn errors(&self) -> impl Iterator<Item = &CatalogIssue> {
        self.issues.iter().filter(|issue| issue.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CatalogIssue> {
        self.issues.iter().filter(|issue| !issue.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Record `issue` unless the same one is already present.
    fn record(&mut self, issue: CatalogIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }
}

/// Validator for catalog trees.
pub struct CatalogValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CatalogValidator {
    /// Validate `candidate` against `reference`.
    ///
    /// Errors:
    /// - a template uses a placeholder the reference template lacks
    /// - a leaf is not a string
    ///
    /// Warnings:
    /// - a reference key is missing from the candidate
    /// - the candidate has a key the reference does not
    /// - a key contains `.` and can never be addressed
    pub fn validate(reference: &Value, candidate: &Value) -> CatalogReport {
        let mut report = CatalogReport::default();

        let reference_leaves = Self::flatten(reference, &mut report);
        let candidate_leaves = Self::flatten(candidate, &mut report);

        for (path, template) in &candidate_leaves {
            let Some(expected) = reference_leaves.get(path) else {
                report.record(CatalogIssue::ExtraKey { key: path.clone() });
                continue;
            };

            let allowed = Self::extract_placeholders(expected);
            let unknown: Vec<String> = Self::extract_placeholders(template)
                .into_iter()
                .filter(|name| !allowed.contains(name))
                .collect();
            if !unknown.is_empty() {
                report.record(CatalogIssue::UnknownPlaceholder {
                    key: path.clone(),
                    names: unknown,
                });
            }
        }

        for path in reference_leaves.keys() {
            if !candidate_leaves.contains_key(path) {
                report.record(CatalogIssue::MissingKey { key: path.clone() });
            }
        }

        report
    }

    /// Collect string leaves keyed by their dotted path.
    fn flatten(tree: &Value, report: &mut CatalogReport) -> BTreeMap<String, String> {
        let mut leaves = BTreeMap::new();
        Self::flatten_into(tree, String::new(), &mut leaves, report);
        leaves
    }

    fn flatten_into(
        node: &Value,
        prefix: String,
        leaves: &mut BTreeMap<String, String>,
        report: &mut CatalogReport,
    ) {
        match node {
            Value::Object(map) => {
                for (key, child) in map {
                    if key.contains('.') {
                        report.record(CatalogIssue::DottedKey { key: key.clone() });
                    }
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    Self::flatten_into(child, path, leaves, report);
                }
            }
            Value::String(template) => {
                leaves.insert(prefix, template.clone());
            }
            other => report.record(CatalogIssue::NonStringLeaf {
                key: prefix,
                found: other.to_string(),
            }),
        }
    }

    /// Extract the `{name}` placeholders of a template, ignoring `{{` escapes.
    fn extract_placeholders(template: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX
            .get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

        let unescaped = template.replace("{{", "").replace("}}", "");
        regex
            .captures_iter(&unescaped)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
