use std::path::PathBuf;

use thiserror::Error;

/// Hard failures of the translation pipeline.
///
/// A missing catalog file or a missing key is *not* an error: those resolve
/// to a "Key ... not found" placeholder string. The variants below indicate a
/// broken deployment or a catalog that disagrees with the error context.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("catalog {} is not valid JSON: {source}", path.display())]
    MalformedCatalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read catalog {}: {source}", path.display())]
    CatalogIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template for {key} references {{{name}}} which is not in the error context")]
    MissingPlaceholder { key: String, name: String },

    #[error("template for {key} is malformed: {reason}")]
    MalformedTemplate { key: String, reason: &'static str },
}
