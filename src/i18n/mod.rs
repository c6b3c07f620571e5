//! Translation of validation messages.
//!
//! # Architecture
//!
//! - `catalog`: lazily loaded, cached JSON catalogs per (locale, group)
//! - `bundled`: default catalogs compiled into the crate
//! - `template`: turns a rendered validation message back into its template key
//! - `translator`: resolves dotted keys and interpolates `{name}` placeholders
//! - `registry`: one shared translator per locale
//! - `locale`: supported locales and per-request negotiation
//! - `validator`: authoring checks for catalogs
//! - `metrics`: catalog cache counters
//!
//! # Example
//!
//! ```rust,ignore
//! use validation_i18n::i18n::{derive_template, message_key, DerivedKey, Translator};
//!
//! let translator = Translator::new("zh-TW", "locales");
//! if let DerivedKey::Template(fragment) = derive_template(&error.msg, error.ctx.as_ref()) {
//!     let msg = translator.translate(&message_key(&fragment), &ctx)?;
//! }
//! ```

pub mod bundled;
mod catalog;
mod error;
mod locale;
mod metrics;
mod registry;
mod template;
mod translator;
mod validator;

pub use catalog::{CatalogLookup, CatalogStore};
pub use error::TranslateError;
pub use locale::{LocaleSettings, LocaleSources};
pub use metrics::{CatalogMetrics, MetricsReport};
pub use registry::TranslatorRegistry;
pub use template::{
    derive_template, is_opaque, message_key, render_value, DerivedKey, MESSAGE_GROUP,
    OPAQUE_MESSAGES,
};
pub use translator::Translator;
pub use validator::{CatalogIssue, CatalogReport, CatalogValidator};
