//! Copy the bundled translation catalogs to disk so they can be customized.
//!
//! Usage:
//!   cargo run --bin export-locales <target_path>                 # all locales
//!   cargo run --bin export-locales <target_path> --locale ja-JP  # one locale
//!   cargo run --bin export-locales <target_path> --check         # also validate
//!
//! The destination must not exist yet; nothing is ever overwritten.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use validation_i18n::i18n::bundled::{self, REFERENCE_LOCALE};
use validation_i18n::i18n::CatalogValidator;

const USAGE: &str = "Usage: export-locales <target_path> [--locale <locale>] [--check]";

#[derive(Debug, PartialEq)]
struct Args {
    target: PathBuf,
    locale: Option<String>,
    check: bool,
}

/// Parse command-line arguments, program name excluded.
fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut target = None;
    let mut locale = None;
    let mut check = false;
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--locale" => {
                locale = Some(iter.next().context("--locale requires a value")?);
            }
            "--check" => check = true,
            flag if flag.starts_with("--") => bail!("Unknown option {}", flag),
            path => {
                if target.is_some() {
                    bail!("Only one target path may be given");
                }
                target = Some(PathBuf::from(path));
            }
        }
    }

    let Some(target) = target else {
        bail!(USAGE);
    };

    Ok(Args {
        target,
        locale,
        check,
    })
}

/// Validate one exported file against the bundled reference catalog.
///
/// Returns `false` if the catalog has errors.
fn check_catalog(path: &Path) -> Result<bool> {
    let group = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("Exported file has no name")?;
    let reference = bundled::find(REFERENCE_LOCALE, group)
        .with_context(|| format!("No reference catalog for group {}", group))?;

    let reference: Value = serde_json::from_str(reference.source)
        .context("Bundled reference catalog is not valid JSON")?;
    let raw =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let candidate: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let report = CatalogValidator::validate(&reference, &candidate);
    for warning in report.warnings() {
        warn!(path = %path.display(), "{}", warning);
    }
    for problem in report.errors() {
        error!(path = %path.display(), "{}", problem);
    }

    Ok(!report.has_errors())
}

/// Validate every file in `paths`; all are checked even after a failure.
fn check_exported(paths: &[PathBuf]) -> Result<bool> {
    let mut clean = true;
    for path in paths {
        clean &= check_catalog(path)?;
    }
    Ok(clean)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("export_locales=info".parse()?)
                .add_directive("validation_i18n=info".parse()?),
        )
        .init();

    let args = parse_args(std::env::args().skip(1))?;

    info!(target = %args.target.display(), locale = ?args.locale, "Exporting bundled catalogs");
    let written = bundled::export_to(&args.target, args.locale.as_deref())?;
    info!("✓ Exported {} catalogs to {}", written.len(), args.target.display());

    if args.check {
        if !check_exported(&written)? {
            bail!("Exported catalogs failed validation");
        }
        info!("✓ All exported catalogs passed validation");
    }

    Ok(())
}
