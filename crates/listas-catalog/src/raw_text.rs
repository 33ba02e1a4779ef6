//! Raw capture of each provider's filtered message, for manual review.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use listas_core::ProviderConfig;

use crate::error::CatalogError;
use crate::store::write_atomic;

const HEADER_RULE_WIDTH: usize = 60;

/// `lista_<provider-slug>.txt`
#[must_use]
pub fn raw_text_file_name(provider: &ProviderConfig) -> String {
    format!("lista_{}.txt", provider.slug())
}

/// `#` provenance header followed by the message text.
#[must_use]
pub fn render_raw_text<Tz>(provider: &ProviderConfig, text: &str, extracted_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "# Lista de precios - {}\n# Extraído automáticamente el {}\n# {}\n\n{}\n",
        provider.name,
        extracted_at.format("%d/%m/%Y %H:%M"),
        "=".repeat(HEADER_RULE_WIDTH),
        text.trim_end()
    )
}

/// Writes the capture into `dir`, replacing the previous one.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the file cannot be written.
pub fn write_raw_text<Tz>(
    dir: &Path,
    provider: &ProviderConfig,
    text: &str,
    extracted_at: DateTime<Tz>,
) -> Result<PathBuf, CatalogError>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let path = dir.join(raw_text_file_name(provider));
    write_atomic(&path, &render_raw_text(provider, text, extracted_at))?;
    tracing::debug!(provider = %provider.name, path = %path.display(), "raw text written");
    Ok(path)
}
