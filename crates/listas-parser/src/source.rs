//! Upstream message sources.
//!
//! The pipeline only needs two calls from a source: the candidate messages
//! a provider posted on a given day, and the full text behind a handle when
//! a capture turned out truncated.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate, Utc};
use listas_core::ProviderConfig;

use crate::error::SourceError;
use crate::types::{MessageHandle, RawMessage};

const MESSAGE_EXT: &str = "txt";
const FULL_TEXT_SUFFIX: &str = ".full.txt";

pub trait MessageSource {
    /// Messages `provider` posted on `day`. An empty list is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the source cannot be read.
    fn fetch_candidates(
        &self,
        provider: &ProviderConfig,
        day: NaiveDate,
    ) -> Result<Vec<RawMessage>, SourceError>;

    /// Re-reads the message behind `handle`, expanded if the source can.
    /// `None` means the source has nothing better to offer.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the handle is unknown or the read fails.
    fn fetch_full_text(
        &self,
        provider: &ProviderConfig,
        handle: &MessageHandle,
    ) -> Result<Option<String>, SourceError>;
}

/// Reads exported chat messages from `<root>/<provider-slug>/*.txt`.
///
/// A file whose name starts with `YYYY-MM-DD` belongs to that day; any
/// other file belongs to the local date of its modification time. A sibling
/// `<stem>.full.txt` holds the expanded capture of a truncated message.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn provider_dir(&self, provider: &ProviderConfig) -> PathBuf {
        self.root.join(provider.slug())
    }
}

impl MessageSource for DirectorySource {
    fn fetch_candidates(
        &self,
        provider: &ProviderConfig,
        day: NaiveDate,
    ) -> Result<Vec<RawMessage>, SourceError> {
        let dir = self.provider_dir(provider);
        if !dir.is_dir() {
            tracing::debug!(provider = %provider.name, dir = %dir.display(), "no inbox directory");
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| io_error(&dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&dir, e))?.path();
            if is_message_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut messages = Vec::new();
        for path in files {
            let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => DateTime::<Utc>::from(modified),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable message");
                    continue;
                }
            };

            if message_day(&path, modified) != day {
                continue;
            }

            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let text = match read_message(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable message");
                    continue;
                }
            };

            messages.push(RawMessage {
                provider: provider.name.clone(),
                handle: MessageHandle::new(file_name),
                text,
                retrieved_at: modified,
            });
        }

        tracing::debug!(
            provider = %provider.name,
            %day,
            candidates = messages.len(),
            "directory source scanned"
        );
        Ok(messages)
    }

    fn fetch_full_text(
        &self,
        provider: &ProviderConfig,
        handle: &MessageHandle,
    ) -> Result<Option<String>, SourceError> {
        let name = handle.as_str();
        let is_plain_name = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != ".."
            && Path::new(name).extension().and_then(|e| e.to_str()) == Some(MESSAGE_EXT);
        if !is_plain_name {
            return Err(SourceError::UnknownHandle {
                handle: name.to_string(),
            });
        }

        let original = self.provider_dir(provider).join(name);
        let expanded = original.with_file_name(format!(
            "{}{FULL_TEXT_SUFFIX}",
            name.trim_end_matches(".txt")
        ));

        if expanded.is_file() {
            return read_message(&expanded).map(Some);
        }
        if original.is_file() {
            return read_message(&original).map(Some);
        }
        Ok(None)
    }
}

fn is_message_file(path: &Path) -> bool {
    let is_txt = path.extension().and_then(|e| e.to_str()) == Some(MESSAGE_EXT);
    let is_expansion = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(FULL_TEXT_SUFFIX));
    path.is_file() && is_txt && !is_expansion
}

fn message_day(path: &Path, modified: DateTime<Utc>) -> NaiveDate {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.get(..10))
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .unwrap_or_else(|| modified.with_timezone(&Local).date_naive())
}

fn read_message(path: &Path) -> Result<String, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

fn io_error(path: &Path, source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: path.display().to_string(),
        source,
    }
}
