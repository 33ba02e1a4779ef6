use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog I/O failed at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file {path} is not a recognized catalog document: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write spreadsheet: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl CatalogError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
