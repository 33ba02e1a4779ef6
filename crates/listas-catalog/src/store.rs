//! JSON persistence for the two catalog views.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::error::CatalogError;
use crate::legacy::{PrivateDocument, PublicDocument};
use crate::merge::CatalogMerger;
use crate::types::{PrivateCatalog, PublicCatalog};

#[derive(Debug, Clone)]
pub struct CatalogStore {
    public_path: PathBuf,
    private_path: PathBuf,
}

impl CatalogStore {
    #[must_use]
    pub fn new(public_path: impl Into<PathBuf>, private_path: impl Into<PathBuf>) -> Self {
        Self {
            public_path: public_path.into(),
            private_path: private_path.into(),
        }
    }

    #[must_use]
    pub fn public_path(&self) -> &Path {
        &self.public_path
    }

    #[must_use]
    pub fn private_path(&self) -> &Path {
        &self.private_path
    }

    /// Loads both views. A missing file is an empty catalog; legacy shapes
    /// are migrated.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when a file exists but cannot be read
    /// and [`CatalogError::Malformed`] when it is not a catalog document.
    pub fn load(&self) -> Result<(PublicCatalog, PrivateCatalog), CatalogError> {
        let public = read_document::<PublicDocument>(&self.public_path)?
            .map(PublicDocument::into_catalog)
            .unwrap_or_default();
        let private = read_document::<PrivateDocument>(&self.private_path)?
            .map(PrivateDocument::into_catalog)
            .unwrap_or_default();

        tracing::debug!(
            public = public.products.len(),
            private = private.products.len(),
            "catalog loaded"
        );
        Ok((public, private))
    }

    /// Like [`CatalogStore::load`], then re-elects every published entry with
    /// `merger` so the public prices match the private view.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogStore::load`].
    pub fn load_reconciled(
        &self,
        merger: &CatalogMerger,
    ) -> Result<(PublicCatalog, PrivateCatalog), CatalogError> {
        let (mut public, mut private) = self.load()?;
        merger.reconcile(&mut public, &mut private);
        Ok((public, private))
    }

    /// Writes both views. Both documents are serialized before either file
    /// is touched, each lands in a `.tmp` sibling, and the renames happen
    /// last.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Serialize`] or [`CatalogError::Io`].
    pub fn save(&self, public: &PublicCatalog, private: &PrivateCatalog) -> Result<(), CatalogError> {
        let public_json = serde_json::to_string_pretty(public).map_err(CatalogError::Serialize)?;
        let private_json = serde_json::to_string_pretty(private).map_err(CatalogError::Serialize)?;

        let public_tmp = stage(&self.public_path, &public_json)?;
        let private_tmp = match stage(&self.private_path, &private_json) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = std::fs::remove_file(&public_tmp);
                return Err(e);
            }
        };

        if let Err(e) = std::fs::rename(&public_tmp, &self.public_path) {
            let _ = std::fs::remove_file(&public_tmp);
            let _ = std::fs::remove_file(&private_tmp);
            return Err(CatalogError::io(&self.public_path, e));
        }
        std::fs::rename(&private_tmp, &self.private_path).map_err(|e| {
            let _ = std::fs::remove_file(&private_tmp);
            CatalogError::io(&self.private_path, e)
        })?;

        tracing::info!(
            public = %self.public_path.display(),
            private = %self.private_path.display(),
            products = public.products.len(),
            "catalog saved"
        );
        Ok(())
    }
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CatalogError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "catalog file missing; starting empty");
            return Ok(None);
        }
        Err(e) => return Err(CatalogError::io(path, e)),
    };

    serde_json::from_str(content.trim_start_matches('\u{feff}'))
        .map(Some)
        .map_err(|source| CatalogError::Malformed {
            path: path.display().to_string(),
            source,
        })
}

/// Path of the staging sibling for `path`.
pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `contents` to the staging sibling of `path`, creating parent
/// directories as needed.
pub(crate) fn stage(path: &Path, contents: &str) -> Result<PathBuf, CatalogError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, contents).map_err(|e| CatalogError::io(&tmp, e))?;
    Ok(tmp)
}

/// Stages and renames a single text file into place.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), CatalogError> {
    let tmp = stage(path, contents)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        CatalogError::io(path, e)
    })
}
