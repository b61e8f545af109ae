//! Manifest fragment loading.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::Manifest;

/// Errors raised while reading manifest fragments.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("manifest `{0}` is not a valid entry list")]
    Parse(PathBuf, #[source] serde_json::Error),
}

impl Manifest {
    /// Parse a manifest fragment from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Read one manifest fragment from disk.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let content =
            fs::read_to_string(path).map_err(|err| ManifestError::Io(path.to_path_buf(), err))?;
        Self::from_json_str(&content).map_err(|err| ManifestError::Parse(path.to_path_buf(), err))
    }
}

/// Load fragments in precedence order and concatenate them.
///
/// Earlier fragments come first, so they win group-id conflicts under the
/// indexer's first-declaration rule.
pub fn load_fragments<P: AsRef<Path>>(paths: &[P]) -> Result<Manifest, ManifestError> {
    let mut manifest = Manifest::default();
    for path in paths {
        let fragment = Manifest::from_path(path.as_ref())?;
        crate::debug!(
            "manifest";
            "{} entries from {}",
            fragment.len(),
            path.as_ref().display()
        );
        manifest.extend(fragment);
    }
    Ok(manifest)
}
