//! Websites, domains and where their configurations live.
//!
//! A configuration is edited for one `(website, domain)` pair. The registry
//! is a JSON list of websites; existing configurations are plain JSON files
//! under `<configs>/<website id>/<domain>.json`.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::store::Persist;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("unknown website `{0}`")]
    UnknownWebsite(String),

    #[error("website `{website}` has no domain `{domain}`")]
    UnknownDomain { website: String, domain: String },

    #[error("website `{0}` has no domains")]
    NoDomains(String),

    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("`{0}` is not valid JSON")]
    Json(PathBuf, #[source] serde_json::Error),
}

// ============================================================================
// Registry types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SiteType {
    Standard,
    Advanced,
}

impl std::fmt::Display for SiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Standard => "STANDARD",
            Self::Advanced => "ADVANCED",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    #[serde(default)]
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Website {
    pub id: String,
    pub name: String,
    pub sitetype: SiteType,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl Website {
    /// The domain flagged primary, else the first one listed.
    pub fn primary_domain(&self) -> Option<&Domain> {
        self.domains
            .iter()
            .find(|d| d.primary)
            .or_else(|| self.domains.first())
    }

    pub fn domain(&self, name: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.name == name)
    }
}

/// All known websites, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteRegistry {
    websites: Vec<Website>,
}

impl SiteRegistry {
    pub fn new(websites: Vec<Website>) -> Self {
        Self { websites }
    }

    pub fn from_path(path: &Path) -> Result<Self, SiteError> {
        let content =
            std::fs::read_to_string(path).map_err(|err| SiteError::Io(path.to_path_buf(), err))?;
        serde_json::from_str(&content).map_err(|err| SiteError::Json(path.to_path_buf(), err))
    }

    pub fn websites(&self) -> &[Website] {
        &self.websites
    }

    pub fn website(&self, id: &str) -> Option<&Website> {
        self.websites.iter().find(|w| w.id == id)
    }

    /// Pick a website and domain. Without a domain the primary one is used.
    pub fn resolve(&self, website: &str, domain: Option<&str>) -> Result<Selection, SiteError> {
        let site = self
            .website(website)
            .ok_or_else(|| SiteError::UnknownWebsite(website.to_string()))?;

        let chosen = match domain {
            Some(name) => site.domain(name).ok_or_else(|| SiteError::UnknownDomain {
                website: site.id.clone(),
                domain: name.to_string(),
            })?,
            None => site
                .primary_domain()
                .ok_or_else(|| SiteError::NoDomains(site.id.clone()))?,
        };

        Ok(Selection {
            website: site.clone(),
            domain: chosen.clone(),
        })
    }
}

// ============================================================================
// Selection
// ============================================================================

/// The `(website, domain)` pair being configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub website: Website,
    pub domain: Domain,
}

impl Selection {
    /// Location of this selection's configuration under `configs`.
    pub fn config_path(&self, configs: &Path) -> PathBuf {
        configs
            .join(&self.website.id)
            .join(format!("{}.json", self.domain.name))
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.website.name, self.domain.name)
    }
}

// ============================================================================
// Configuration files
// ============================================================================

/// Read an existing configuration. A missing file is an empty object.
pub async fn load_configuration(path: &Path) -> Result<Value, SiteError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            crate::debug!("site"; "no configuration at {}, starting empty", path.display());
            return Ok(Value::Object(Default::default()));
        }
        Err(err) => return Err(SiteError::Io(path.to_path_buf(), err)),
    };
    serde_json::from_str(&content).map_err(|err| SiteError::Json(path.to_path_buf(), err))
}

/// Persists configurations as pretty-printed JSON files.
#[derive(Debug, Clone)]
pub struct FilePersist {
    path: PathBuf,
}

impl FilePersist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persist for FilePersist {
    type Error = SiteError;

    async fn persist(&self, config: &Value) -> Result<(), SiteError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| SiteError::Io(parent.to_path_buf(), err))?;
        }

        let mut content = serde_json::to_string_pretty(config)
            .map_err(|err| SiteError::Json(self.path.clone(), err))?;
        content.push('\n');

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|err| SiteError::Io(self.path.clone(), err))
    }
}
