//! Tool configuration for `scconf.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                            |
//! |--------------|----------------------------------------------------|
//! | `[manifest]` | Manifest fragments, in precedence order            |
//! | `[sites]`    | Website registry and the configuration directory   |
//!
//! ```toml
//! [manifest]
//! files = ["data/extra-manifest.json", "data/manifest.json"]
//!
//! [sites]
//! websites = "data/websites.json"
//! configs = "data/configs"
//! ```
//!
//! Relative paths resolve against the directory holding `scconf.toml`.
//! Paths given on the command line replace the file's values as-is.

mod error;
mod util;

pub use error::AppConfigError;
pub use util::find_config_file;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::log;

// ============================================================================
// sections
// ============================================================================

/// `[manifest]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSection {
    /// Fragment files; earlier files take precedence.
    pub files: Vec<PathBuf>,
}

impl Default for ManifestSection {
    fn default() -> Self {
        Self {
            files: vec![
                PathBuf::from("data/extra-manifest.json"),
                PathBuf::from("data/manifest.json"),
            ],
        }
    }
}

/// `[sites]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitesSection {
    /// Website registry (JSON list).
    pub websites: PathBuf,
    /// Root of `<website id>/<domain>.json` configuration files.
    pub configs: PathBuf,
}

impl Default for SitesSection {
    fn default() -> Self {
        Self {
            websites: PathBuf::from("data/websites.json"),
            configs: PathBuf::from("data/configs"),
        }
    }
}

/// Command-line replacements for configured paths.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub manifest: Vec<PathBuf>,
    pub websites: Option<PathBuf>,
    pub configs: Option<PathBuf>,
}

// ============================================================================
// root configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub manifest: ManifestSection,
    pub sites: SitesSection,

    /// Where `scconf.toml` was found, if anywhere.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    /// Locate and load the configuration, then apply overrides.
    ///
    /// Without a config file the defaults apply relative to the current
    /// directory.
    pub fn load(config_name: &Path, overrides: &Overrides) -> Result<Self, AppConfigError> {
        let (mut config, root) = match find_config_file(config_name) {
            Some(path) => {
                let config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                crate::debug!("config"; "using {}", path.display());
                (
                    Self {
                        config_path: Some(path),
                        ..config
                    },
                    root,
                )
            }
            None => {
                crate::debug!("config"; "no {} found, using defaults", config_name.display());
                (Self::default(), PathBuf::new())
            }
        };

        config.normalize_paths(&root);
        config.apply_overrides(overrides);
        Ok(config)
    }

    /// Read one config file, warning about unknown fields.
    pub fn from_path(path: &Path) -> Result<Self, AppConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| AppConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .map_err(|err| AppConfigError::Toml(path.to_path_buf(), err))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), toml::de::Error> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Anchor relative paths at `root`.
    fn normalize_paths(&mut self, root: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        };
        self.manifest.files.iter_mut().for_each(anchor);
        anchor(&mut self.sites.websites);
        anchor(&mut self.sites.configs);
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        if !overrides.manifest.is_empty() {
            self.manifest.files.clone_from(&overrides.manifest);
        }
        if let Some(websites) = &overrides.websites {
            self.sites.websites.clone_from(websites);
        }
        if let Some(configs) = &overrides.configs {
            self.sites.configs.clone_from(configs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full() {
        let (config, ignored) = AppConfig::parse_with_ignored(
            r#"
            [manifest]
            files = ["a.json", "b.json"]

            [sites]
            websites = "sites.json"
            configs = "stored"
            "#,
        )
        .unwrap();

        assert!(ignored.is_empty());
        assert_eq!(config.manifest.files, [PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(config.sites.websites, PathBuf::from("sites.json"));
        assert_eq!(config.sites.configs, PathBuf::from("stored"));
    }

    #[test]
    fn test_partial_uses_defaults() {
        let (config, _) = AppConfig::parse_with_ignored("[sites]\nconfigs = \"out\"").unwrap();
        assert_eq!(config.manifest, ManifestSection::default());
        assert_eq!(config.sites.websites, PathBuf::from("data/websites.json"));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) = AppConfig::parse_with_ignored(
            "[manifest]\nfiles = []\nwatch = true\n\n[theme]\nname = \"x\"",
        )
        .unwrap();
        assert_eq!(ignored, ["manifest.watch", "theme"]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(AppConfig::parse_with_ignored("[manifest\nfiles = 1").is_err());
    }

    #[test]
    fn test_from_path_and_normalize() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scconf.toml");
        fs::write(&path, "[manifest]\nfiles = [\"m.json\", \"/abs/n.json\"]").unwrap();

        let mut config = AppConfig::from_path(&path).unwrap();
        config.normalize_paths(dir.path());

        assert_eq!(
            config.manifest.files,
            [dir.path().join("m.json"), PathBuf::from("/abs/n.json")]
        );
        assert_eq!(config.sites.configs, dir.path().join("data/configs"));
    }

    #[test]
    fn test_overrides_replace() {
        let mut config = AppConfig::default();
        config.apply_overrides(&Overrides {
            manifest: vec![PathBuf::from("only.json")],
            websites: None,
            configs: Some(PathBuf::from("elsewhere")),
        });
        assert_eq!(config.manifest.files, [PathBuf::from("only.json")]);
        assert_eq!(config.sites.websites, PathBuf::from("data/websites.json"));
        assert_eq!(config.sites.configs, PathBuf::from("elsewhere"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AppConfig::from_path(Path::new("/nonexistent/scconf.toml")).unwrap_err();
        assert!(matches!(err, AppConfigError::Io(..)));
    }
}
