//! Command-line interface module.

mod args;
pub mod edit;
pub mod sites;
pub mod tree;
pub mod validate;

pub use args::{Cli, Commands, SiteArgs};

use anyhow::{Context, Result};
use scconf::config::AppConfig;
use scconf::manifest::{self, Manifest};
use scconf::session::EditorSession;
use scconf::site::SiteRegistry;

/// Everything a command needs besides its own arguments.
pub struct Workspace {
    pub config: AppConfig,
    pub registry: SiteRegistry,
}

impl Workspace {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = AppConfig::load(&cli.config, &cli.overrides())?;
        let registry = SiteRegistry::from_path(&config.sites.websites)
            .context("failed to load the website registry")?;
        Ok(Self { config, registry })
    }

    pub fn manifest(&self) -> Result<Manifest> {
        manifest::load_fragments(&self.config.manifest.files).context("failed to load the manifest")
    }

    /// Resolve the selection and open an editing session on it.
    pub async fn open(&self, site: &SiteArgs) -> Result<EditorSession> {
        let selection = self
            .registry
            .resolve(&site.website, site.domain.as_deref())?;
        let manifest = self.manifest()?;
        EditorSession::load(selection, manifest, &self.config.sites.configs)
            .await
            .context("failed to load the stored configuration")
    }
}

/// "s" suffix for counts other than one.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `3 errors`, `1 error`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}
