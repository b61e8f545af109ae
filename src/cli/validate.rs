//! `scconf validate`: report manifest and configuration problems.

use anyhow::{Result, bail};
use scconf::log;
use scconf::validate::Diagnostics;

use super::{SiteArgs, Workspace, plural_count};

pub async fn validate_site(workspace: &Workspace, site: &SiteArgs, warn_only: bool) -> Result<()> {
    let session = workspace.open(site).await?;
    let diagnostics: Diagnostics = session.errors().cloned().collect();

    if diagnostics.is_empty() {
        log!("validate"; "{} is valid", session.selection());
        return Ok(());
    }

    eprintln!("{diagnostics}");
    eprintln!();

    let summary = plural_count(diagnostics.len(), "validation error");
    if warn_only {
        log!("validate"; "{} (ignored)", summary);
        Ok(())
    } else {
        bail!("{summary} in {}", session.selection())
    }
}
