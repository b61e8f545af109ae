//! `scconf get` / `scconf set`: read and change configuration values.

use anyhow::{Context, Result, anyhow, bail};
use scconf::log;
use scconf::manifest::PropertyDef;
use scconf::session::{EditorSession, SaveStatus};
use scconf::site::FilePersist;
use serde_json::Value;

use super::{SiteArgs, Workspace, plural_count};

pub async fn get_value(workspace: &Workspace, site: &SiteArgs, path: &str) -> Result<()> {
    let session = workspace.open(site).await?;
    match session.get_field(path) {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(())
        }
        None => bail!("`{path}` is not set for {}", session.selection()),
    }
}

pub async fn set_values(
    workspace: &Workspace,
    site: &SiteArgs,
    assignments: &[String],
    dry_run: bool,
) -> Result<()> {
    let mut session = workspace.open(site).await?;

    for assignment in assignments {
        let (path, raw) = split_assignment(assignment)?;
        let value = coerce(session.index().property(path), raw)
            .with_context(|| format!("invalid value for `{path}`"))?;
        session.set_field(path, value);
    }

    report_errors(&session);

    if dry_run {
        println!("{}", serde_json::to_string_pretty(session.configuration())?);
        log!("set"; "dry run, nothing saved");
        return Ok(());
    }

    if !session.can_save() {
        log!("set"; "no changes for {}", session.selection());
        return Ok(());
    }

    let persist = FilePersist::new(
        session
            .selection()
            .config_path(&workspace.config.sites.configs),
    );
    match session.save(&persist).await {
        SaveStatus::Failed(detail) => Err(anyhow!(detail)).context("save failed"),
        _ => Ok(()),
    }
}

fn report_errors(session: &EditorSession) {
    let count = session.errors().count();
    if count == 0 {
        return;
    }
    log!("validate"; "{}:", plural_count(count, "validation error"));
    for error in session.errors() {
        eprintln!("- {error}");
    }
}

/// Split `path=value` at the first `=`.
fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((path, raw)) if !path.is_empty() => Ok((path, raw)),
        _ => bail!("expected PATH=VALUE, got `{assignment}`"),
    }
}

/// Turn raw text into a value.
///
/// Known properties parse according to their declared type. Anything else
/// is taken as JSON when it parses, and as a plain string otherwise.
fn coerce(property: Option<&PropertyDef>, raw: &str) -> Result<Value> {
    match property {
        Some(property) => Ok(property.parse_input(raw)?),
        None => Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))),
    }
}
