//! `scconf tree`: show the indexed manifest with current values.
//!
//! Within a group, simple properties come first, then array properties, then
//! each subtab laid out the same way.

use anyhow::Result;
use owo_colors::OwoColorize;
use scconf::manifest::{Layout, PropertyDef};
use scconf::session::EditorSession;
use scconf::{debug, log};
use serde_json::Value;

use super::{SiteArgs, Workspace, plural_count};

pub async fn print_tree(workspace: &Workspace, site: &SiteArgs, json: bool) -> Result<()> {
    let session = workspace.open(site).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(session.index())?);
        return Ok(());
    }

    println!("{}", session.selection().to_string().bold());
    for node in session.index().groups() {
        println!();
        println!(
            "{} {} {}",
            node.group.display_title().cyan().bold(),
            format!("[{}]", node.group.id).dimmed(),
            format!("({})", plural_count(node.property_count(), "field")).dimmed()
        );
        print_properties(
            &session,
            node.properties_of_kind(Layout::Simple)
                .chain(node.properties_of_kind(Layout::Array)),
            "  ",
        );

        for tab in node.subtabs.values() {
            println!(
                "  {} {}",
                tab.subtab.display_title().magenta(),
                format!("[{}]", tab.subtab.id).dimmed()
            );
            print_properties(
                &session,
                tab.properties_of_kind(Layout::Simple)
                    .chain(tab.properties_of_kind(Layout::Array)),
                "    ",
            );
        }
    }

    let skipped = session.index().skipped();
    if !skipped.is_empty() {
        println!();
        log!("index"; "{} not shown", plural_count(skipped.len(), "declaration"));
        for entry in skipped {
            debug!("index"; "{}", entry);
        }
    }
    Ok(())
}

fn print_properties<'a>(
    session: &EditorSession,
    properties: impl Iterator<Item = (&'a str, &'a PropertyDef)>,
    indent: &str,
) {
    for (id, property) in properties {
        let value = session.get_field(id);
        println!("{indent}{}", describe(id, property, value));
    }
}

fn describe(id: &str, property: &PropertyDef, value: Option<&Value>) -> String {
    let marker = if property.mandatory { "*" } else { "" };
    let value = match value {
        Some(value) => value.to_string(),
        None => match &property.default {
            Some(default) => format!("{} {}", default, "(default)".dimmed()),
            None => "-".dimmed().to_string(),
        },
    };
    format!(
        "{}{} {} = {}",
        property.display_title(id),
        marker.red(),
        format!("<{}>", property.kind).dimmed(),
        value
    )
}
