//! `scconf sites`: list the website registry.

use anyhow::Result;
use owo_colors::OwoColorize;
use scconf::log;
use scconf::site::Website;

use super::{Workspace, plural_count};

pub fn list_sites(workspace: &Workspace) -> Result<()> {
    let websites = workspace.registry.websites();
    if websites.is_empty() {
        log!("sites"; "no websites in {}", workspace.config.sites.websites.display());
        return Ok(());
    }

    for website in websites {
        print_website(website);
    }
    log!("sites"; "{}", plural_count(websites.len(), "website"));
    Ok(())
}

fn print_website(website: &Website) {
    println!(
        "{} {} {}",
        website.id.bold(),
        website.name,
        format!("[{}]", website.sitetype).dimmed()
    );

    let primary = website.primary_domain().map(|d| d.name.as_str());
    for domain in &website.domains {
        if Some(domain.name.as_str()) == primary {
            println!("  {} {}", domain.name.green(), "(primary)".dimmed());
        } else {
            println!("  {}", domain.name);
        }
    }
}
