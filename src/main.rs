//! scconf - edit site configurations described by a manifest.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, Workspace};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    scconf::logger::set_verbose(cli.verbose);

    let workspace = Workspace::load(&cli)?;

    match &cli.command {
        Commands::Sites => cli::sites::list_sites(&workspace),
        Commands::Tree { site, json } => cli::tree::print_tree(&workspace, site, *json).await,
        Commands::Validate { site, warn_only } => {
            cli::validate::validate_site(&workspace, site, *warn_only).await
        }
        Commands::Get { site, path } => cli::edit::get_value(&workspace, site, path).await,
        Commands::Set {
            site,
            assignments,
            dry_run,
        } => cli::edit::set_values(&workspace, site, assignments, *dry_run).await,
    }
}
