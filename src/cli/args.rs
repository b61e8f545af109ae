//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use scconf::config::Overrides;
use std::path::PathBuf;

/// Manifest-driven site configuration editor
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: scconf.toml)
    #[arg(short = 'C', long, default_value = "scconf.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Manifest fragment, repeatable; earlier fragments take precedence
    #[arg(short, long = "manifest", global = true, value_hint = clap::ValueHint::FilePath)]
    pub manifest: Vec<PathBuf>,

    /// Website registry file
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub websites: Option<PathBuf>,

    /// Directory of stored configurations
    #[arg(long, global = true, value_hint = clap::ValueHint::DirPath)]
    pub configs: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Paths given on the command line, replacing configured ones.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            manifest: self.manifest.clone(),
            websites: self.websites.clone(),
            configs: self.configs.clone(),
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List websites and their domains
    #[command(visible_alias = "ls")]
    Sites,

    /// Show groups, subtabs and properties with current values
    #[command(visible_alias = "t")]
    Tree {
        #[command(flatten)]
        site: SiteArgs,

        /// Print the index as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check the manifest and the stored configuration
    #[command(visible_alias = "v")]
    Validate {
        #[command(flatten)]
        site: SiteArgs,

        /// Treat validation failures as warnings instead of errors
        #[arg(long, short = 'w')]
        warn_only: bool,
    },

    /// Print a configuration value
    Get {
        #[command(flatten)]
        site: SiteArgs,

        /// Dotted property path (e.g. checkout.payment.enabled)
        path: String,
    },

    /// Change configuration values and save
    Set {
        #[command(flatten)]
        site: SiteArgs,

        /// Assignments such as `siteName=Acme` or `links=[]`
        #[arg(value_name = "PATH=VALUE", required = true)]
        assignments: Vec<String>,

        /// Show the result without saving
        #[arg(long)]
        dry_run: bool,
    },
}

/// Which website (and domain) to work on.
#[derive(clap::Args, Debug, Clone)]
pub struct SiteArgs {
    /// Website id
    pub website: String,

    /// Domain name (default: the website's primary domain)
    #[arg(short, long)]
    pub domain: Option<String>,
}
