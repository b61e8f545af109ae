//! scconf - manifest-driven site configuration.
//!
//! A manifest declares groups, subtabs and typed properties. This crate
//! indexes it into a display tree, checks it for broken references, and
//! tracks edits to a site's configuration until they are saved.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── manifest/   # Manifest model and fragment loading
//! ├── index       # GroupIndex: group -> subtab -> property tree
//! ├── validate/   # Reference and shape checks, Diagnostics
//! ├── path        # Dotted-path get/set on JSON values
//! ├── store       # ConfigStore: dirty tracking, save, Persist trait
//! ├── array       # Element edits for array properties
//! ├── site        # Websites, domains, stored configuration files
//! ├── session     # EditorSession tying everything together
//! ├── config/     # scconf.toml
//! └── logger      # log!/debug! macros, save status line
//! ```

pub mod array;
pub mod config;
pub mod index;
pub mod logger;
pub mod manifest;
pub mod path;
pub mod session;
pub mod site;
pub mod store;
pub mod validate;
