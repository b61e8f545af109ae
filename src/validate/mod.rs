//! Manifest integrity and configuration shape checks.
//!
//! Both checks are pure functions over explicit inputs. They accumulate every
//! problem instead of stopping at the first one, and they never fail: an
//! empty [`Diagnostics`] means the input is clean.
//!
//! | Check                 | Input         | Finds                                   |
//! |-----------------------|---------------|-----------------------------------------|
//! | `validate_references` | `Manifest`    | duplicate ids, dangling group/subtab    |
//! | `validate_shape`      | config value  | configuration that is not a container   |
//!
//! The shape check is shallow on purpose: property values are not checked
//! against their declared types.

mod error;

pub use error::{Diagnostics, ValidationError};

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use serde_json::Value;

use crate::manifest::Manifest;

/// Check a manifest for duplicate declarations and dangling references.
///
/// Groups and subtabs are collected from every entry before any property is
/// checked, so a property may reference a group declared further down.
pub fn validate_references(manifest: &Manifest) -> Diagnostics {
    let mut diag = Diagnostics::new();
    let mut groups: IndexSet<&str> = IndexSet::new();
    let mut subtabs: IndexSet<&str> = IndexSet::new();

    for group in manifest.groups() {
        if !groups.insert(group.id.as_str()) {
            diag.push(ValidationError::DuplicateGroup(group.id.clone()));
        }
    }
    for subtab in manifest.subtabs() {
        if !subtabs.insert(subtab.id.as_str()) {
            diag.push(ValidationError::DuplicateSubtab(subtab.id.clone()));
        }
    }

    let mut properties = FxHashSet::default();
    for (id, property) in manifest.properties() {
        if !properties.insert(id) {
            diag.push(ValidationError::DuplicateProperty(id.to_string()));
        }

        if let Some(group) = property.group_id()
            && !groups.contains(group)
        {
            crate::debug!(
                "validate";
                "property {} references group {}, available groups: {:?}",
                id,
                group,
                groups
            );
            diag.push(ValidationError::UnknownGroup {
                property: id.to_string(),
                group: group.to_string(),
            });
        }

        if let Some(subtab) = property.subtab_id()
            && !subtabs.contains(subtab)
        {
            crate::debug!(
                "validate";
                "property {} references subtab {}, available subtabs: {:?}",
                id,
                subtab,
                subtabs
            );
            diag.push(ValidationError::UnknownSubtab {
                property: id.to_string(),
                subtab: subtab.to_string(),
            });
        }
    }

    diag
}

/// Check that a configuration value is a container.
///
/// Objects pass, and so do arrays (they address fields by index). Scalars
/// and `null` do not.
pub fn validate_shape(config: &Value) -> Diagnostics {
    let mut diag = Diagnostics::new();
    if !(config.is_object() || config.is_array()) {
        diag.push(ValidationError::NotAnObject);
    }
    diag
}
