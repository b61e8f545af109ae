//! Manifest model: the declarative schema behind a site configuration.
//!
//! ```text
//! Manifest
//! └── ManifestEntry*          (one per contributing configuration section)
//!     ├── group?    Group     (id, title, docRef)
//!     ├── subtab?   Subtab    (id, title, owning group id)
//!     └── properties          (property id → PropertyDef, in declaration order)
//! ```
//!
//! The manifest is data only. Grouping lives in [`crate::index`] and
//! integrity checks live in [`crate::validate`].

mod loader;
mod property;

pub use loader::{ManifestError, load_fragments};
pub use property::{Control, InputError, Layout, PropertyDef, PropertyKind};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A top-level configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Opaque documentation key.
    #[serde(rename = "docRef", default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            doc_ref: None,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "General"
        } else {
            &self.title
        }
    }
}

/// A named subsection nested within a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtab {
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Owning group id.
    #[serde(default)]
    pub group: String,
}

impl Subtab {
    pub fn new(id: impl Into<String>, title: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            group: group.into(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.id
        } else {
            &self.title
        }
    }
}

/// One declarative unit contributed by a configuration section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Group>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtab: Option<Subtab>,

    #[serde(default)]
    pub properties: IndexMap<String, PropertyDef>,
}

impl ManifestEntry {
    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_subtab(mut self, subtab: Subtab) -> Self {
        self.subtab = Some(subtab);
        self
    }

    pub fn with_property(mut self, id: impl Into<String>, property: PropertyDef) -> Self {
        self.properties.insert(id.into(), property);
        self
    }
}

/// Ordered sequence of manifest entries.
///
/// Order drives display order; it has no bearing on validity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append another fragment after this one.
    ///
    /// Nothing is overridden: a group redeclared by a later fragment loses to
    /// the earlier declaration when indexed.
    pub fn extend(&mut self, fragment: Manifest) {
        self.entries.extend(fragment.entries);
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.entries.iter().filter_map(|e| e.group.as_ref())
    }

    pub fn subtabs(&self) -> impl Iterator<Item = &Subtab> {
        self.entries.iter().filter_map(|e| e.subtab.as_ref())
    }

    /// Every property of every entry, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyDef)> {
        self.entries
            .iter()
            .flat_map(|e| e.properties.iter().map(|(id, p)| (id.as_str(), p)))
    }

    /// First declaration of a property id.
    pub fn property(&self, id: &str) -> Option<&PropertyDef> {
        self.entries.iter().find_map(|e| e.properties.get(id))
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
