//! Manifest indexing: flat entries → groups → subtabs → properties.
//!
//! The index is a read model. It is rebuilt from the manifest whenever the
//! manifest changes and is never patched in place.
//!
//! # Passes
//!
//! Order matters, each pass relies on what the previous one registered:
//!
//! 1. groups: first declaration of an id wins
//! 2. subtabs: filed under their owning group, skipped if the group is
//!    unknown; first declaration wins within a group
//! 3. properties: filed under their subtab or directly under their group,
//!    skipped if either reference does not resolve. The first declaration
//!    of an id claims it even when it cannot be filed
//!
//! Skips are logged (verbose) and kept in [`GroupIndex::skipped`]; turning
//! them into user-facing errors is the validator's job.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::manifest::{Group, Layout, Manifest, PropertyDef, Subtab};

// ============================================================================
// Nodes
// ============================================================================

/// Properties keyed by id, in declaration order.
pub type PropertyMap = IndexMap<String, PropertyDef>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtabNode {
    pub subtab: Subtab,
    pub properties: PropertyMap,
}

impl SubtabNode {
    fn new(subtab: Subtab) -> Self {
        Self {
            subtab,
            properties: PropertyMap::new(),
        }
    }

    /// Properties in one layout bucket, declaration order preserved.
    pub fn properties_of_kind(&self, layout: Layout) -> impl Iterator<Item = (&str, &PropertyDef)> {
        of_kind(&self.properties, layout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupNode {
    pub group: Group,
    pub subtabs: IndexMap<String, SubtabNode>,
    /// Properties filed directly under the group (no subtab).
    pub properties: PropertyMap,
}

impl GroupNode {
    fn new(group: Group) -> Self {
        Self {
            group,
            subtabs: IndexMap::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Direct properties in one layout bucket, declaration order preserved.
    pub fn properties_of_kind(&self, layout: Layout) -> impl Iterator<Item = (&str, &PropertyDef)> {
        of_kind(&self.properties, layout)
    }

    /// Number of properties in the group, including those inside subtabs.
    pub fn property_count(&self) -> usize {
        self.properties.len()
            + self
                .subtabs
                .values()
                .map(|s| s.properties.len())
                .sum::<usize>()
    }
}

fn of_kind(map: &PropertyMap, layout: Layout) -> impl Iterator<Item = (&str, &PropertyDef)> {
    map.iter()
        .filter(move |(_, p)| p.kind.layout() == layout)
        .map(|(id, p)| (id.as_str(), p))
}

// ============================================================================
// Skipped entries
// ============================================================================

/// A manifest declaration the indexer could not place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skipped {
    /// Subtab whose owning group is not declared.
    Subtab { subtab: String, group: String },
    /// Property whose group is missing or not declared.
    PropertyGroup {
        property: String,
        group: Option<String>,
    },
    /// Property whose subtab is not registered under its group.
    PropertySubtab {
        property: String,
        group: String,
        subtab: String,
    },
    /// Later declaration of an already claimed id.
    Duplicate { kind: &'static str, id: String },
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subtab { subtab, group } => {
                write!(f, "subtab {subtab} not found in group {group}")
            }
            Self::PropertyGroup {
                property,
                group: Some(group),
            } => write!(f, "property {property} not found in group {group}"),
            Self::PropertyGroup {
                property,
                group: None,
            } => write!(f, "property {property} declares no group"),
            Self::PropertySubtab {
                property,
                group,
                subtab,
            } => write!(
                f,
                "subtab {subtab} of property {property} not found in group {group}"
            ),
            Self::Duplicate { kind, id } => write!(f, "duplicate {kind} {id} ignored"),
        }
    }
}

// ============================================================================
// GroupIndex
// ============================================================================

/// Grouped, ordered view of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupIndex {
    groups: IndexMap<String, GroupNode>,
    #[serde(skip)]
    skipped: Vec<Skipped>,
}

impl GroupIndex {
    /// Build a fresh index from a manifest.
    pub fn build(manifest: &Manifest) -> Self {
        let mut index = Self::default();
        index.register_groups(manifest);
        index.register_subtabs(manifest);
        index.file_properties(manifest);

        if !index.skipped.is_empty() {
            crate::debug!(
                "index";
                "{} of {} entries left out of the index",
                index.skipped.len(),
                manifest.len()
            );
        }
        index
    }

    fn register_groups(&mut self, manifest: &Manifest) {
        for group in manifest.groups() {
            if self.groups.contains_key(&group.id) {
                self.skip(Skipped::Duplicate {
                    kind: "group",
                    id: group.id.clone(),
                });
                continue;
            }
            self.groups
                .insert(group.id.clone(), GroupNode::new(group.clone()));
        }
    }

    fn register_subtabs(&mut self, manifest: &Manifest) {
        for subtab in manifest.subtabs() {
            let Some(node) = self.groups.get_mut(&subtab.group) else {
                self.skip(Skipped::Subtab {
                    subtab: subtab.id.clone(),
                    group: subtab.group.clone(),
                });
                continue;
            };
            // keyed per group; an id reused across groups is reported by the validator
            if node.subtabs.contains_key(&subtab.id) {
                self.skip(Skipped::Duplicate {
                    kind: "subtab",
                    id: subtab.id.clone(),
                });
                continue;
            }
            node.subtabs
                .insert(subtab.id.clone(), SubtabNode::new(subtab.clone()));
        }
    }

    fn file_properties(&mut self, manifest: &Manifest) {
        let mut filed = FxHashSet::default();
        for (id, property) in manifest.properties() {
            if !filed.insert(id) {
                self.skip(Skipped::Duplicate {
                    kind: "property",
                    id: id.to_string(),
                });
                continue;
            }

            let Some(node) = property.group_id().and_then(|g| self.groups.get_mut(g)) else {
                self.skip(Skipped::PropertyGroup {
                    property: id.to_string(),
                    group: property.group_id().map(str::to_string),
                });
                continue;
            };

            let target = match property.subtab_id() {
                Some(subtab) => match node.subtabs.get_mut(subtab) {
                    Some(tab) => &mut tab.properties,
                    None => {
                        let group = node.group.id.clone();
                        self.skip(Skipped::PropertySubtab {
                            property: id.to_string(),
                            group,
                            subtab: subtab.to_string(),
                        });
                        continue;
                    }
                },
                None => &mut node.properties,
            };
            target.insert(id.to_string(), property.clone());
        }
    }

    fn skip(&mut self, skipped: Skipped) {
        crate::debug!("index"; "{}", skipped);
        self.skipped.push(skipped);
    }

    // ========================================================================
    // queries
    // ========================================================================

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group(&self, id: &str) -> Option<&GroupNode> {
        self.groups.get(id)
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupNode> {
        self.groups.values()
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// The group shown first (the default active tab).
    pub fn first_group(&self) -> Option<&GroupNode> {
        self.groups.values().next()
    }

    /// Direct properties of a group in one layout bucket.
    ///
    /// Unknown group ids yield nothing.
    pub fn properties_of_kind(
        &self,
        group_id: &str,
        layout: Layout,
    ) -> impl Iterator<Item = (&str, &PropertyDef)> {
        self.groups
            .get(group_id)
            .into_iter()
            .flat_map(move |node| node.properties_of_kind(layout))
    }

    /// Look up an indexed property anywhere in the tree.
    pub fn property(&self, id: &str) -> Option<&PropertyDef> {
        self.groups.values().find_map(|node| {
            node.properties.get(id).or_else(|| {
                node.subtabs
                    .values()
                    .find_map(|tab| tab.properties.get(id))
            })
        })
    }

    /// Declarations the indexer could not place.
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestEntry, PropertyKind};
    use serde_json::json;

    fn prop(kind: PropertyKind, group: &str, subtab: Option<&str>) -> PropertyDef {
        PropertyDef {
            group: Some(group.to_string()),
            subtab: subtab.map(str::to_string),
            ..PropertyDef::new(kind)
        }
    }

    fn store_manifest() -> Manifest {
        serde_json::from_value(json!([
            {
                "group": {"id": "general", "title": "General"},
                "properties": {
                    "siteName": {
                        "type": "string", "group": "general",
                        "mandatory": true, "default": "My Store"
                    }
                }
            },
            {"group": {"id": "appearance", "title": "Appearance"}},
            {
                "subtab": {"id": "colors", "title": "Colors", "group": "appearance"},
                "properties": {
                    "primaryColor": {"type": "string", "group": "appearance", "subtab": "colors"}
                }
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_store_scenario() {
        let index = GroupIndex::build(&store_manifest());

        assert_eq!(index.group_ids().collect::<Vec<_>>(), ["general", "appearance"]);
        let general = index.group("general").unwrap();
        assert!(general.properties.contains_key("siteName"));

        let appearance = index.group("appearance").unwrap();
        assert!(appearance.properties.is_empty());
        assert_eq!(appearance.subtabs.len(), 1);
        let colors = &appearance.subtabs["colors"];
        assert_eq!(colors.properties.keys().collect::<Vec<_>>(), ["primaryColor"]);
        assert!(index.skipped().is_empty());
    }

    #[test]
    fn test_group_count_and_order() {
        let manifest: Manifest = ["c", "a", "b"]
            .into_iter()
            .map(|id| ManifestEntry::default().with_group(Group::new(id, id.to_uppercase())))
            .collect();
        let index = GroupIndex::build(&manifest);
        assert_eq!(index.len(), 3);
        assert_eq!(index.group_ids().collect::<Vec<_>>(), ["c", "a", "b"]);
        assert_eq!(index.first_group().unwrap().group.id, "c");
    }

    #[test]
    fn test_duplicate_group_first_wins() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default().with_group(Group::new("general", "First")),
            ManifestEntry::default().with_group(Group::new("general", "Second")),
        ]);
        let index = GroupIndex::build(&manifest);
        assert_eq!(index.len(), 1);
        assert_eq!(index.group("general").unwrap().group.title, "First");
    }

    #[test]
    fn test_subtab_with_unknown_group_skipped() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default().with_group(Group::new("general", "General")),
            ManifestEntry::default().with_subtab(Subtab::new("colors", "Colors", "nonexistent")),
        ]);
        let index = GroupIndex::build(&manifest);

        assert!(index.groups().all(|g| !g.subtabs.contains_key("colors")));
        assert_eq!(
            index.skipped(),
            [Skipped::Subtab {
                subtab: "colors".into(),
                group: "nonexistent".into()
            }]
        );
    }

    #[test]
    fn test_property_with_unknown_group_absent() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default()
                .with_group(Group::new("general", "General"))
                .with_property("orphan", prop(PropertyKind::String, "missing", None)),
        ]);
        let index = GroupIndex::build(&manifest);
        assert!(index.property("orphan").is_none());
        assert_eq!(index.group("general").unwrap().property_count(), 0);
    }

    #[test]
    fn test_property_subtab_resolved_under_own_group() {
        // subtab exists, but under another group than the property's
        let manifest = Manifest::new(vec![
            ManifestEntry::default().with_group(Group::new("a", "A")),
            ManifestEntry::default().with_group(Group::new("b", "B")),
            ManifestEntry::default().with_subtab(Subtab::new("tab", "Tab", "a")),
            ManifestEntry::default().with_property("x", prop(PropertyKind::String, "b", Some("tab"))),
        ]);
        let index = GroupIndex::build(&manifest);
        assert!(index.property("x").is_none());
        assert!(matches!(
            index.skipped(),
            [Skipped::PropertySubtab { property, .. }] if property == "x"
        ));
    }

    #[test]
    fn test_duplicate_property_first_wins() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default()
                .with_group(Group::new("g", "G"))
                .with_property("x", prop(PropertyKind::Integer, "g", None)),
            ManifestEntry::default().with_property("x", prop(PropertyKind::Boolean, "g", None)),
        ]);
        let index = GroupIndex::build(&manifest);
        assert_eq!(index.property("x").unwrap().kind, PropertyKind::Integer);
        assert_eq!(index.group("g").unwrap().properties.len(), 1);
    }

    #[test]
    fn test_duplicate_property_after_unfiled_first() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default()
                .with_group(Group::new("g", "G"))
                .with_property("x", prop(PropertyKind::Integer, "missing", None)),
            ManifestEntry::default().with_property("x", prop(PropertyKind::Boolean, "g", None)),
        ]);
        let index = GroupIndex::build(&manifest);

        assert!(index.property("x").is_none());
        assert_eq!(
            index.skipped(),
            [
                Skipped::PropertyGroup {
                    property: "x".into(),
                    group: Some("missing".into())
                },
                Skipped::Duplicate {
                    kind: "property",
                    id: "x".into()
                },
            ]
        );
    }

    #[test]
    fn test_same_subtab_id_in_two_groups() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default().with_group(Group::new("a", "A")),
            ManifestEntry::default().with_group(Group::new("b", "B")),
            ManifestEntry::default()
                .with_subtab(Subtab::new("tab", "Tab A", "a"))
                .with_property("x", prop(PropertyKind::String, "a", Some("tab"))),
            ManifestEntry::default()
                .with_subtab(Subtab::new("tab", "Tab B", "b"))
                .with_property("y", prop(PropertyKind::String, "b", Some("tab"))),
        ]);
        let index = GroupIndex::build(&manifest);

        assert!(index.skipped().is_empty());
        let b = index.group("b").unwrap();
        assert_eq!(b.subtabs["tab"].subtab.title, "Tab B");
        assert!(b.subtabs["tab"].properties.contains_key("y"));
        assert!(index.property("x").is_some());
        assert!(index.property("y").is_some());
    }

    #[test]
    fn test_duplicate_subtab_in_same_group_first_wins() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default()
                .with_group(Group::new("g", "G"))
                .with_subtab(Subtab::new("tab", "First", "g")),
            ManifestEntry::default().with_subtab(Subtab::new("tab", "Second", "g")),
        ]);
        let index = GroupIndex::build(&manifest);

        assert_eq!(index.group("g").unwrap().subtabs["tab"].subtab.title, "First");
        assert_eq!(
            index.skipped(),
            [Skipped::Duplicate {
                kind: "subtab",
                id: "tab".into()
            }]
        );
    }

    #[test]
    fn test_properties_of_kind_partition() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default()
                .with_group(Group::new("g", "G"))
                .with_property("name", prop(PropertyKind::String, "g", None))
                .with_property("links", prop(PropertyKind::Array, "g", None))
                .with_property("count", prop(PropertyKind::Integer, "g", None)),
        ]);
        let index = GroupIndex::build(&manifest);

        let simple: Vec<_> = index
            .properties_of_kind("g", Layout::Simple)
            .map(|(id, _)| id)
            .collect();
        let arrays: Vec<_> = index
            .properties_of_kind("g", Layout::Array)
            .map(|(id, _)| id)
            .collect();
        assert_eq!(simple, ["name", "count"]);
        assert_eq!(arrays, ["links"]);
        assert_eq!(index.properties_of_kind("nope", Layout::Simple).count(), 0);
    }

    #[test]
    fn test_subtab_properties_of_kind() {
        let manifest = Manifest::new(vec![
            ManifestEntry::default()
                .with_group(Group::new("layout", "Layout"))
                .with_subtab(Subtab::new("footer", "Footer", "layout"))
                .with_property("links", prop(PropertyKind::Array, "layout", Some("footer")))
                .with_property("copyright", prop(PropertyKind::Text, "layout", Some("footer"))),
        ]);
        let index = GroupIndex::build(&manifest);
        let footer = &index.group("layout").unwrap().subtabs["footer"];

        let ordered: Vec<_> = footer
            .properties_of_kind(Layout::Simple)
            .chain(footer.properties_of_kind(Layout::Array))
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ordered, ["copyright", "links"]);
    }

    #[test]
    fn test_serialize_tree() {
        let index = GroupIndex::build(&store_manifest());
        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(
            value["groups"]["appearance"]["subtabs"]["colors"]["subtab"]["title"],
            "Colors"
        );
    }
}
