//! Typed property declarations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// PropertyKind
// ============================================================================

/// The closed set of property types a manifest may declare.
///
/// Several spellings share a control: `string`/`text`, `integer`/`number`,
/// `boolean`/`checkbox`, `enum`/`select`. They stay distinct variants so a
/// manifest round-trips unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    String,
    Text,
    Integer,
    Number,
    Boolean,
    Checkbox,
    Enum,
    Select,
    Array,
    Object,
}

impl PropertyKind {
    pub const fn is_array(self) -> bool {
        matches!(self, Self::Array)
    }

    /// Layout bucket used when a group or subtab is laid out.
    pub const fn layout(self) -> Layout {
        if self.is_array() {
            Layout::Array
        } else {
            Layout::Simple
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Checkbox => "checkbox",
            Self::Enum => "enum",
            Self::Select => "select",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout partition of properties inside a group or subtab.
///
/// Simple properties share a grid; each array property takes a full row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Simple,
    Array,
}

/// Input control a renderer should use for a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TextInput,
    NumberInput { integer: bool },
    Checkbox,
    Select,
    ArrayEditor { object_items: bool },
    ObjectEditor,
}

// ============================================================================
// PropertyDef
// ============================================================================

/// A single configurable field.
///
/// `items` describes array elements; `properties` describes the fields of an
/// object (both of an `object` property and of object-shaped array items).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    #[serde(rename = "type", default)]
    pub kind: PropertyKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default)]
    pub mandatory: bool,

    /// Owning group id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Owning subtab id, if the property lives inside one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtab: Option<String>,

    #[serde(rename = "docRef", default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,

    /// Array element schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertyDef>>,

    /// Allowed values for `enum`/`select` (and for `string` rendered as a select).
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    /// Legacy spelling of `enum`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    /// Fields of an object schema.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropertyDef>,
}

impl PropertyDef {
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Owning group id, treating an empty string as absent.
    pub fn group_id(&self) -> Option<&str> {
        self.group.as_deref().filter(|g| !g.is_empty())
    }

    /// Owning subtab id, treating an empty string as absent.
    pub fn subtab_id(&self) -> Option<&str> {
        self.subtab.as_deref().filter(|s| !s.is_empty())
    }

    /// Display title, falling back to the property id.
    pub fn display_title<'a>(&'a self, id: &'a str) -> &'a str {
        self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(id)
    }

    /// Selection values: `enum` first, then the legacy `options`.
    pub fn choices(&self) -> &[String] {
        if self.choices.is_empty() {
            &self.options
        } else {
            &self.choices
        }
    }

    /// Whether array items are object-shaped.
    pub fn has_object_items(&self) -> bool {
        self.items
            .as_deref()
            .is_some_and(|items| items.kind == PropertyKind::Object)
    }

    pub fn control(&self) -> Control {
        match self.kind {
            PropertyKind::String | PropertyKind::Text if !self.choices.is_empty() => {
                Control::Select
            }
            PropertyKind::String | PropertyKind::Text => Control::TextInput,
            PropertyKind::Integer => Control::NumberInput { integer: true },
            PropertyKind::Number => Control::NumberInput { integer: false },
            PropertyKind::Boolean | PropertyKind::Checkbox => Control::Checkbox,
            PropertyKind::Enum | PropertyKind::Select => Control::Select,
            PropertyKind::Array => Control::ArrayEditor {
                object_items: self.has_object_items(),
            },
            PropertyKind::Object => Control::ObjectEditor,
        }
    }

    /// Convert raw user input into a JSON value of this property's type.
    ///
    /// Selection values are not checked against the allowed list; like the
    /// rest of value validation that is the renderer's concern.
    pub fn parse_input(&self, raw: &str) -> Result<Value, InputError> {
        let invalid = |expected: &'static str| InputError {
            input: raw.to_string(),
            expected,
        };

        match self.kind {
            PropertyKind::String
            | PropertyKind::Text
            | PropertyKind::Enum
            | PropertyKind::Select => Ok(Value::String(raw.to_string())),
            PropertyKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid("an integer")),
            PropertyKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| invalid("a number")),
            PropertyKind::Boolean | PropertyKind::Checkbox => match raw.trim() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(invalid("true or false")),
            },
            PropertyKind::Array => match serde_json::from_str(raw) {
                Ok(value @ Value::Array(_)) => Ok(value),
                _ => Err(invalid("a JSON array")),
            },
            PropertyKind::Object => match serde_json::from_str(raw) {
                Ok(value @ Value::Object(_)) => Ok(value),
                _ => Err(invalid("a JSON object")),
            },
        }
    }
}

/// Raw input that does not parse as the property's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{input}` is not {expected}")]
pub struct InputError {
    pub input: String,
    pub expected: &'static str,
}
