//! Edits on array-valued properties.
//!
//! Every operation takes the property's current value and returns the whole
//! new array, ready to be written back with a single `set_field`. A missing
//! or non-array current value counts as an empty array, and an index past
//! the end leaves the array as it was.

use serde_json::{Map, Value};

use crate::manifest::{PropertyDef, PropertyKind};

fn items_of(current: Option<&Value>) -> Vec<Value> {
    match current {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// A blank element for an array whose elements follow `items`.
///
/// Object-shaped elements get every declared field set to its default, or
/// to an empty string when no default is declared. Anything else starts as
/// an empty string.
pub fn new_item(items: Option<&PropertyDef>) -> Value {
    match items {
        Some(schema) if schema.kind == PropertyKind::Object => {
            let fields: Map<String, Value> = schema
                .properties
                .iter()
                .map(|(key, field)| {
                    let value = field
                        .default
                        .clone()
                        .unwrap_or_else(|| Value::String(String::new()));
                    (key.clone(), value)
                })
                .collect();
            Value::Object(fields)
        }
        _ => Value::String(String::new()),
    }
}

/// Append a blank element.
pub fn push_item(current: Option<&Value>, items: Option<&PropertyDef>) -> Value {
    let mut array = items_of(current);
    array.push(new_item(items));
    Value::Array(array)
}

pub fn remove_item(current: Option<&Value>, index: usize) -> Value {
    let mut array = items_of(current);
    if index < array.len() {
        array.remove(index);
    } else {
        crate::debug!("array"; "remove index {} out of range ({} items)", index, array.len());
    }
    Value::Array(array)
}

/// Replace the element at `index`.
pub fn update_item(current: Option<&Value>, index: usize, value: Value) -> Value {
    let mut array = items_of(current);
    match array.get_mut(index) {
        Some(slot) => *slot = value,
        None => {
            crate::debug!("array"; "update index {} out of range ({} items)", index, array.len())
        }
    }
    Value::Array(array)
}

/// Set one field of an object element, keeping its other fields.
///
/// A non-object element is replaced by an object holding just that field.
pub fn update_item_property(
    current: Option<&Value>,
    index: usize,
    key: &str,
    value: Value,
) -> Value {
    let mut array = items_of(current);
    let Some(slot) = array.get_mut(index) else {
        crate::debug!("array"; "update index {} out of range ({} items)", index, array.len());
        return Value::Array(array);
    };

    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(fields) = slot {
        fields.insert(key.to_string(), value);
    }
    Value::Array(array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn link_schema() -> PropertyDef {
        serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "default": "Home"},
                "href": {"type": "string"},
                "external": {"type": "boolean", "default": false}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_new_item_object_defaults() {
        let schema = link_schema();
        assert_eq!(
            new_item(Some(&schema)),
            json!({"text": "Home", "href": "", "external": false})
        );
    }

    #[test]
    fn test_new_item_scalar() {
        assert_eq!(new_item(None), json!(""));
        assert_eq!(new_item(Some(&PropertyDef::new(PropertyKind::Integer))), json!(""));
    }

    #[test]
    fn test_push_onto_missing_value() {
        assert_eq!(push_item(None, None), json!([""]));
        assert_eq!(push_item(Some(&json!("oops")), None), json!([""]));
    }

    #[test]
    fn test_push_keeps_existing() {
        let schema = link_schema();
        let current = json!([{"text": "Docs", "href": "/docs", "external": false}]);
        let next = push_item(Some(&current), Some(&schema));
        assert_eq!(next.as_array().map(Vec::len), Some(2));
        assert_eq!(next[0], current[0]);
    }

    #[test]
    fn test_remove_item() {
        let current = json!(["a", "b", "c"]);
        assert_eq!(remove_item(Some(&current), 1), json!(["a", "c"]));
        assert_eq!(remove_item(Some(&current), 3), current);
    }

    #[test]
    fn test_update_item() {
        let current = json!(["a", "b"]);
        assert_eq!(update_item(Some(&current), 0, json!("z")), json!(["z", "b"]));
        assert_eq!(update_item(Some(&current), 5, json!("z")), current);
    }

    #[test]
    fn test_update_item_property_merges() {
        let current = json!([{"text": "Docs", "href": "/docs"}]);
        assert_eq!(
            update_item_property(Some(&current), 0, "href", json!("/guide")),
            json!([{"text": "Docs", "href": "/guide"}])
        );
    }

    #[test]
    fn test_update_item_property_on_scalar_item() {
        let current = json!(["plain"]);
        assert_eq!(
            update_item_property(Some(&current), 0, "text", json!("x")),
            json!([{"text": "x"}])
        );
        assert_eq!(
            update_item_property(Some(&current), 1, "text", json!("x")),
            current
        );
    }
}
