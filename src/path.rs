//! Dot-delimited path access into nested JSON objects.
//!
//! A property id such as `checkout.payment.enabled` addresses the field
//! `enabled` inside `payment` inside `checkout`. Reads never fail: a missing
//! segment is simply `None`. Writes create intermediate objects on demand.
//!
//! | Function       | Input root | Result                                  |
//! |----------------|------------|-----------------------------------------|
//! | `get`          | borrowed   | `Option<&Value>`                        |
//! | `set`          | borrowed   | new root, input untouched               |
//! | `set_in_place` | `&mut`     | the owned root is updated               |

use serde_json::{Map, Value};

/// Split a dotted path into its segments.
#[inline]
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.')
}

/// Read the value at `path`.
///
/// Returns `None` when any segment is absent or when an intermediate value
/// is not an object.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path).try_fold(root, |current, key| current.as_object()?.get(key))
}

/// Write `value` at `path`, returning a new root.
///
/// The input root is left untouched: every object along the path is copied,
/// so two writes against the same original never alias each other.
pub fn set(root: &Value, path: &str, value: Value) -> Value {
    let mut next = root.clone();
    set_in_place(&mut next, path, value);
    next
}

/// Write `value` at `path` inside an owned root.
///
/// Missing intermediates become empty objects. A non-object found where an
/// intermediate object is required is replaced by an empty object, which
/// discards the old value; callers should not address through primitives.
pub fn set_in_place(root: &mut Value, path: &str, value: Value) {
    let mut parts: Vec<&str> = segments(path).collect();
    let Some(last) = parts.pop() else {
        return;
    };

    let mut current = root;
    for key in parts {
        current = ensure_object(current, key)
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(current, last).insert(last.to_string(), value);
}

/// Coerce `value` into an object and hand back its map.
fn ensure_object<'a>(value: &'a mut Value, key: &str) -> &'a mut Map<String, Value> {
    if !value.is_object() {
        if !value.is_null() {
            crate::debug!("path"; "overwriting non-object {} before key `{}`", value, key);
        }
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was coerced to an object above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let root = json!({"a": {"b": {"c": 3}}});
        assert_eq!(get(&root, "a.b.c"), Some(&json!(3)));
        assert_eq!(get(&root, "a.b"), Some(&json!({"c": 3})));
    }

    #[test]
    fn test_get_missing_is_none() {
        let root = json!({"a": {"b": 1}});
        assert_eq!(get(&root, "a.x"), None);
        assert_eq!(get(&root, "x.y.z"), None);
        // walking through a primitive
        assert_eq!(get(&root, "a.b.c"), None);
        assert_eq!(get(&Value::Null, "a"), None);
    }

    #[test]
    fn test_set_keeps_siblings() {
        let root = json!({});
        let root = set(&root, "a.b", json!(1));
        let root = set(&root, "a.c", json!(2));
        assert_eq!(get(&root, "a.b"), Some(&json!(1)));
        assert_eq!(get(&root, "a.c"), Some(&json!(2)));
    }

    #[test]
    fn test_set_does_not_touch_input() {
        let original = json!({"a": {"b": 1}});
        let first = set(&original, "a.b", json!(10));
        let second = set(&original, "a.c", json!(20));

        assert_eq!(original, json!({"a": {"b": 1}}));
        assert_eq!(first, json!({"a": {"b": 10}}));
        assert_eq!(second, json!({"a": {"b": 1, "c": 20}}));
    }

    #[test]
    fn test_set_top_level_key() {
        let root = set(&json!({"x": true}), "siteName", json!("Acme"));
        assert_eq!(root, json!({"x": true, "siteName": "Acme"}));
    }

    #[test]
    fn test_set_in_place_replaces_primitive_intermediate() {
        let mut root = json!({"a": 5});
        set_in_place(&mut root, "a.b", json!("x"));
        assert_eq!(root, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn test_set_on_non_object_root() {
        let mut root = Value::Null;
        set_in_place(&mut root, "a", json!(1));
        assert_eq!(root, json!({"a": 1}));
    }
}
