// Dot-path access into JSON documents ("visibility.isActive", "forecast.growth")

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static FIELD_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$").expect("valid path regex")
});

/// True when `path` is a plain dotted field path, safe to embed in a JSON path expression
pub fn is_valid_path(path: &str) -> bool {
    FIELD_PATH.is_match(path)
}

/// Read the value at `path`, if every segment exists
pub fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

/// Write `value` at `path`, creating intermediate objects as needed.
/// Returns false when an intermediate segment exists but is not an object.
pub fn set_path(doc: &mut Value, path: &str, value: Value) -> bool {
    let mut segments = path.split('.').peekable();
    let mut current = doc;
    while let Some(segment) = segments.next() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        let Some(object) = current.as_object_mut() else {
            return false;
        };
        if segments.peek().is_none() {
            object.insert(segment.to_string(), value);
            return true;
        }
        current = object
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    false
}

/// True when the path is absent or explicitly null
pub fn is_missing(doc: &Value, path: &str) -> bool {
    get_path(doc, path).map_or(true, Value::is_null)
}

/// Recursively merge `patch` into `target`. Objects merge key by key,
/// every other value (arrays included) replaces what was there.
pub fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                match existing.get_mut(&key) {
                    Some(slot) if slot.is_object() && value.is_object() => merge(slot, value),
                    _ => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_validation() {
        assert!(is_valid_path("forecast.growth"));
        assert!(is_valid_path("isActive"));
        assert!(!is_valid_path("forecast..growth"));
        assert!(!is_valid_path("x') OR 1=1 --"));
        assert!(!is_valid_path(""));
    }

    #[test]
    fn test_get_and_set_nested() {
        let mut doc = json!({"visibility": {"isPublic": true}});
        assert_eq!(get_path(&doc, "visibility.isPublic"), Some(&json!(true)));
        assert!(set_path(&mut doc, "metadata.version", json!(1)));
        assert_eq!(doc["metadata"]["version"], json!(1));
        assert!(is_missing(&doc, "visibility.startDate"));
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut doc = json!({"title": "x"});
        assert!(!set_path(&mut doc, "title.inner", json!(1)));
    }

    #[test]
    fn test_merge_replaces_arrays_and_merges_objects() {
        let mut doc = json!({"seo": {"metaTitle": "a", "ogImage": "b"}, "keywords": ["x"]});
        merge(&mut doc, json!({"seo": {"metaTitle": "c"}, "keywords": ["y", "z"]}));
        assert_eq!(doc, json!({"seo": {"metaTitle": "c", "ogImage": "b"}, "keywords": ["y", "z"]}));
    }
}
