//! Authorization data tree helpers.
//!
//! The authorization response is an opaque JSON tree. Consumers address into
//! it with dotted field paths (`child.type`), both for the public
//! `authdata_field` API and for `AUTHDATA(...)` URL variables; the expression
//! evaluator shares the same lookup.

use serde_json::Value;

/// Look up a dotted field path in an authorization response tree.
///
/// Returns `None` when any path segment is missing or addresses into a
/// non-object value.
pub fn field<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Truthiness of an authorization data value.
///
/// `null`, `false`, `0`, and the empty string are falsy; everything else,
/// including empty arrays and objects, is truthy. Absent fields are handled
/// by callers treating `None` as falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_paths() {
        let tree = json!({ "child": { "type": "premium", "count": 3 } });
        assert_eq!(field(&tree, "child.type"), Some(&json!("premium")));
        assert_eq!(field(&tree, "child.count"), Some(&json!(3)));
        assert_eq!(field(&tree, "child.missing"), None);
        assert_eq!(field(&tree, "child.type.deeper"), None);
    }

    #[test]
    fn truthiness_follows_host_semantics() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!("no")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }
}
