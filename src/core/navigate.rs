//! Purpose: Walk a parsed JSON tree along a keypath and decode the terminal value.
//! Exports: `decode_at_path`.
//! Role: Keyed navigator behind every public decode entrypoint.
//! Invariants: Every non-terminal segment must resolve to an object member.
//! Invariants: Members are moved out of the owned tree; nothing is mutated in place.
//! Invariants: Terminal failures point at the innermost value that failed to decode.
//! Invariants: Error paths list the segments traversed before the failing key.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::{Error, ErrorKind};
use super::keypath::{KeyPath, KeySegment};
use super::kind::JsonKind;

const MAX_HINT_KEYS: usize = 8;

pub fn decode_at_path<T: DeserializeOwned>(
    root: Value,
    key_path: &KeyPath<'_>,
) -> Result<T, Error> {
    let Some((terminal, parents)) = key_path.segments().split_last() else {
        tracing::trace!("empty key path, decoding from document root");
        return decode_terminal(root, None, &[]);
    };

    let mut traversed: Vec<&str> = Vec::with_capacity(key_path.len());
    let first = parents.first().unwrap_or(terminal);
    let mut current = into_object(root, *first, &traversed, true)?;

    for segment in parents {
        let member = take_member(&mut current, *segment, &traversed)?;
        current = into_object(member, *segment, &traversed, false)?;
        traversed.push(segment.as_str());
        tracing::trace!(segment = %segment, depth = traversed.len(), "entered keyed container");
    }

    let value = take_member(&mut current, *terminal, &traversed)?;
    decode_terminal(value, Some(*terminal), &traversed)
}

fn into_object(
    value: Value,
    segment: KeySegment<'_>,
    traversed: &[&str],
    at_root: bool,
) -> Result<Map<String, Value>, Error> {
    match value {
        Value::Object(map) => Ok(map),
        other => {
            let found = JsonKind::of(&other);
            let message = if at_root {
                format!("cannot look up {:?}: document root is a {found}", segment.as_str())
            } else {
                format!("member {:?} is a {found}, not an object", segment.as_str())
            };
            Err(Error::new(ErrorKind::TypeMismatch)
                .with_message(message)
                .with_key(segment.as_str())
                .with_path(traversed.iter().copied())
                .with_expected(JsonKind::Object.as_str())
                .with_found(found))
        }
    }
}

fn take_member(
    container: &mut Map<String, Value>,
    segment: KeySegment<'_>,
    traversed: &[&str],
) -> Result<Value, Error> {
    if let Some(value) = container.remove(segment.as_str()) {
        return Ok(value);
    }
    Err(Error::new(ErrorKind::KeyNotFound)
        .with_message(format!("no member named {:?}", segment.as_str()))
        .with_key(segment.as_str())
        .with_path(traversed.iter().copied())
        .with_hint(available_keys_hint(container)))
}

fn available_keys_hint(container: &Map<String, Value>) -> String {
    if container.is_empty() {
        return "object has no members".to_string();
    }
    let mut keys: Vec<String> = container
        .keys()
        .take(MAX_HINT_KEYS)
        .map(|key| format!("{key:?}"))
        .collect();
    if container.len() > MAX_HINT_KEYS {
        keys.push(format!("... ({} more)", container.len() - MAX_HINT_KEYS));
    }
    format!("available keys: {}", keys.join(", "))
}

fn decode_terminal<T: DeserializeOwned>(
    value: Value,
    segment: Option<KeySegment<'_>>,
    traversed: &[&str],
) -> Result<T, Error> {
    serde_path_to_error::deserialize(&value).map_err(|err| {
        let failed_at = locate(&value, err.path());
        let mut mapped = Error::new(ErrorKind::TypeMismatch)
            .with_path(traversed.iter().copied())
            .with_expected(type_name::<T>());
        if let Some(found) = failed_at {
            mapped = mapped.with_found(JsonKind::of(found));
        }
        if err.path().iter().next().is_some() {
            mapped = mapped.with_inner_path(err.path().to_string());
        }
        if let Some(segment) = segment {
            mapped = mapped.with_key(segment.as_str());
        }
        let inner = err.into_inner();
        mapped.with_message(inner.to_string()).with_source(inner)
    })
}

// Resolves the value a deserialization failure points at, if it still exists.
fn locate<'v>(value: &'v Value, path: &serde_path_to_error::Path) -> Option<&'v Value> {
    use serde_path_to_error::Segment;

    path.iter().try_fold(value, |current, segment| match segment {
        Segment::Seq { index } => current.get(*index),
        Segment::Map { key } => current.get(key.as_str()),
        Segment::Enum { .. } | Segment::Unknown => Some(current),
    })
}

#[cfg(test)]
mod tests {
    use super::decode_at_path;
    use crate::core::error::ErrorKind;
    use crate::core::keypath::KeyPath;
    use crate::core::kind::JsonKind;
    use serde_json::{Value, json};

    fn doc() -> Value {
        json!({
            "level1": {
                "level2": {"title": "t", "number": 2},
                "flag": true,
                "list": [1, 2, 3]
            },
            "count": 7
        })
    }

    #[test]
    fn empty_path_decodes_root() {
        let value: Value = decode_at_path(doc(), &KeyPath::split("", ".")).unwrap();
        assert_eq!(value, doc());
    }

    #[test]
    fn terminal_scalar_and_array() {
        let count: u32 = decode_at_path(doc(), &KeyPath::split("count", ".")).unwrap();
        assert_eq!(count, 7);
        let list: Vec<u8> = decode_at_path(doc(), &KeyPath::split("level1.list", ".")).unwrap();
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn missing_key_reports_traversed_path() {
        let err = decode_at_path::<Value>(doc(), &KeyPath::split("level1.level2.nope", "."))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyNotFound);
        assert_eq!(err.key(), Some("nope"));
        assert_eq!(err.path(), ["level1".to_string(), "level2".to_string()]);
        assert!(err.hint().unwrap().contains("\"title\""));
    }

    #[test]
    fn non_object_mid_path_is_type_mismatch() {
        let err =
            decode_at_path::<Value>(doc(), &KeyPath::split("level1.list.x", ".")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("list"));
        assert_eq!(err.path(), ["level1".to_string()]);
        assert_eq!(err.expected(), Some("object"));
        assert_eq!(err.found(), Some(JsonKind::Array));
    }

    #[test]
    fn non_object_root_is_type_mismatch() {
        let err = decode_at_path::<Value>(json!([1, 2]), &KeyPath::split("a", ".")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("a"));
        assert!(err.path().is_empty());
        assert_eq!(err.found(), Some(JsonKind::Array));
        assert!(err.message().unwrap().contains("document root"));
    }

    #[test]
    fn terminal_mismatch_names_target_type() {
        let err = decode_at_path::<u64>(doc(), &KeyPath::split("level1.flag", ".")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("flag"));
        assert_eq!(err.expected(), Some("u64"));
        assert_eq!(err.found(), Some(JsonKind::Bool));
        assert!(err.inner_path().is_none());
    }

    #[test]
    fn nested_mismatch_reports_failing_member() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Entry {
            tags: Vec<String>,
        }

        let doc = json!({"entry": {"tags": ["a", 7]}});
        let err = decode_at_path::<Entry>(doc, &KeyPath::split("entry", ".")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.key(), Some("entry"));
        assert_eq!(err.inner_path(), Some("tags[1]"));
        assert_eq!(err.found(), Some(JsonKind::Number));
    }

    #[test]
    fn empty_object_hint() {
        let err = decode_at_path::<Value>(json!({}), &KeyPath::split("a", ".")).unwrap_err();
        assert_eq!(err.hint(), Some("object has no members"));
    }
}
