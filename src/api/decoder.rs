//! Purpose: Public keypath decode entrypoints and the reusable decoder configuration.
//! Exports: `KeyPathDecoder`, `decode`, `decode_with_separator`, `decode_str`, `decode_value`.
//! Role: Wires the splitter, the parse boundary, and the navigator for one call.
//! Invariants: The keypath is an explicit argument; decoder instances are immutable.
//! Invariants: Decoding is atomic: a typed value or an `Error`, never a partial result.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::error::{Error, ErrorKind};
use crate::core::keypath::{DEFAULT_SEPARATOR, KeyPath};
use crate::core::navigate::decode_at_path;
use crate::json::parse;

/// Decodes values at keypaths using a fixed separator.
///
/// A decoder holds no per-call state, so one instance can be shared across
/// threads and reused for any number of documents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyPathDecoder {
    separator: String,
}

impl Default for KeyPathDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPathDecoder {
    pub fn new() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Decodes `T` from the value at `key_path` inside the JSON `document`.
    ///
    /// An empty `key_path` decodes `T` from the document root.
    pub fn decode<T: DeserializeOwned>(&self, document: &[u8], key_path: &str) -> Result<T, Error> {
        let key_path = self.split(key_path)?;
        let root: Value =
            parse::from_slice(document).map_err(|err| self.parse_error(err, &key_path))?;
        self.finish(root, &key_path)
    }

    pub fn decode_str<T: DeserializeOwned>(
        &self,
        document: &str,
        key_path: &str,
    ) -> Result<T, Error> {
        let key_path = self.split(key_path)?;
        let root: Value =
            parse::from_str(document).map_err(|err| self.parse_error(err, &key_path))?;
        self.finish(root, &key_path)
    }

    /// Same as [`KeyPathDecoder::decode`] for a document that is already parsed.
    pub fn decode_value<T: DeserializeOwned>(
        &self,
        document: Value,
        key_path: &str,
    ) -> Result<T, Error> {
        let key_path = self.split(key_path)?;
        self.finish(document, &key_path)
    }

    fn split<'a>(&self, key_path: &'a str) -> Result<KeyPath<'a>, Error> {
        if self.separator.is_empty() {
            return Err(Error::new(ErrorKind::Internal)
                .with_message("key path separator must not be empty")
                .with_hint("Use KeyPathDecoder::with_separator with at least one character."));
        }
        Ok(KeyPath::split(key_path, &self.separator))
    }

    fn finish<T: DeserializeOwned>(
        &self,
        root: Value,
        key_path: &KeyPath<'_>,
    ) -> Result<T, Error> {
        let result = decode_at_path(root, key_path);
        let joined = key_path.join(&self.separator);
        match &result {
            Ok(_) => tracing::debug!(
                key_path = %joined,
                segments = key_path.len(),
                "decoded value at key path"
            ),
            Err(err) => tracing::debug!(
                key_path = %joined,
                kind = ?err.kind(),
                "key path decode failed"
            ),
        }
        result
    }

    fn parse_error(&self, err: serde_json::Error, key_path: &KeyPath<'_>) -> Error {
        let context = if key_path.is_empty() {
            "document root".to_string()
        } else {
            format!("key path {}", key_path.join(&self.separator))
        };
        let hint = parse::hint_for_error(&err, &context);
        let mut mapped = Error::new(ErrorKind::Parse)
            .with_message("document is not valid JSON")
            .with_hint(hint);
        if err.line() > 0 {
            mapped = mapped.with_position(err.line(), err.column());
        }
        mapped.with_source(err)
    }
}

/// Decodes `T` at a dot-separated `key_path` inside `document`.
pub fn decode<T: DeserializeOwned>(document: &[u8], key_path: &str) -> Result<T, Error> {
    KeyPathDecoder::new().decode(document, key_path)
}

pub fn decode_with_separator<T: DeserializeOwned>(
    document: &[u8],
    key_path: &str,
    separator: &str,
) -> Result<T, Error> {
    KeyPathDecoder::new()
        .with_separator(separator)
        .decode(document, key_path)
}

pub fn decode_str<T: DeserializeOwned>(document: &str, key_path: &str) -> Result<T, Error> {
    KeyPathDecoder::new().decode_str(document, key_path)
}

pub fn decode_value<T: DeserializeOwned>(document: Value, key_path: &str) -> Result<T, Error> {
    KeyPathDecoder::new().decode_value(document, key_path)
}
