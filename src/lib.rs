//! Purpose: Decode typed values found at a keypath inside a JSON document.
//! Exports: `api` (decode entrypoints, decoder configuration, errors) and its re-exports.
//! Role: Library backing the `json-keypath` CLI and embedding callers.
//! Invariants: Each decode call is self-contained; no global or shared mutable state.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.
pub mod api;
mod core;
mod json;

pub use api::{
    Error, ErrorKind, JsonKind, KeyPath, KeyPathDecoder, KeySegment, decode, decode_str,
    decode_value, decode_with_separator,
};
