//! Purpose: Define the stable public Rust API boundary for json-keypath.
//! Exports: Decode entrypoints, the decoder configuration, keypath and error types.
//! Role: Public, additive-only surface; hides the navigator and parser internals.
//! Invariants: This module is the only public path to the decode machinery.
//! Invariants: Internal modules remain private and are not directly exposed.

mod decoder;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::keypath::{DEFAULT_SEPARATOR, KeyPath, KeySegment};
pub use crate::core::kind::JsonKind;
pub use decoder::{KeyPathDecoder, decode, decode_str, decode_value, decode_with_separator};
