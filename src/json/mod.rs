//! Purpose: Internal JSON parsing boundary shared by the decode entrypoints.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Role: Single seam for parser implementation so callsites avoid ad hoc decode logic.
//! Invariants: Document bytes become a `serde_json::Value` only through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
