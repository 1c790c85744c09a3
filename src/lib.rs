// src/lib.rs
//
// AIVault: a single-user vault for AI application records, API keys, and
// bookmarks. The converters module carries the interchange formats (lossless
// JSON, the 10-column tabular CSV with its heuristic row classifier, and a
// masked Markdown report); the store persists the collections as one JSON
// file; the auth module gates access behind a PIN.

pub mod auth;
pub mod cli;
pub mod config;
pub mod converters;
pub mod models;
pub mod store;
