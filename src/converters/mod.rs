// src/converters/mod.rs
//
// Export/import converters for the vault: the lossless JSON form, the flat
// 10-column CSV form with its heuristic row classifier, and the
// human-readable Markdown report.

pub mod csv;
pub mod json;
pub mod markdown;

pub use csv::{
    parse_csv, parse_csv_with_mode, to_csv, CsvImportReport, ParseMode, CSV_HEADER, CSV_TEMPLATE,
    MASKED_KEY_PLACEHOLDER,
};
pub use json::{from_json, to_json};
pub use markdown::{mask_key, to_markdown};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing header row")]
    MissingHeader,

    #[error("Malformed row {row}: expected at least {expected} fields, found {found}")]
    MalformedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
