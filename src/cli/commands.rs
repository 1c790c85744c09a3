// src/cli/commands.rs
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// List records
    List {
        /// Limit the listing to one record kind
        #[arg(value_enum)]
        kind: Option<RecordKind>,
    },

    /// Add a record interactively
    Add,

    /// Show one record in full (reveals key values)
    Show {
        /// Record ID
        #[arg(required = true)]
        id: String,
    },

    /// Edit a record interactively
    Edit {
        /// Record ID
        #[arg(required = true)]
        id: String,
    },

    /// Delete a record
    Delete {
        /// Record ID
        #[arg(required = true)]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Export the vault
    Export {
        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a file, replacing every record in the vault
    Import {
        /// The .json or .csv file to import
        #[arg(required = true)]
        file: PathBuf,

        /// Fail on malformed rows instead of skipping them
        #[arg(long)]
        strict: bool,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Write the CSV import template
    Template {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Change the vault PIN
    SetPin,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Apps,
    Keys,
    Bookmarks,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}
