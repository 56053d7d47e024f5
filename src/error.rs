use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ScalarKind;

/// Errors surfaced by the import core.
///
/// An invalid column-type or menu selection never shows up here: the
/// classifier and the menu loop re-prompt until the chooser returns a valid
/// code.
#[derive(Error, Debug)]
pub enum Error {
    /// A secondary-table operation was requested before the primary table exists.
    #[error("Need to create and populate {table} table first!")]
    MissingPrimaryTable { table: String },

    /// The database already holds a table of this name.
    #[error("Table {table} already exists")]
    DuplicateTable { table: String },

    /// The CSV has no column named after the identity header.
    #[error("Table {table} needs a {header} column")]
    MissingIdentityHeader { table: String, header: String },

    #[error("File not found: {0:?}")]
    FileNotFound(PathBuf),

    #[error("CSV file {0:?} has no header row")]
    EmptyHeader(PathBuf),

    /// A value could not be coerced to the kind declared by its column.
    #[error("Line {line}: value {value:?} in column {column} is not a valid {kind}")]
    MalformedRow {
        line: u64,
        column: String,
        value: String,
        kind: ScalarKind,
    },

    /// The chooser's input stream ended before a valid answer was given.
    #[error("Input closed")]
    InputClosed,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
