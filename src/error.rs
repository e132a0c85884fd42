//! Error types for the cellweave command-line tool

use thiserror::Error;

/// Errors that can occur while running an edit script
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Line {line}: {source}")]
    Sheet {
        line: usize,
        #[source]
        source: cellweave_core::SheetError,
    },

    #[error("Config error in {path}: {message}")]
    Config { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, CliError>;
