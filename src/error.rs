//! Error types for producing and rendering trees.

use std::io;
use thiserror::Error;

/// The producer could not build a tree. Nothing has been written when this
/// is returned.
#[derive(Error, Debug)]
pub enum ProduceError {
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("invalid JSON tree: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid Rust source: {0}")]
    Rust(#[from] syn::Error),

    #[error("input contains no tree")]
    Empty,
}

impl ProduceError {
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        ProduceError::Syntax {
            line,
            column,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Producer(#[from] ProduceError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
