//! Input and output formats understood by astdot.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Textual notations a tree can be produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InputFormat {
    /// Parenthesized tree notation: `(KIND "value" children...)`.
    Sexpr,
    /// `{"kind": ..., "value": ..., "children": [...]}`.
    Json,
    /// Rust source code, parsed with syn.
    Rust,
}

impl InputFormat {
    /// Infer format from file extension.
    pub fn from_extension(ext: &str) -> Option<InputFormat> {
        match ext.to_lowercase().as_str() {
            "sexpr" | "sexp" | "tree" => Some(InputFormat::Sexpr),
            "json" => Some(InputFormat::Json),
            "rs" => Some(InputFormat::Rust),
            _ => None,
        }
    }

    /// Infer format from a file path.
    pub fn from_path(path: &Path) -> Option<InputFormat> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputFormat::Sexpr => "sexpr",
            InputFormat::Json => "json",
            InputFormat::Rust => "rust",
        }
    }
}

/// Renderings of a produced tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Dot,
    Json,
    /// Indented outline.
    Text,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_from_path() {
        assert_eq!(InputFormat::from_path(Path::new("a/b.rs")), Some(InputFormat::Rust));
        assert_eq!(InputFormat::from_path(Path::new("t.JSON")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("t.tree")), Some(InputFormat::Sexpr));
        assert_eq!(InputFormat::from_path(Path::new("README")), None);
        assert_eq!(InputFormat::from_path(Path::new("x.py")), None);
    }
}
