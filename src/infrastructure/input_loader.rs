use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

pub struct InputLoader;

impl InputLoader {
    /// Read the whole input. `None` or `-` reads standard input.
    pub fn load(path: Option<&Path>) -> Result<String> {
        match path {
            Some(path) if path != Path::new("-") => {
                tracing::debug!(path = %path.display(), "reading input file");
                fs::read_to_string(path)
                    .with_context(|| format!("Failed to read input {}", path.display()))
            }
            _ => {
                tracing::debug!("reading standard input");
                let mut src = String::new();
                io::stdin()
                    .read_to_string(&mut src)
                    .context("Failed to read standard input")?;
                Ok(src)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "(A)").unwrap();
        assert_eq!(InputLoader::load(Some(file.path())).unwrap(), "(A)");
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = InputLoader::load(Some(Path::new("/nonexistent/tree.sexpr"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tree.sexpr"));
    }
}
