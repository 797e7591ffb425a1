//! Resolution of the template a script is rendered from

use std::fs;
use std::path::{Path, PathBuf};

use super::TemplateKind;
use crate::error::{Error, Result};

/// File looked up inside a custom template directory
pub const CUSTOM_TEMPLATE_FILE: &str = "cli_template.tera";

/// Where the template text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Compiled into the library
    Bundled(TemplateKind),
    /// A template file on disk
    Custom(PathBuf),
}

impl TemplateSource {
    /// Resolve the template for a kind and an optional custom path.
    ///
    /// A custom directory must contain [`CUSTOM_TEMPLATE_FILE`].
    pub fn resolve(kind: TemplateKind, custom_path: Option<&Path>) -> Result<Self> {
        let Some(path) = custom_path else {
            return Ok(Self::Bundled(kind));
        };

        let file = if path.is_dir() {
            path.join(CUSTOM_TEMPLATE_FILE)
        } else {
            path.to_path_buf()
        };

        if !file.is_file() {
            return Err(Error::TemplateNotFound(file));
        }
        Ok(Self::Custom(file))
    }

    /// Read the template text
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Bundled(kind) => Ok(kind.bundled_source().to_string()),
            Self::Custom(path) => fs::read_to_string(path).map_err(|e| Error::io(path, e)),
        }
    }

    /// Human-readable origin for log messages
    pub fn describe(&self) -> String {
        match self {
            Self::Bundled(kind) => format!("bundled {} template", kind),
            Self::Custom(path) => path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_bundled_without_custom_path() -> Result<()> {
        let source = TemplateSource::resolve(TemplateKind::Bash, None)?;
        assert_eq!(source, TemplateSource::Bundled(TemplateKind::Bash));
        assert!(source.load()?.contains("curl"));
        assert_eq!(source.describe(), "bundled bash template");
        Ok(())
    }

    #[test]
    fn test_custom_file() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tempdir", e))?;
        let file = dir.path().join("mine.tera");
        fs::write(&file, "{{ commands | length }}").map_err(|e| Error::io(&file, e))?;

        let source = TemplateSource::resolve(TemplateKind::Python, Some(&file))?;
        assert_eq!(source, TemplateSource::Custom(file.clone()));
        assert_eq!(source.load()?, "{{ commands | length }}");
        Ok(())
    }

    #[test]
    fn test_custom_directory() -> Result<()> {
        let dir = tempdir().map_err(|e| Error::io("tempdir", e))?;
        let file = dir.path().join(CUSTOM_TEMPLATE_FILE);
        fs::write(&file, "x").map_err(|e| Error::io(&file, e))?;

        let source = TemplateSource::resolve(TemplateKind::Python, Some(dir.path()))?;
        assert_eq!(source, TemplateSource::Custom(file));
        Ok(())
    }

    #[test]
    fn test_missing_template() {
        let dir = tempdir().unwrap();

        let missing = dir.path().join("nope.tera");
        let err = TemplateSource::resolve(TemplateKind::Python, Some(&missing)).unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(ref p) if *p == missing));

        // A directory without the expected file
        let err = TemplateSource::resolve(TemplateKind::Python, Some(dir.path())).unwrap_err();
        assert!(
            matches!(err, Error::TemplateNotFound(ref p) if p.ends_with(CUSTOM_TEMPLATE_FILE))
        );
    }
}
