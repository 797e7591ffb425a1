//! Bundled script template kinds.
//!
//! Each kind names a target language for the generated client and carries the
//! template source compiled into the binary, so generation works without any
//! template directory on disk.
//!
//! # Examples
//!
//! ```
//! use cligen_core::templates::TemplateKind;
//! use std::str::FromStr;
//!
//! let kind = TemplateKind::from_str("bash").unwrap();
//! assert_eq!(kind, TemplateKind::Bash);
//! assert_eq!(kind.file_name(), "cli.sh");
//!
//! // The default kind is Python
//! assert_eq!(TemplateKind::default(), TemplateKind::Python);
//! assert_eq!(TemplateKind::default().to_string(), "python");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

/// Supported script languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateKind {
    /// Python 3 with argparse and urllib, no third-party packages
    #[default]
    Python,
    /// Bash with curl
    Bash,
}

impl FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(TemplateKind::Python),
            "bash" | "sh" => Ok(TemplateKind::Bash),
            _ => Err(format!("Unknown template kind: {}", s)),
        }
    }
}

impl TemplateKind {
    /// Returns the template identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Bash => "bash",
        }
    }

    /// Returns an iterator over all available template kinds
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateKind::*;
        [Python, Bash].iter().copied()
    }

    /// File name used when the output path is a directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Python => "cli.py",
            Self::Bash => "cli.sh",
        }
    }

    /// Template source shipped with the library
    pub fn bundled_source(&self) -> &'static str {
        match self {
            Self::Python => include_str!("../../templates/python/cli.py.tera"),
            Self::Bash => include_str!("../../templates/bash/cli.sh.tera"),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
