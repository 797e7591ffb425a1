//! Configuration for a generator run.
//!
//! The CLI builds a `Config` from its arguments; library users construct one
//! with [`Config::new`] and override fields as needed.
//!
//! # Examples
//!
//! ```
//! use cligen_core::builders::CommandNaming;
//! use cligen_core::config::Config;
//! use cligen_core::templates::TemplateKind;
//!
//! let mut config = Config::new("openapi.yaml", "out/blog");
//! config.template_kind = TemplateKind::Bash;
//! config.naming = CommandNaming::Path;
//! config.exclude_operations = vec!["deletePost".to_string()];
//! ```

// Internal imports (std, crate)
use std::path::PathBuf;

use crate::builders::{CommandNaming, OperationFilter};
use crate::templates::TemplateKind;

/// Settings for one spec-to-script generation
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the OpenAPI document (YAML or JSON)
    pub spec_path: PathBuf,

    /// Script file to write, or an existing directory to write into
    pub output_path: PathBuf,

    /// Bundled template to use when no custom template is given
    pub template_kind: TemplateKind,

    /// Custom template file, or a directory holding `cli_template.tera`
    pub template_path: Option<PathBuf>,

    /// How subcommands are named
    pub naming: CommandNaming,

    /// Operations to keep, by command name or operationId (empty keeps all)
    pub include_operations: Vec<String>,

    /// Operations to drop, by command name or operationId
    pub exclude_operations: Vec<String>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(spec_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            spec_path: spec_path.into(),
            output_path: output_path.into(),
            template_kind: TemplateKind::default(),
            template_path: None,
            naming: CommandNaming::default(),
            include_operations: Vec::new(),
            exclude_operations: Vec::new(),
        }
    }

    /// The include/exclude lists as an operation filter
    pub fn operation_filter(&self) -> OperationFilter {
        OperationFilter::new(
            self.include_operations.clone(),
            self.exclude_operations.clone(),
        )
    }

    /// Where the script is written: `output_path`, or the kind's default
    /// file name inside it when it is an existing directory
    pub fn resolved_output_path(&self) -> PathBuf {
        if self.output_path.is_dir() {
            self.output_path.join(self.template_kind.file_name())
        } else {
            self.output_path.clone()
        }
    }
}
