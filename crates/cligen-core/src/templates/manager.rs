//! Rendering of the command list into a script and writing it to disk.

// Internal imports (std, crate)
use std::fs;
use std::io::Write;
use std::path::Path;

use super::filters;
use super::TemplateSource;
use crate::command::CommandDescriptor;
use crate::error::{Error, Result};

// External imports (alphabetized)
use serde::Serialize;
use tempfile::NamedTempFile;
use tera::{Context, Tera};

/// Name the template is registered under
const TEMPLATE_NAME: &str = "cli";

/// API metadata exposed to templates as `api`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiInfo {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub server_url: Option<String>,
}

/// Generator metadata exposed to templates as `generator`
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub version: String,
}

impl Default for GeneratorInfo {
    fn default() -> Self {
        Self {
            name: "cligen".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Everything a template can reference; `commands` keeps its name across templates
#[derive(Debug, Serialize)]
pub struct RenderContext<'a> {
    pub api: ApiInfo,
    pub generator: GeneratorInfo,
    pub commands: &'a [CommandDescriptor],
}

/// Compiles one script template and renders command lists with it
#[derive(Debug)]
pub struct TemplateManager {
    tera: Tera,
    source: TemplateSource,
}

impl TemplateManager {
    /// Load and compile the template. Syntax errors surface here.
    pub fn new(source: TemplateSource) -> Result<Self> {
        let text = source.load()?;

        let mut tera = Tera::default();
        // Output is source code, never HTML
        tera.autoescape_on(vec![]);
        tera.register_filter("py_literal", filters::py_literal);
        tera.register_filter("shell_quote", filters::shell_quote);

        tera.add_raw_template(TEMPLATE_NAME, &text).map_err(|e| {
            log::error!("Failed to compile {}", source.describe());
            Error::from(e)
        })?;

        log::debug!("Compiled {}", source.describe());
        Ok(Self { tera, source })
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }

    /// Render the whole script in memory
    pub fn render(&self, context: &RenderContext<'_>) -> Result<String> {
        let tera_context = Context::from_serialize(context)?;
        log::debug!(
            "Rendering {} commands with {}",
            context.commands.len(),
            self.source.describe()
        );
        let content = self.tera.render(TEMPLATE_NAME, &tera_context).map_err(|e| {
            log::error!("Template processing failed: {}", e);
            Error::from(e)
        })?;

        log::debug!("Rendered {} bytes", content.len());
        Ok(content)
    }

    /// Write an executable script atomically.
    ///
    /// The content lands in a temporary file next to `path` and is renamed
    /// over it, so a failed write never leaves a partial script behind.
    pub fn write_script(path: &Path, content: &str) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        log::debug!("Ensuring parent directory exists: {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;

        let mut file = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| Error::io(file.path(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(0o755))
                .map_err(|e| Error::io(file.path(), e))?;
        }

        file.persist(path).map_err(|e| Error::io(path, e.error))?;
        log::debug!("Successfully wrote script to: {}", path.display());
        Ok(())
    }
}
