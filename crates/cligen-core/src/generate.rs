//! The generation pipeline: load, extract, render, write.

use std::path::{Path, PathBuf};

use crate::{
    builders::{CommandBuilder, CommandNaming, OperationFilter},
    command::CommandDescriptor,
    config::Config,
    error::Result,
    openapi::OpenApiContext,
    templates::{ApiInfo, GeneratorInfo, RenderContext, TemplateManager, TemplateSource},
};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// The script that was written
    pub output_path: PathBuf,
    /// Commands in the script, in output order
    pub commands: Vec<CommandDescriptor>,
}

/// Main entry point for script generation.
///
/// Nothing touches the filesystem until the script is fully rendered, so any
/// error leaves the output path as it was.
pub fn generate(config: &Config) -> Result<GenerationReport> {
    // 1. Load the OpenAPI document
    let spec = OpenApiContext::from_file(&config.spec_path)?;

    // 2. Build the command list
    let operations = spec.parse_operations()?;
    let commands = CommandBuilder::new(&spec, config.naming)
        .build_all(&operations, &config.operation_filter())?;
    log::info!(
        "Extracted {} commands from {} operations",
        commands.len(),
        operations.len()
    );

    // 3. Render with the selected template
    let manager = TemplateManager::new(TemplateSource::resolve(
        config.template_kind,
        config.template_path.as_deref(),
    )?)?;
    log::info!("Using {}", manager.source().describe());
    let content = manager.render(&RenderContext {
        api: api_info(&spec),
        generator: GeneratorInfo::default(),
        commands: &commands,
    })?;

    // 4. Write the script
    let output_path = config.resolved_output_path();
    TemplateManager::write_script(&output_path, &content)?;
    log::info!("Wrote {}", output_path.display());

    Ok(GenerationReport {
        output_path,
        commands,
    })
}

/// Load a spec and build its commands without rendering anything
pub fn extract_commands(
    spec_path: &Path,
    naming: CommandNaming,
    filter: &OperationFilter,
) -> Result<Vec<CommandDescriptor>> {
    let spec = OpenApiContext::from_file(spec_path)?;
    CommandBuilder::new(&spec, naming).build_all(&spec.parse_operations()?, filter)
}

fn api_info(spec: &OpenApiContext) -> ApiInfo {
    ApiInfo {
        title: spec.title().map(String::from),
        version: spec.version().map(String::from),
        description: spec.description().map(String::from),
        server_url: spec.server_url().map(String::from),
    }
}
