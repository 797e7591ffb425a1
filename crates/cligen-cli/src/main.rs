//! cligen CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use cligen_core::{CommandNaming, Config, OperationFilter, TemplateKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cligen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate a standalone CLI script from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI spec file (YAML or JSON)
        spec_path: PathBuf,
        /// Script to write, or an existing directory to write cli.py / cli.sh into
        output_path: PathBuf,
        /// Custom template file, or a directory containing cli_template.tera
        #[arg(long, env = "CLIGEN_TEMPLATE_PATH")]
        template_path: Option<PathBuf>,
        /// Bundled template to use (python, bash)
        #[arg(long, default_value = "python")]
        template_kind: String,
        /// Command naming strategy (operation-id, path)
        #[arg(long, default_value = "operation-id")]
        naming: String,
        /// Only generate these operations (command name or operationId, repeatable)
        #[arg(long = "include", value_name = "NAME")]
        include: Vec<String>,
        /// Skip these operations (command name or operationId, repeatable)
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,
    },
    /// List the commands a spec would produce, without writing anything
    List {
        /// Path to the OpenAPI spec file (YAML or JSON)
        spec_path: PathBuf,
        /// Command naming strategy (operation-id, path)
        #[arg(long, default_value = "operation-id")]
        naming: String,
    },
}

fn parse_naming(naming: &str) -> anyhow::Result<CommandNaming> {
    naming
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid naming strategy '{naming}': {e}"))
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            spec_path,
            output_path,
            template_path,
            template_kind,
            naming,
            include,
            exclude,
        } => {
            // Parse template kind
            let template_kind: TemplateKind = template_kind
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid template kind '{template_kind}': {e}"))?;

            let mut config = Config::new(&spec_path, &output_path);
            config.template_kind = template_kind;
            config.template_path = template_path;
            config.naming = parse_naming(&naming)?;
            config.include_operations = include;
            config.exclude_operations = exclude;

            tracing::info!(
                spec = %spec_path.display(),
                template = %config.template_kind,
                "Generating CLI"
            );

            let report = cligen_core::generate(&config).with_context(|| {
                format!("Failed to generate a CLI from {}", spec_path.display())
            })?;

            println!("CLI generated at {}", report.output_path.display());
        }
        Commands::List { spec_path, naming } => {
            let commands = cligen_core::extract_commands(
                &spec_path,
                parse_naming(&naming)?,
                &OperationFilter::default(),
            )
            .with_context(|| format!("Failed to read commands from {}", spec_path.display()))?;

            for command in &commands {
                println!(
                    "{}\t{} {}\t{}",
                    command.name,
                    command.method,
                    command.path,
                    command.flags().join(" ")
                );
            }
            tracing::info!("{} commands", commands.len());
        }
    }
    Ok(())
}
