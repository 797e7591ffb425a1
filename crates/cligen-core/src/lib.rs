//! cligen Core Library
//!
//! This library turns an OpenAPI 3.x document into a standalone command-line
//! client script: one subcommand per operation, typed flags for path and query
//! parameters, and a raw `--data` flag for request bodies.

pub mod builders;
pub mod command;
pub mod config;
pub mod error;
pub mod generate;
pub mod openapi;
pub mod templates;
pub mod utils;

pub use crate::{
    builders::{CommandBuilder, CommandNaming, OperationFilter},
    command::{CommandDescriptor, CommandName, ParameterDescriptor},
    config::Config,
    error::{Error, Result},
    generate::{extract_commands, generate, GenerationReport},
    openapi::OpenApiContext,
    templates::{TemplateKind, TemplateManager, TemplateSource},
};
