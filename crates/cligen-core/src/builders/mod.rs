//! Turns parsed OpenAPI operations into command descriptors.
//!
//! The builder is a pure function of the document: same operations in, same
//! ordered descriptors out. Filtering happens before anything else is built,
//! so an excluded operation can neither clash with another nor fail the run.
//!
//! # Examples
//!
//! ```
//! use cligen_core::builders::{CommandBuilder, CommandNaming, OperationFilter};
//! use cligen_core::openapi::{OpenApiContext, SpecFormat};
//!
//! let spec = OpenApiContext::parse_str(
//!     r#"{"openapi": "3.0.0", "paths": {"/posts": {"get": {"operationId": "listPosts"}}}}"#,
//!     SpecFormat::Json,
//! )?;
//! let builder = CommandBuilder::new(&spec, CommandNaming::OperationId);
//! let commands = builder.build_all(&spec.parse_operations()?, &OperationFilter::default())?;
//! assert_eq!(commands[0].name.as_str(), "list-posts");
//! # Ok::<(), cligen_core::Error>(())
//! ```

pub mod parameters;

// Internal imports (std, crate)
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::command::{CommandDescriptor, CommandName, ParameterSource, PathSegment};
use crate::error::{Error, Result};
use crate::openapi::{OpenApiContext, OpenApiOperation};
use crate::utils::normalize_whitespace;

use self::parameters::{build_parameters, path_segments};

/// How subcommand names are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandNaming {
    /// Kebab-cased operationId, derived name when absent
    #[default]
    OperationId,
    /// Always derived from method and path
    Path,
}

impl CommandNaming {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandNaming::OperationId => "operation-id",
            CommandNaming::Path => "path",
        }
    }

    pub fn all() -> &'static [CommandNaming] {
        &[CommandNaming::OperationId, CommandNaming::Path]
    }

    /// Pick the command name of an operation
    pub fn name_for(&self, op: &OpenApiOperation) -> CommandName {
        match self {
            CommandNaming::OperationId => op
                .operation_id
                .as_deref()
                .and_then(CommandName::from_operation_id)
                .unwrap_or_else(|| CommandName::derive(op.method, &op.path)),
            CommandNaming::Path => CommandName::derive(op.method, &op.path),
        }
    }
}

impl FromStr for CommandNaming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "operation-id" | "operation_id" | "operationid" => Ok(CommandNaming::OperationId),
            "path" => Ok(CommandNaming::Path),
            _ => Err(format!("Unknown naming strategy: {}", s)),
        }
    }
}

impl fmt::Display for CommandNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Include/exclude lists over command names and operationIds
#[derive(Debug, Clone, Default)]
pub struct OperationFilter {
    /// Keep only these (empty keeps everything)
    pub include: Vec<String>,
    /// Drop these, even when included
    pub exclude: Vec<String>,
}

impl OperationFilter {
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    fn matches(list: &[String], name: &CommandName, operation_id: Option<&str>) -> bool {
        list.iter().any(|entry| names(name, operation_id, entry))
    }

    /// Whether the command with this name and operationId is kept
    pub fn accepts(&self, name: &CommandName, operation_id: Option<&str>) -> bool {
        (self.include.is_empty() || Self::matches(&self.include, name, operation_id))
            && !Self::matches(&self.exclude, name, operation_id)
    }
}

/// Whether a filter entry refers to this command
fn names(name: &CommandName, operation_id: Option<&str>, entry: &str) -> bool {
    name.as_str() == entry || operation_id == Some(entry)
}

/// Builds command descriptors from the operations of one document
pub struct CommandBuilder<'a> {
    spec: &'a OpenApiContext,
    naming: CommandNaming,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(spec: &'a OpenApiContext, naming: CommandNaming) -> Self {
        Self { spec, naming }
    }

    /// Build the descriptor of a single operation
    pub fn build(&self, op: &OpenApiOperation) -> Result<CommandDescriptor> {
        let name = self.naming.name_for(op);
        let parameters = build_parameters(self.spec, op)?;

        let path_segments: Vec<PathSegment> = path_segments(&op.path, |placeholder| {
            parameters
                .iter()
                .find(|p| p.source == ParameterSource::Path && p.name == placeholder)
                .map(|p| p.dest.as_str())
        });

        let description = op
            .description
            .as_deref()
            .map(normalize_whitespace)
            .filter(|d| !d.is_empty());

        let descriptor = CommandDescriptor {
            ident: name.ident(),
            name,
            method: op.method,
            path: op.path.clone(),
            path_segments,
            operation_id: op.operation_id.clone(),
            summary: summary_for(op),
            description,
            deprecated: op.deprecated,
            has_request_body: op.request_body.is_some(),
            body_content_type: op
                .request_body
                .as_ref()
                .and_then(|body| body.content_type.clone()),
            parameters,
        };

        log::debug!(
            "Built command '{}' for {} {} ({} flags)",
            descriptor.name,
            descriptor.method,
            descriptor.path,
            descriptor.parameters.len()
        );
        Ok(descriptor)
    }

    /// Filter, build, check for name collisions and sort by name
    pub fn build_all(
        &self,
        operations: &[OpenApiOperation],
        filter: &OperationFilter,
    ) -> Result<Vec<CommandDescriptor>> {
        let mut commands = Vec::new();
        for op in operations {
            let name = self.naming.name_for(op);
            if filter.accepts(&name, op.operation_id.as_deref()) {
                commands.push(self.build(op)?);
            } else {
                log::debug!("Skipping filtered command '{}'", name);
            }
        }

        for entry in &filter.include {
            if !commands
                .iter()
                .any(|c| names(&c.name, c.operation_id.as_deref(), entry))
            {
                log::warn!("Included operation '{}' matches no command", entry);
            }
        }

        let mut seen: HashMap<&CommandName, String> = HashMap::new();
        for command in &commands {
            let origin = format!("{} {}", command.method, command.path);
            if let Some(first) = seen.get(&command.name) {
                return Err(Error::CommandCollision {
                    name: command.name.to_string(),
                    first: first.clone(),
                    second: origin,
                });
            }
            seen.insert(&command.name, origin);
        }

        // Sort by name for stable output
        commands.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(commands)
    }
}

/// Summary, else the first line of the description, else `METHOD path`
fn summary_for(op: &OpenApiOperation) -> String {
    let from_summary = op.summary.as_deref().map(normalize_whitespace);
    let from_description = op
        .description
        .as_deref()
        .and_then(|d| d.lines().map(normalize_whitespace).find(|l| !l.is_empty()));

    from_summary
        .filter(|s| !s.is_empty())
        .or(from_description)
        .unwrap_or_else(|| format!("{} {}", op.method, op.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::SpecFormat;

    const BLOG: &str = r#"
openapi: 3.0.3
info:
  title: Blog
  version: '1.0'
paths:
  /posts:
    get:
      operationId: listPosts
      summary: List posts
      parameters:
        - name: page
          in: query
          schema:
            type: integer
    post:
      operationId: createPost
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
  /posts/{id}/comments:
    parameters:
      - name: id
        in: path
        required: true
        schema:
          type: integer
    get:
      description: |
        Comments of a post.
        Newest first.
      parameters:
        - name: page
          in: query
          schema:
            type: integer
"#;

    fn blog() -> OpenApiContext {
        OpenApiContext::parse_str(BLOG, SpecFormat::Yaml).unwrap()
    }

    fn build(
        spec: &OpenApiContext,
        naming: CommandNaming,
        filter: &OperationFilter,
    ) -> Result<Vec<CommandDescriptor>> {
        CommandBuilder::new(spec, naming).build_all(&spec.parse_operations()?, filter)
    }

    #[test]
    fn test_naming_from_str() {
        assert_eq!(
            "operation-id".parse::<CommandNaming>().unwrap(),
            CommandNaming::OperationId
        );
        assert_eq!("PATH".parse::<CommandNaming>().unwrap(), CommandNaming::Path);
        assert!("tags".parse::<CommandNaming>().is_err());
        assert_eq!(CommandNaming::default(), CommandNaming::OperationId);
        for naming in CommandNaming::all() {
            assert_eq!(naming.as_str().parse::<CommandNaming>().unwrap(), *naming);
        }
    }

    #[test]
    fn test_build_all_sorted_by_name() -> Result<()> {
        let spec = blog();
        let commands = build(&spec, CommandNaming::OperationId, &OperationFilter::default())?;
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["create-post", "get-posts-comments", "list-posts"]);
        Ok(())
    }

    #[test]
    fn test_path_naming() -> Result<()> {
        let spec = blog();
        let commands = build(&spec, CommandNaming::Path, &OperationFilter::default())?;
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["get-posts", "get-posts-comments", "post-posts"]);
        Ok(())
    }

    #[test]
    fn test_comments_command() -> Result<()> {
        let spec = blog();
        let commands = build(&spec, CommandNaming::Path, &OperationFilter::default())?;
        let comments = &commands[1];
        assert_eq!(comments.flags(), vec!["--base-url", "--id", "--page"]);
        assert_eq!(comments.summary, "Comments of a post.");
        assert_eq!(
            comments.description.as_deref(),
            Some("Comments of a post. Newest first.")
        );
        assert_eq!(comments.ident, "get_posts_comments");
        assert_eq!(
            comments.path_segments,
            vec![
                PathSegment::Literal("/posts/".to_string()),
                PathSegment::Param("id".to_string()),
                PathSegment::Literal("/comments".to_string()),
            ]
        );
        assert!(!comments.has_request_body);
        Ok(())
    }

    #[test]
    fn test_body_command() -> Result<()> {
        let spec = blog();
        let commands = build(&spec, CommandNaming::Path, &OperationFilter::default())?;
        let post = &commands[2];
        assert_eq!(post.name.as_str(), "post-posts");
        assert!(post.has_request_body);
        assert_eq!(post.body_content_type.as_deref(), Some("application/json"));
        assert_eq!(post.flags(), vec!["--base-url", "--data"]);
        assert_eq!(post.parameters[0].source, ParameterSource::Body);
        assert_eq!(post.summary, "POST /posts");
        Ok(())
    }

    #[test]
    fn test_filter_by_name_and_operation_id() -> Result<()> {
        let spec = blog();
        let filter = OperationFilter::new(
            vec!["listPosts".to_string(), "get-posts-comments".to_string()],
            vec!["get-posts-comments".to_string()],
        );
        let commands = build(&spec, CommandNaming::OperationId, &filter)?;
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["list-posts"]);
        Ok(())
    }

    #[test]
    fn test_command_collision() {
        let spec = OpenApiContext::parse_str(
            r#"{
                "openapi": "3.0.0",
                "paths": {
                    "/a": {"get": {"operationId": "fetch_item"}},
                    "/b": {"get": {"operationId": "fetchItem"}}
                }
            }"#,
            SpecFormat::Json,
        )
        .unwrap();
        let err = build(&spec, CommandNaming::OperationId, &OperationFilter::default())
            .unwrap_err();
        match err {
            Error::CommandCollision {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "fetch-item");
                assert_eq!(first, "GET /a");
                assert_eq!(second, "GET /b");
            }
            other => panic!("expected a command collision, got {other}"),
        }

        // Excluding one side resolves the clash
        let filter = OperationFilter::new(Vec::new(), vec!["fetchItem".to_string()]);
        let commands = build(&spec, CommandNaming::OperationId, &filter).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].path, "/a");
    }

    #[test]
    fn test_clashing_flags_are_disambiguated() -> Result<()> {
        let spec = OpenApiContext::parse_str(
            r#"{
                "openapi": "3.0.0",
                "paths": {
                    "/posts/{id}": {"put": {
                        "parameters": [
                            {"name": "id", "in": "path", "required": true},
                            {"name": "id", "in": "query"},
                            {"name": "data", "in": "query"},
                            {"name": "pageSize", "in": "query"},
                            {"name": "page_size", "in": "query"}
                        ],
                        "requestBody": {"content": {"application/json": {}}}
                    }}
                }
            }"#,
            SpecFormat::Json,
        )?;
        let commands = build(&spec, CommandNaming::Path, &OperationFilter::default())?;
        let put = &commands[0];
        assert_eq!(
            put.flags(),
            vec![
                "--base-url",
                "--id",
                "--query-id",
                "--query-data",
                "--page-size",
                "--query-page-size",
                "--data"
            ]
        );
        // The path segment points at the path parameter, not the query one
        assert_eq!(put.path_segments[1], PathSegment::Param("id".to_string()));
        Ok(())
    }

    #[test]
    fn test_excluded_operation_is_never_built() -> Result<()> {
        let spec = OpenApiContext::parse_str(
            r#"{
                "openapi": "3.0.0",
                "paths": {
                    "/broken/{id}": {"get": {"operationId": "broken"}},
                    "/fine": {"get": {"operationId": "fine"}}
                }
            }"#,
            SpecFormat::Json,
        )?;
        let err = build(&spec, CommandNaming::OperationId, &OperationFilter::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedPathParameter { .. }));

        let filter = OperationFilter::new(Vec::new(), vec!["broken".to_string()]);
        let commands = build(&spec, CommandNaming::OperationId, &filter)?;
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].name.as_str(), "fine");
        Ok(())
    }

    #[test]
    fn test_empty_paths_yield_no_commands() -> Result<()> {
        let spec = OpenApiContext::parse_str(r#"{"openapi": "3.1.0", "paths": {}}"#, SpecFormat::Json)?;
        assert!(build(&spec, CommandNaming::default(), &OperationFilter::default())?.is_empty());
        Ok(())
    }
}
