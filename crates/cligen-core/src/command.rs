//! Command descriptors handed to the script template.
//!
//! A [`CommandDescriptor`] is built once per OpenAPI operation and never
//! mutated afterwards. Everything here serializes into the template context,
//! so field names are part of the template contract.

use std::fmt;

use serde::Serialize;

use crate::openapi::HttpMethod;
use crate::utils::to_kebab_case;

/// Name of a generated subcommand (kebab-case)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandName(String);

impl CommandName {
    /// Derive a name from the HTTP method and the literal path segments.
    ///
    /// `GET /posts/{id}/comments` becomes `get-posts-comments`; a path without
    /// literal segments becomes `<method>-root`.
    pub fn derive(method: HttpMethod, path: &str) -> Self {
        let mut parts = vec![method.as_str().to_string()];
        parts.extend(
            path.split('/')
                .filter(|segment| !is_placeholder(segment))
                .map(to_kebab_case)
                .filter(|segment| !segment.is_empty()),
        );
        if parts.len() == 1 {
            parts.push("root".to_string());
        }
        Self(parts.join("-"))
    }

    /// Kebab-case an operationId, if it has any usable characters
    pub fn from_operation_id(operation_id: &str) -> Option<Self> {
        let name = to_kebab_case(operation_id);
        (!name.is_empty()).then_some(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier form, safe for function names in generated code
    pub fn ident(&self) -> String {
        self.0.replace('-', "_")
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_placeholder(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

/// Where a flag's value goes in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterSource {
    Path,
    Query,
    Body,
}

impl ParameterSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterSource::Path => "path",
            ParameterSource::Query => "query",
            ParameterSource::Body => "body",
        }
    }
}

/// Value type of a flag, inferred from the parameter schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
}

impl FlagType {
    /// Map an OpenAPI primitive type; anything else is a string
    pub fn from_openapi(type_name: &str) -> Self {
        match type_name {
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            _ => Self::String,
        }
    }
}

/// One flag of a generated subcommand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    /// Name on the wire (path placeholder or query key)
    pub name: String,
    /// Flag name without the leading dashes
    pub flag: String,
    /// Identifier-safe variable name
    pub dest: String,
    pub source: ParameterSource,
    #[serde(rename = "type")]
    pub value_type: FlagType,
    pub required: bool,
    pub description: Option<String>,
}

/// A literal piece of a path template or a reference to a path parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PathSegment {
    Literal(String),
    /// Holds the `dest` of the matching path parameter
    Param(String),
}

/// Everything the template needs to emit one subcommand
#[derive(Debug, Clone, Serialize)]
pub struct CommandDescriptor {
    pub name: CommandName,
    pub ident: String,
    pub method: HttpMethod,
    pub path: String,
    pub path_segments: Vec<PathSegment>,
    pub operation_id: Option<String>,
    /// One-line help text
    pub summary: String,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Path parameters, then query parameters, then the body
    pub parameters: Vec<ParameterDescriptor>,
    pub has_request_body: bool,
    pub body_content_type: Option<String>,
}

impl CommandDescriptor {
    /// Flags in declaration order, including `base-url`
    pub fn flags(&self) -> Vec<String> {
        std::iter::once("--base-url".to_string())
            .chain(self.parameters.iter().map(|p| format!("--{}", p.flag)))
            .collect()
    }
}
