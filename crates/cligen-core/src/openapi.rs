//! OpenAPI specification loading and operation extraction.
//!
//! This module reads an OpenAPI 3.x document from YAML or JSON and exposes the
//! raw operations (one per path and HTTP method) with parameters merged and
//! local `$ref`s resolved. Turning operations into commands is the job of
//! [`crate::builders`].
//!
//! # Examples
//!
//! ```no_run
//! use cligen_core::openapi::OpenApiContext;
//! use cligen_core::error::Result;
//!
//! # fn main() -> Result<()> {
//! let spec = OpenApiContext::from_file("openapi.yaml")?;
//!
//! if let Some(title) = spec.title() {
//!     println!("API Title: {}", title);
//! }
//! for op in spec.parse_operations()? {
//!     println!("{} {}", op.method, op.path);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// Longest `$ref` chain followed before the reference is treated as cyclic
const MAX_REF_DEPTH: usize = 32;

/// Serialization format of a spec document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// Detect the format from a file extension, if it is a known one
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse(self, content: &str) -> std::result::Result<JsonValue, String> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for SpecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// HTTP methods an OpenAPI path item can carry, in extraction order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// The lowercase key used for this method inside a path item
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

/// Represents an OpenAPI specification
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct OpenApiContext {
    /// The raw JSON value of the OpenAPI spec
    pub json: JsonValue,
}

impl OpenApiContext {
    /// Load a spec from a file (YAML or JSON).
    ///
    /// Files ending in `.json`, `.yaml` or `.yml` are parsed in that format and a
    /// parse failure is a [`Error::MalformedSpec`]. Any other file is sniffed;
    /// content that is neither a JSON nor a YAML mapping is an
    /// [`Error::UnsupportedFormat`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let json = match SpecFormat::from_path(path) {
            Some(format) => format.parse(&content).map_err(|e| {
                Error::malformed(format!(
                    "failed to parse {} as {}: {}",
                    path.display(),
                    format,
                    e
                ))
            })?,
            None => Self::sniff(&content).ok_or_else(|| Error::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "content is neither a JSON nor a YAML document".to_string(),
            })?,
        };

        let spec = Self::from_value(json)?;
        log::info!(
            "Loaded OpenAPI spec {} ({} {})",
            path.display(),
            spec.title().unwrap_or("untitled"),
            spec.version().unwrap_or("unversioned")
        );
        Ok(spec)
    }

    /// Parse in-memory content in a known format
    pub fn parse_str(content: &str, format: SpecFormat) -> Result<Self> {
        let json = format
            .parse(content)
            .map_err(|e| Error::malformed(format!("failed to parse {}: {}", format, e)))?;
        Self::from_value(json)
    }

    /// Wrap an already parsed document after checking its OpenAPI structure
    pub fn from_value(json: JsonValue) -> Result<Self> {
        let root = json
            .as_object()
            .ok_or_else(|| Error::malformed("document root must be a mapping"))?;

        match root.get("openapi") {
            Some(version) => {
                let version = scalar_text(version);
                if !version.starts_with("3.") {
                    return Err(Error::UnsupportedVersion(version));
                }
            }
            None => {
                return Err(match root.get("swagger") {
                    Some(version) => Error::UnsupportedVersion(scalar_text(version)),
                    None => Error::malformed("missing 'openapi' version field"),
                });
            }
        }

        if !root.get("paths").is_some_and(JsonValue::is_object) {
            return Err(Error::malformed("missing 'paths' object"));
        }

        Ok(Self { json })
    }

    /// Try JSON for brace-delimited content, then YAML; only mappings count
    fn sniff(content: &str) -> Option<JsonValue> {
        if content.trim_start().starts_with('{') {
            if let Ok(json) = serde_json::from_str::<JsonValue>(content) {
                return json.is_object().then_some(json);
            }
        }
        serde_yaml::from_str::<JsonValue>(content)
            .ok()
            .filter(JsonValue::is_object)
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    /// Get the version of the API
    pub fn version(&self) -> Option<&str> {
        self.json.get("info")?.get("version")?.as_str()
    }

    /// Get the description of the API
    pub fn description(&self) -> Option<&str> {
        self.json.get("info")?.get("description")?.as_str()
    }

    /// Get the URL of the first declared server
    pub fn server_url(&self) -> Option<&str> {
        self.json
            .get("servers")?
            .as_array()?
            .first()?
            .get("url")?
            .as_str()
    }

    fn paths(&self) -> Result<&JsonMap<String, JsonValue>> {
        self.json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::malformed("missing 'paths' object"))
    }

    /// Follow local `$ref`s until a non-reference value is reached
    pub fn resolve<'a>(&'a self, value: &'a JsonValue) -> Result<&'a JsonValue> {
        let mut current = value;
        for _ in 0..MAX_REF_DEPTH {
            let Some(reference) = current.get("$ref").and_then(JsonValue::as_str) else {
                return Ok(current);
            };
            let pointer = reference.strip_prefix('#').ok_or_else(|| {
                Error::malformed(format!("external reference '{}' is not supported", reference))
            })?;
            current = self
                .json
                .pointer(pointer)
                .ok_or_else(|| Error::malformed(format!("unresolved reference '{}'", reference)))?;
        }
        Err(Error::malformed(format!(
            "reference chain starting at {} is cyclic",
            value
        )))
    }

    /// Parse all operations, in document path order and fixed method order
    pub fn parse_operations(&self) -> Result<Vec<OpenApiOperation>> {
        let mut operations = Vec::new();

        for (path, item) in self.paths()? {
            let item = self.resolve(item)?.as_object().ok_or_else(|| {
                Error::malformed(format!("path item '{}' must be a mapping", path))
            })?;
            let path_level = self.extract_parameters(item.get("parameters"), path)?;

            for method in HttpMethod::ALL {
                let Some(op) = item.get(method.as_str()) else {
                    continue;
                };
                let location = format!("{} {}", method, path);
                let op = self.resolve(op)?.as_object().ok_or_else(|| {
                    Error::malformed(format!("operation {} must be a mapping", location))
                })?;

                let operation_level = self.extract_parameters(op.get("parameters"), &location)?;
                let request_body = op
                    .get("requestBody")
                    .map(|body| self.extract_request_body(body, &location))
                    .transpose()?;

                operations.push(OpenApiOperation {
                    method,
                    path: path.clone(),
                    operation_id: string_field(op, "operationId"),
                    summary: string_field(op, "summary"),
                    description: string_field(op, "description"),
                    deprecated: op
                        .get("deprecated")
                        .and_then(JsonValue::as_bool)
                        .unwrap_or(false),
                    parameters: merge_parameters(path_level.clone(), operation_level),
                    request_body,
                });
            }
        }

        log::debug!("Parsed {} operations", operations.len());
        Ok(operations)
    }

    /// Extract and resolve a `parameters` array
    pub fn extract_parameters(
        &self,
        parameters: Option<&JsonValue>,
        location: &str,
    ) -> Result<Vec<OpenApiParameter>> {
        let Some(parameters) = parameters else {
            return Ok(Vec::new());
        };
        let parameters = parameters.as_array().ok_or_else(|| {
            Error::malformed(format!("parameters of {} must be a list", location))
        })?;

        parameters
            .iter()
            .map(|param| {
                let param = self.resolve(param)?;
                serde_json::from_value(param.clone()).map_err(|e| {
                    Error::malformed(format!("invalid parameter in {}: {}", location, e))
                })
            })
            .collect()
    }

    /// Reduce a request body to whether it is required and its media type
    pub fn extract_request_body(
        &self,
        body: &JsonValue,
        location: &str,
    ) -> Result<OpenApiRequestBody> {
        let body = self.resolve(body)?.as_object().ok_or_else(|| {
            Error::malformed(format!("request body of {} must be a mapping", location))
        })?;

        let content_type = body
            .get("content")
            .and_then(JsonValue::as_object)
            .and_then(|content| {
                let keys: Vec<&String> = content.keys().collect();
                keys.iter()
                    .find(|k| k.as_str() == "application/json")
                    .or_else(|| keys.iter().find(|k| k.contains("json")))
                    .or_else(|| keys.first())
                    .map(|k| k.to_string())
            });

        Ok(OpenApiRequestBody {
            required: body
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            content_type,
        })
    }
}

fn string_field(map: &JsonMap<String, JsonValue>, key: &str) -> Option<String> {
    map.get(key).and_then(JsonValue::as_str).map(String::from)
}

fn scalar_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Operation-level parameters override path-level ones with the same name and location
fn merge_parameters(
    mut merged: Vec<OpenApiParameter>,
    overrides: Vec<OpenApiParameter>,
) -> Vec<OpenApiParameter> {
    for param in overrides {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.in_ == param.in_)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

/// One HTTP method on one path, as declared in the document
#[derive(Clone, Debug)]
pub struct OpenApiOperation {
    pub method: HttpMethod,
    /// The path template (e.g., "/posts/{id}/comments")
    pub path: String,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Path-level and operation-level parameters, merged
    pub parameters: Vec<OpenApiParameter>,
    pub request_body: Option<OpenApiRequestBody>,
}

/// Information about a single parameter in an OpenAPI operation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct OpenApiParameter {
    /// The name of the parameter. Parameter names are case sensitive.
    pub name: String,
    /// The location of the parameter. Possible values: "query", "header", "path", or "cookie".
    #[serde(rename = "in")]
    pub in_: String,
    /// A brief description of the parameter.
    pub description: Option<String>,
    /// Determines whether this parameter is mandatory. Path parameters are always required.
    pub required: Option<bool>,
    /// The schema defining the type used for the parameter.
    pub schema: Option<JsonValue>,
}

/// The parts of a request body the generated script needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenApiRequestBody {
    pub required: bool,
    /// Preferred media type (`application/json` when declared)
    pub content_type: Option<String>,
}
