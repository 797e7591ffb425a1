//! Parameter and path-template handling for command descriptors.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::command::{FlagType, ParameterDescriptor, ParameterSource, PathSegment};
use crate::error::{Error, Result};
use crate::openapi::{OpenApiContext, OpenApiOperation, OpenApiParameter};
use crate::utils::{normalize_whitespace, to_kebab_case, to_snake_case};

/// `{name}` placeholders in a path template
static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}/]+)\}").expect("placeholder pattern is valid")
});

/// Flags every generated subcommand already owns
pub const RESERVED_FLAGS: &[&str] = &["base-url", "help"];

/// Flag of the raw request body
pub const BODY_FLAG: &str = "data";

/// Placeholder names in order of first appearance
pub fn placeholders(path: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(path) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Split a path template into literal pieces and parameter references.
///
/// `lookup` maps a placeholder name to the `dest` of its parameter.
pub fn path_segments<'a>(path: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(path) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            segments.push(PathSegment::Literal(path[last..whole.start()].to_string()));
        }
        match lookup(&caps[1]) {
            Some(dest) => segments.push(PathSegment::Param(dest.to_string())),
            None => segments.push(PathSegment::Literal(whole.as_str().to_string())),
        }
        last = whole.end();
    }
    if last < path.len() {
        segments.push(PathSegment::Literal(path[last..].to_string()));
    }
    segments
}

/// Flag name for a wire name, never empty
pub fn flag_name(name: &str) -> String {
    let flag = to_kebab_case(name);
    if flag.is_empty() {
        "param".to_string()
    } else {
        flag
    }
}

/// ASCII identifier for a flag, never starting with a digit.
///
/// Non-ASCII characters become `_<hex codepoint>` so the name is valid in
/// both Python and Bash.
pub fn dest_name(flag: &str) -> String {
    let mut dest = String::new();
    let mut after_escape = false;
    for ch in to_snake_case(flag).chars() {
        let plain = ch.is_ascii_alphanumeric() || ch == '_';
        if !dest.is_empty() && !dest.ends_with('_') && (!plain || (after_escape && ch != '_')) {
            dest.push('_');
        }
        if plain {
            dest.push(ch);
        } else {
            dest.push_str(&format!("{:x}", ch as u32));
        }
        after_escape = !plain;
    }
    if dest.starts_with(|c: char| c.is_ascii_digit()) {
        format!("p_{}", dest)
    } else {
        dest
    }
}

/// Infer the flag type of a parameter schema, following one local `$ref` chain
pub fn infer_flag_type(spec: &OpenApiContext, schema: Option<&JsonValue>) -> Result<FlagType> {
    let Some(schema) = schema else {
        return Ok(FlagType::String);
    };
    let schema = spec.resolve(schema)?;
    let type_name = match schema.get("type") {
        Some(JsonValue::String(name)) => Some(name.as_str()),
        // OpenAPI 3.1 allows `type: [integer, "null"]`
        Some(JsonValue::Array(names)) => names
            .iter()
            .filter_map(JsonValue::as_str)
            .find(|name| *name != "null"),
        _ => None,
    };
    Ok(type_name.map(FlagType::from_openapi).unwrap_or_default())
}

/// Flags and identifiers already owned by a subcommand
struct TakenNames {
    flags: Vec<String>,
    dests: Vec<String>,
}

impl TakenNames {
    fn new(reserved: &[&str]) -> Self {
        Self {
            flags: reserved.iter().map(|f| f.to_string()).collect(),
            dests: reserved.iter().map(|f| dest_name(f)).collect(),
        }
    }

    fn contains(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag) || self.dests.contains(&dest_name(flag))
    }

    /// Take the parameter's flag, prefixing it with its source (and a
    /// counter if needed) when the plain name is already owned
    fn claim(&mut self, mut param: ParameterDescriptor) -> ParameterDescriptor {
        if self.contains(&param.flag) {
            let base = format!("{}-{}", param.source.as_str(), param.flag);
            let mut flag = base.clone();
            let mut counter = 2;
            while self.contains(&flag) {
                flag = format!("{}-{}", base, counter);
                counter += 1;
            }
            log::warn!(
                "Flag '--{}' of {} parameter '{}' is taken, using '--{}'",
                param.flag,
                param.source.as_str(),
                param.name,
                flag
            );
            param.dest = dest_name(&flag);
            param.flag = flag;
        }
        self.flags.push(param.flag.clone());
        self.dests.push(param.dest.clone());
        param
    }
}

fn descriptor(
    spec: &OpenApiContext,
    param: &OpenApiParameter,
    source: ParameterSource,
) -> Result<ParameterDescriptor> {
    let flag = flag_name(&param.name);
    Ok(ParameterDescriptor {
        name: param.name.clone(),
        dest: dest_name(&flag),
        flag,
        source,
        value_type: infer_flag_type(spec, param.schema.as_ref())?,
        required: source == ParameterSource::Path || param.required.unwrap_or(false),
        description: param
            .description
            .as_deref()
            .map(normalize_whitespace)
            .filter(|d| !d.is_empty()),
    })
}

/// Build the ordered flag list of an operation: path, query, then body.
///
/// Every placeholder must have an `in: path` declaration. Declared path
/// parameters missing from the template are dropped. Flags never clash:
/// `--base-url`, `--help` and (with a body) `--data` are reserved, and a
/// later parameter whose flag is taken gets a `path-`/`query-` prefix.
pub fn build_parameters(
    spec: &OpenApiContext,
    op: &OpenApiOperation,
) -> Result<Vec<ParameterDescriptor>> {
    let mut parameters = Vec::new();
    let mut taken = TakenNames::new(RESERVED_FLAGS);
    if op.request_body.is_some() {
        taken.flags.push(BODY_FLAG.to_string());
        taken.dests.push(BODY_FLAG.to_string());
    }

    for placeholder in placeholders(&op.path) {
        let param = op
            .parameters
            .iter()
            .find(|p| p.in_ == "path" && p.name == placeholder)
            .ok_or_else(|| Error::UnresolvedPathParameter {
                method: op.method.to_string(),
                path: op.path.clone(),
                parameter: placeholder.clone(),
            })?;
        parameters.push(taken.claim(descriptor(spec, param, ParameterSource::Path)?));
    }

    for param in &op.parameters {
        match param.in_.as_str() {
            "path" => {
                if !parameters
                    .iter()
                    .any(|p| p.source == ParameterSource::Path && p.name == param.name)
                {
                    log::warn!(
                        "Dropping path parameter '{}' of {} {}: not in the path template",
                        param.name,
                        op.method,
                        op.path
                    );
                }
            }
            "query" => {
                parameters.push(taken.claim(descriptor(spec, param, ParameterSource::Query)?))
            }
            other => log::debug!(
                "Skipping {} parameter '{}' of {} {}",
                other,
                param.name,
                op.method,
                op.path
            ),
        }
    }

    if op.request_body.is_some() {
        parameters.push(ParameterDescriptor {
            name: BODY_FLAG.to_string(),
            flag: BODY_FLAG.to_string(),
            dest: BODY_FLAG.to_string(),
            source: ParameterSource::Body,
            value_type: FlagType::String,
            required: false,
            description: Some("Raw JSON request body, sent verbatim".to_string()),
        });
    }

    Ok(parameters)
}
