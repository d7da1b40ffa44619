pub mod spec;

use indexmap::IndexMap;

use crate::error::ParseError;
use spec::{OperationDetails, RawOperation, RawPathItem, RawPaths, RawSpec, SwaggerSpec};

/// Parse a spec document from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerSpec, ParseError> {
    let raw: RawSpec = serde_yaml_ng::from_str(input)?;
    check_paths(raw)
}

/// Parse a spec document from JSON.
pub fn from_json(input: &str) -> Result<SwaggerSpec, ParseError> {
    let raw: RawSpec = serde_json::from_str(input)?;
    check_paths(raw)
}

/// Parse a spec document, picking JSON when the content opens with `{`.
pub fn from_str(input: &str) -> Result<SwaggerSpec, ParseError> {
    if input.trim_start().starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}

fn check_paths(raw: RawSpec) -> Result<SwaggerSpec, ParseError> {
    let raw_paths = match raw.paths {
        Some(RawPaths::Map(map)) => map,
        Some(RawPaths::Other(_)) => {
            return Err(ParseError::MalformedSpec(
                "`paths` is not a mapping".to_string(),
            ));
        }
        None => {
            return Err(ParseError::MalformedSpec("`paths` is missing".to_string()));
        }
    };

    let mut paths = IndexMap::with_capacity(raw_paths.len());
    for (route, item) in raw_paths {
        let methods = match item {
            RawPathItem::Map(methods) => methods,
            RawPathItem::Other(_) => {
                return Err(ParseError::MalformedSpec(format!(
                    "path item `{route}` is not a mapping"
                )));
            }
        };

        let operations: IndexMap<String, OperationDetails> = methods
            .into_iter()
            .map(|(verb, op)| match op {
                RawOperation::Details(details) => (verb, details),
                RawOperation::List(_) | RawOperation::Other(_) => {
                    log::debug!("`{route}` has non-object entry `{verb}`, treating it as a bare operation");
                    (verb, OperationDetails::default())
                }
            })
            .collect();
        paths.insert(route, operations);
    }

    Ok(SwaggerSpec {
        spec_version: raw.swagger.or(raw.openapi).map(version_string),
        info: raw.info,
        paths,
    })
}

/// `swagger: 2.0` arrives as a number when the YAML leaves it unquoted.
fn version_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}
