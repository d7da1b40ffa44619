use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed spec: {0}")]
    MalformedSpec(String),
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("ambiguous method name `{method}` in {service}")]
    AmbiguousMethodName { service: String, method: String },

    #[error("refusing to merge fixture file, line {line}: {reason}")]
    MalformedFixture { line: usize, reason: String },

    #[error("template render failed: {0}")]
    Render(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}
