pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

pub use error::{GeneratorError, ParseError};

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// One service class emitted for a tag group.
#[derive(Debug, Clone)]
pub struct GeneratedService {
    /// `<tag>Service`.
    pub name: String,
    pub operations: Vec<ir::Operation>,
    /// Source file, relative to the output directory.
    pub file: GeneratedFile,
}

/// Trait for generators that turn tag groups into service sources.
pub trait CodeGenerator {
    fn generate(
        &self,
        groups: &ir::OperationGroups,
    ) -> Result<Vec<GeneratedService>, GeneratorError>;
}
