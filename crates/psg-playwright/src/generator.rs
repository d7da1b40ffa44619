use psg_core::ir::OperationGroups;
use psg_core::{CodeGenerator, GeneratedService, GeneratorError};

use crate::emitters;

/// Playwright service generator: one `APIRequestContext`-backed class per tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaywrightGenerator {
    /// Fail on duplicate method names instead of emitting both.
    pub strict: bool,
}

impl CodeGenerator for PlaywrightGenerator {
    fn generate(&self, groups: &OperationGroups) -> Result<Vec<GeneratedService>, GeneratorError> {
        groups
            .iter()
            .map(|(tag, operations)| emitters::service::emit_service(tag, operations, self.strict))
            .collect()
    }
}
