use indexmap::IndexMap;
use serde::Serialize;

use super::operations::Operation;

/// Tag assigned to operations that declare none.
pub const DEFAULT_TAG: &str = "Default";

/// Operations partitioned by primary tag.
///
/// Tags keep first-seen order and each tag keeps its operations in
/// spec-declaration order; both orders drive emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OperationGroups {
    groups: IndexMap<String, Vec<Operation>>,
}

impl OperationGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation to the group named by its tag.
    pub fn push(&mut self, op: Operation) {
        self.groups.entry(op.tag.clone()).or_default().push(op);
    }

    pub fn get(&self, tag: &str) -> Option<&[Operation]> {
        self.groups.get(tag).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Operation])> {
        self.groups
            .iter()
            .map(|(tag, ops)| (tag.as_str(), ops.as_slice()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn operation_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Pick the primary tag: the first declared tag, unless missing or blank.
pub fn primary_tag(tags: &[String]) -> &str {
    match tags.first() {
        Some(tag) if !tag.is_empty() => tag,
        _ => DEFAULT_TAG,
    }
}
