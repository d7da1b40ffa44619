use crate::ir::grouping::primary_tag;
use crate::ir::{Operation, OperationGroups};
use crate::parse::spec::SwaggerSpec;

/// Partition every (route, verb) pair of the spec into groups by primary tag.
///
/// Routes are visited in document order, then verbs within each route, so
/// identical input always yields identical groups.
pub fn group_operations(spec: &SwaggerSpec) -> OperationGroups {
    let mut groups = OperationGroups::new();

    for (route, methods) in &spec.paths {
        for (verb, details) in methods {
            groups.push(Operation {
                route: route.clone(),
                verb: verb.to_lowercase(),
                operation_id: details.operation_id.clone(),
                tag: primary_tag(&details.tags).to_string(),
                description: details.description.clone().unwrap_or_default(),
            });
        }
    }

    log::debug!(
        "grouped {} operations into {} tags",
        groups.operation_count(),
        groups.len()
    );
    groups
}
