use std::collections::HashSet;

use minijinja::{Environment, context};
use psg_core::ir::Operation;
use psg_core::transform::name_normalizer::{
    derive_method_name, path_params, route_template, service_name,
};
use psg_core::{GeneratedFile, GeneratedService, GeneratorError};

use super::{render_error, service_file_name};

/// Type given to every path parameter in a generated signature.
const PATH_PARAM_TYPE: &str = "string | number";

/// Trailing parameter added to verbs that send a body.
const PAYLOAD_PARAM: &str = "data?: any";

/// Emit the service file for `tag`: one class with an async method per
/// operation, named by [`service_name`].
///
/// Methods follow group order. Two operations deriving the same method name
/// are both emitted unless `strict` is set, in which case generation fails.
pub fn emit_service(
    tag: &str,
    operations: &[Operation],
    strict: bool,
) -> Result<GeneratedService, GeneratorError> {
    let service_name = service_name(tag);

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_template("service.ts.j2", include_str!("../../templates/service.ts.j2"))
        .map_err(render_error)?;
    let tmpl = env.get_template("service.ts.j2").map_err(render_error)?;

    let mut seen = HashSet::new();
    let mut methods = Vec::with_capacity(operations.len());
    for op in operations {
        let name = derive_method_name(
            &op.verb,
            Some(op.route.as_str()),
            op.operation_id.as_deref(),
        );
        if !seen.insert(name.clone()) {
            if strict {
                return Err(GeneratorError::AmbiguousMethodName {
                    service: service_name,
                    method: name,
                });
            }
            log::warn!(
                "{service_name}: `{} {}` derives `{name}`, which is already taken",
                op.verb,
                op.route
            );
        }
        methods.push(build_method(op, name));
    }

    let content = tmpl
        .render(context! {
            service_name => service_name.clone(),
            methods => methods,
        })
        .map_err(render_error)?;

    Ok(GeneratedService {
        file: GeneratedFile {
            path: service_file_name(&service_name),
            content,
        },
        name: service_name,
        operations: operations.to_vec(),
    })
}

fn build_method(op: &Operation, name: String) -> minijinja::Value {
    let has_payload = op.needs_payload();

    let mut params: Vec<String> = path_params(&op.route)
        .into_iter()
        .map(|p| format!("{p}: {PATH_PARAM_TYPE}"))
        .collect();
    if has_payload {
        params.push(PAYLOAD_PARAM.to_string());
    }

    context! {
        name => name,
        verb => op.verb.to_lowercase(),
        route => route_template(&op.route),
        params_signature => params.join(", "),
        has_payload => has_payload,
    }
}
