pub mod fixtures;
pub mod service;
pub mod skeleton;

use std::path::{Component, Path, PathBuf};

use psg_core::GeneratorError;

/// File name for a generated service class.
pub fn service_file_name(service_name: &str) -> String {
    format!("{service_name}.ts")
}

/// Module specifier `base.ts` uses to import a service.
///
/// `output_dir` is expressed relative to `tests_dir`, `./`-prefixed when it
/// does not climb out of it. Both directories must already be absolute.
///
/// - tests `/p/tests`, output `/p/services` → `../services/UsersService.js`
/// - tests `/p/tests`, output `/p/tests/api` → `./api/UsersService.js`
pub fn import_path(tests_dir: &Path, output_dir: &Path, service_name: &str, extension: &str) -> String {
    let from = normalize(tests_dir);
    let to = normalize(output_dir);

    let common = from
        .components()
        .zip(to.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in from.components().skip(common) {
        parts.push("..".to_string());
    }
    for component in to.components().skip(common) {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }

    let dir = match parts.first().map(String::as_str) {
        Some("..") => parts.join("/"),
        Some(_) => format!("./{}", parts.join("/")),
        None => ".".to_string(),
    };

    format!("{dir}/{service_name}{extension}")
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn render_error(err: minijinja::Error) -> GeneratorError {
    GeneratorError::Render(err.to_string())
}
