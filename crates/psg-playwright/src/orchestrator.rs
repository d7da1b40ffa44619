use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use psg_core::config::PsgConfig;
use psg_core::parse::spec::SwaggerSpec;
use psg_core::transform::group_operations;
use psg_core::{CodeGenerator, GeneratorError};

use crate::emitters::fixtures::{FixtureEntry, merge_fixture_file};
use crate::emitters::import_path;
use crate::emitters::skeleton::{SKELETON_FILE_NAME, emit_skeleton_test};
use crate::generator::PlaywrightGenerator;

/// File name of the fixture aggregator inside the tests directory.
pub const FIXTURE_FILE_NAME: &str = "base.ts";

/// Where and how a generation run writes its output.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub output_dir: PathBuf,
    pub tests_dir: PathBuf,
    pub merge: bool,
    pub strict: bool,
    pub skeleton: bool,
    pub import_extension: String,
}

impl From<&PsgConfig> for GenerateOptions {
    fn from(config: &PsgConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&config.output),
            tests_dir: PathBuf::from(&config.tests_dir),
            merge: config.merge,
            strict: config.strict,
            skeleton: config.skeleton,
            import_extension: config.import_extension.clone(),
        }
    }
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Services generated by this run, in tag order.
    pub services: Vec<String>,
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
}

/// Generate service files and update the fixture aggregator.
///
/// All services are emitted in memory before anything touches the disk, so
/// a strict-mode name collision leaves the output untouched. The fixture file
/// is rewritten under an exclusive lock.
pub fn generate(
    spec: &SwaggerSpec,
    options: &GenerateOptions,
) -> Result<GenerationReport, GeneratorError> {
    let groups = group_operations(spec);
    let generator = PlaywrightGenerator {
        strict: options.strict,
    };
    let services = generator.generate(&groups)?;

    let mut names = HashSet::new();
    for service in &services {
        if !names.insert(service.name.as_str()) {
            log::warn!(
                "two tags map to {}, the later one overwrites {}",
                service.name,
                service.file.path
            );
        }
    }

    let output_dir = absolute(&options.output_dir)?;
    let tests_dir = absolute(&options.tests_dir)?;
    let mut report = GenerationReport::default();

    fs::create_dir_all(&output_dir).map_err(|e| GeneratorError::io(&output_dir, e))?;
    for service in &services {
        let path = output_dir.join(&service.file.path);
        fs::write(&path, &service.file.content).map_err(|e| GeneratorError::io(&path, e))?;
        log::info!(
            "generated {} ({} methods) in {}",
            service.name,
            service.operations.len(),
            path.display()
        );
        report.services.push(service.name.clone());
        report.written.push(path);
    }

    let entries: Vec<FixtureEntry> = report
        .services
        .iter()
        .map(|name| {
            FixtureEntry::new(
                name,
                import_path(&tests_dir, &output_dir, name, &options.import_extension),
            )
        })
        .collect();

    fs::create_dir_all(&tests_dir).map_err(|e| GeneratorError::io(&tests_dir, e))?;
    let fixture_path = tests_dir.join(FIXTURE_FILE_NAME);
    write_fixture_file(&fixture_path, &entries, options.merge)?;
    log::info!("updated {}", fixture_path.display());
    report.written.push(fixture_path);

    if options.skeleton {
        let skeleton_path = tests_dir.join(SKELETON_FILE_NAME);
        if skeleton_path.exists() {
            log::debug!("{} exists, leaving it alone", skeleton_path.display());
        } else {
            fs::write(&skeleton_path, emit_skeleton_test())
                .map_err(|e| GeneratorError::io(&skeleton_path, e))?;
            report.written.push(skeleton_path);
        }
    }

    Ok(report)
}

fn absolute(path: &Path) -> Result<PathBuf, GeneratorError> {
    std::path::absolute(path).map_err(|e| GeneratorError::io(path, e))
}

/// Read, merge and rewrite the fixture file while holding an exclusive lock.
fn write_fixture_file(
    path: &Path,
    entries: &[FixtureEntry],
    merge: bool,
) -> Result<(), GeneratorError> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| GeneratorError::io(path, e))?;

    file.lock_exclusive()
        .map_err(|e| GeneratorError::io(path, e))?;
    let result = rewrite_locked(&mut file, path, entries, merge);
    release(path, result, file.unlock())
}

/// Combine the rewrite outcome with the unlock outcome, preferring the
/// rewrite error when both failed.
fn release(
    path: &Path,
    result: Result<(), GeneratorError>,
    unlocked: io::Result<()>,
) -> Result<(), GeneratorError> {
    match (result, unlocked) {
        (Ok(()), Err(e)) => Err(GeneratorError::io(path, e)),
        (Err(err), Err(e)) => {
            log::warn!("failed to unlock {}: {e}", path.display());
            Err(err)
        }
        (result, Ok(())) => result,
    }
}

fn rewrite_locked(
    file: &mut File,
    path: &Path,
    entries: &[FixtureEntry],
    merge: bool,
) -> Result<(), GeneratorError> {
    let io_err = |e| GeneratorError::io(path, e);

    let mut existing = String::new();
    file.read_to_string(&mut existing).map_err(io_err)?;

    let has_content = !existing.trim().is_empty();
    if has_content && !merge {
        log::info!("merge disabled, overwriting {}", path.display());
    }
    let prior = (merge && has_content).then_some(existing.as_str());
    let content = merge_fixture_file(prior, entries)?;

    file.set_len(0).map_err(io_err)?;
    file.seek(SeekFrom::Start(0)).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)
}
