use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use psg_core::config::{self, CONFIG_FILE_NAME, PsgConfig};
use psg_core::ir::OperationGroups;
use psg_core::parse::{self, spec::SwaggerSpec};
use psg_core::transform::{self, name_normalizer};
use psg_playwright::{GenerateOptions, generate};

#[derive(Parser)]
#[command(name = "psg", about = "Playwright service generator for Swagger/OpenAPI specs", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate service classes and the fixture file
    Generate {
        /// URL or path of the Swagger/OpenAPI spec (JSON or YAML)
        #[arg(short = 's', long, env = "SWAGGER_URL")]
        swagger_url: Option<String>,

        /// Output directory for generated services
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Directory holding base.ts
        #[arg(short, long)]
        tests_dir: Option<PathBuf>,

        /// Overwrite base.ts instead of merging with it
        #[arg(long)]
        no_merge: bool,

        /// Fail when two operations in a tag derive the same method name
        #[arg(long)]
        strict: bool,

        /// Do not write skeleton-test.ts
        #[arg(long)]
        no_skeleton: bool,
    },

    /// Validate a spec and report what would be generated
    Validate {
        /// URL or path of the spec
        #[arg(short = 's', long, env = "SWAGGER_URL")]
        swagger_url: Option<String>,
    },

    /// Show the services and method names a spec produces
    Inspect {
        /// URL or path of the spec
        #[arg(short = 's', long, env = "SWAGGER_URL")]
        swagger_url: Option<String>,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new psg configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            swagger_url,
            output_dir,
            tests_dir,
            no_merge,
            strict,
            no_skeleton,
        } => {
            let mut cfg = try_load_config()?.unwrap_or_default();
            if let Some(url) = swagger_url {
                cfg.input = url;
            }
            if let Some(dir) = output_dir {
                cfg.output = dir.to_string_lossy().into_owned();
            }
            if let Some(dir) = tests_dir {
                cfg.tests_dir = dir.to_string_lossy().into_owned();
            }
            cfg.merge &= !no_merge;
            cfg.strict |= strict;
            cfg.skeleton &= !no_skeleton;
            cmd_generate(&cfg)
        }

        Commands::Validate { swagger_url } => cmd_validate(swagger_url),

        Commands::Inspect {
            swagger_url,
            format,
        } => cmd_inspect(swagger_url, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "psg", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<PsgConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Spec location from the flag, else the config file, else the default.
fn resolve_input(flag: Option<String>) -> Result<String> {
    match flag {
        Some(input) => Ok(input),
        None => Ok(try_load_config()?.unwrap_or_default().input),
    }
}

/// Fetch over HTTP(S) or read from disk.
fn read_spec_source(location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        eprintln!("Fetching spec from {location}");
        let response = reqwest::blocking::get(location)
            .with_context(|| format!("failed to fetch {location}"))?
            .error_for_status()
            .with_context(|| format!("failed to fetch {location}"))?;
        response
            .text()
            .with_context(|| format!("failed to read response body from {location}"))
    } else {
        fs::read_to_string(location).with_context(|| format!("failed to read {location}"))
    }
}

fn load_spec(location: &str) -> Result<SwaggerSpec> {
    let content = read_spec_source(location)?;
    let spec =
        parse::from_str(&content).with_context(|| format!("failed to parse spec {location}"))?;
    log::debug!(
        "parsed {} routes ({} operations) from {location}",
        spec.paths.len(),
        spec.operation_count()
    );
    Ok(spec)
}

fn cmd_generate(cfg: &PsgConfig) -> Result<()> {
    let spec = load_spec(&cfg.input)?;

    let options = GenerateOptions::from(cfg);
    let report = generate(&spec, &options)?;

    for path in &report.written {
        eprintln!("  wrote {}", path.display());
    }
    eprintln!(
        "Generated {} services: {}",
        report.services.len(),
        report.services.join(", ")
    );
    Ok(())
}

fn cmd_validate(swagger_url: Option<String>) -> Result<()> {
    let input = resolve_input(swagger_url)?;
    let spec = load_spec(&input)?;
    let groups = transform::group_operations(&spec);

    match (&spec.spec_version, &spec.info) {
        (Some(version), Some(info)) => {
            eprintln!("Valid spec ({version}): {} {}", info.title, info.version)
        }
        (Some(version), None) => eprintln!("Valid spec ({version})"),
        (None, _) => eprintln!("Valid spec (no version field)"),
    }
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!("  Operations: {}", groups.operation_count());
    eprintln!("  Services: {}", groups.len());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(swagger_url: Option<String>, format: InspectFormat) -> Result<()> {
    let input = resolve_input(swagger_url)?;
    let spec = load_spec(&input)?;
    let groups = transform::group_operations(&spec);

    let summary = build_inspect_summary(&groups);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(groups: &OperationGroups) -> serde_json::Value {
    let services: Vec<serde_json::Value> = groups
        .iter()
        .map(|(tag, operations)| {
            let methods: Vec<serde_json::Value> = operations
                .iter()
                .map(|op| {
                    serde_json::json!({
                        "name": name_normalizer::derive_method_name(
                            &op.verb,
                            Some(op.route.as_str()),
                            op.operation_id.as_deref(),
                        ),
                        "verb": op.verb,
                        "route": op.route,
                        "path_params": name_normalizer::path_params(&op.route),
                        "payload": op.needs_payload(),
                    })
                })
                .collect();
            serde_json::json!({
                "tag": tag,
                "service": name_normalizer::service_name(tag),
                "methods": methods,
            })
        })
        .collect();

    serde_json::json!({ "services": services })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
