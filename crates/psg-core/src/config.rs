use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level project configuration loaded from `.psg.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PsgConfig {
    /// Spec location: an `http(s)://` URL or a local path.
    pub input: String,
    /// Directory receiving one `<Tag>Service.ts` per tag.
    pub output: String,
    /// Directory receiving `base.ts` and the skeleton test.
    pub tests_dir: String,
    /// Merge with an existing `base.ts` instead of overwriting it.
    pub merge: bool,
    /// Fail when two operations in one tag derive the same method name.
    pub strict: bool,
    /// Emit `skeleton-test.ts` when the tests directory has none.
    pub skeleton: bool,
    /// Suffix appended to service module paths in `base.ts` imports.
    pub import_extension: String,
}

impl Default for PsgConfig {
    fn default() -> Self {
        Self {
            input: DEFAULT_INPUT.to_string(),
            output: "services".to_string(),
            tests_dir: "tests".to_string(),
            merge: true,
            strict: false,
            skeleton: true,
            import_extension: ".js".to_string(),
        }
    }
}

/// Spec used when neither the config nor the command line names one.
pub const DEFAULT_INPUT: &str = "https://petstore.swagger.io/v2/swagger.json";

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".psg.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<PsgConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: PsgConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# psg configuration
input: https://petstore.swagger.io/v2/swagger.json   # URL or local path (JSON or YAML)
output: services        # one <Tag>Service.ts per tag
tests_dir: tests        # base.ts fixture aggregator lives here

merge: true             # keep services from earlier runs in base.ts
strict: false           # fail when two operations in a tag get the same method name
skeleton: true          # write tests/skeleton-test.ts if missing
import_extension: .js   # suffix for service imports in base.ts
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PsgConfig::default();
        assert_eq!(config.input, DEFAULT_INPUT);
        assert_eq!(config.output, "services");
        assert_eq!(config.tests_dir, "tests");
        assert!(config.merge);
        assert!(!config.strict);
        assert!(config.skeleton);
        assert_eq!(config.import_extension, ".js");
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: ./openapi.json
output: src/services/v2
tests_dir: e2e
merge: false
strict: true
skeleton: false
import_extension: ""
"#;
        let config: PsgConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "./openapi.json");
        assert_eq!(config.output, "src/services/v2");
        assert_eq!(config.tests_dir, "e2e");
        assert!(!config.merge);
        assert!(config.strict);
        assert!(!config.skeleton);
        assert_eq!(config.import_extension, "");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: PsgConfig = serde_yaml_ng::from_str("output: api\n").unwrap();
        assert_eq!(config.output, "api");
        // Defaults applied
        assert_eq!(config.tests_dir, "tests");
        assert!(config.merge);
    }

    #[test]
    fn test_default_content_parses() {
        let config: PsgConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.output, "services");
        assert_eq!(config.import_extension, ".js");
    }
}
