use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use minijinja::{Environment, context};
use psg_core::GeneratorError;
use psg_core::transform::name_normalizer::to_camel_case;
use regex::Regex;
use serde::Serialize;

use super::render_error;

/// Module the fixture file imports its `test` base from.
pub const FRAMEWORK_MODULE: &str = "@playwright/test";

static IMPORT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s*\{\s*([^}]*?)\s*\}\s*from\s*['"]([^'"]+)['"]\s*;?$"#)
        .expect("import pattern is valid")
});

/// One service wired into the fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureEntry {
    pub name: String,
    pub import_path: String,
}

impl FixtureEntry {
    pub fn new(name: impl Into<String>, import_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import_path: import_path.into(),
        }
    }
}

/// Ordered set of fixture entries keyed by service name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixtureSet {
    entries: IndexMap<String, String>,
}

impl FixtureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recover the entries of a previously generated fixture file.
    ///
    /// Every line starting with `import` must be a named import with exactly
    /// one binding; default imports, multi-line imports and binding lists are
    /// rejected so that prior entries are never dropped silently. The binding
    /// text is taken as written, which lets every name [`FixtureSet::render`]
    /// writes be read back. The framework import is skipped.
    pub fn parse(text: &str) -> Result<Self, GeneratorError> {
        let mut set = Self::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if !is_import(line) {
                continue;
            }

            let caps = IMPORT_LINE
                .captures(line)
                .ok_or_else(|| GeneratorError::MalformedFixture {
                    line: idx + 1,
                    reason: format!("unrecognised import `{line}`"),
                })?;
            let (binding, module) = (&caps[1], &caps[2]);

            if module == FRAMEWORK_MODULE {
                continue;
            }
            if binding.is_empty() || binding.contains(',') {
                return Err(GeneratorError::MalformedFixture {
                    line: idx + 1,
                    reason: format!("expected a single service in `{{ {binding} }}`"),
                });
            }

            if set.entries.insert(binding.to_string(), module.to_string()).is_some() {
                log::warn!("fixture file imports {binding} twice, keeping the last path");
            }
        }

        Ok(set)
    }

    /// Merge this run's services into the set.
    ///
    /// Existing entries not named in `new_entries` keep their relative order;
    /// every new entry follows them with its current import path.
    pub fn merge(&mut self, new_entries: &[FixtureEntry]) {
        let incoming: HashSet<&str> = new_entries.iter().map(|e| e.name.as_str()).collect();

        let before = self.entries.len();
        self.entries.retain(|name, _| !incoming.contains(name.as_str()));
        let kept = self.entries.len();

        for entry in new_entries {
            self.entries
                .insert(entry.name.clone(), entry.import_path.clone());
        }

        log::debug!(
            "fixture merge: kept {kept}, replaced {}, added {}",
            before - kept,
            self.entries.len() - before
        );
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = FixtureEntry> + '_ {
        self.entries
            .iter()
            .map(|(name, path)| FixtureEntry::new(name, path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the full fixture file for the current entries.
    pub fn render(&self) -> Result<String, GeneratorError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_template("base.ts.j2", include_str!("../../templates/base.ts.j2"))
            .map_err(render_error)?;
        let tmpl = env.get_template("base.ts.j2").map_err(render_error)?;

        let entries: Vec<minijinja::Value> = self
            .entries
            .iter()
            .map(|(name, path)| {
                context! {
                    name => name,
                    import_path => path,
                    field => to_camel_case(name),
                }
            })
            .collect();

        tmpl.render(context! {
            framework_module => FRAMEWORK_MODULE,
            entries => entries,
        })
        .map_err(render_error)
    }
}

fn is_import(line: &str) -> bool {
    line.strip_prefix("import")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '{']))
}

/// Produce the fixture file for `new_entries`, merged with `existing` when given.
pub fn merge_fixture_file(
    existing: Option<&str>,
    new_entries: &[FixtureEntry],
) -> Result<String, GeneratorError> {
    let mut set = match existing {
        Some(text) => FixtureSet::parse(text)?,
        None => FixtureSet::new(),
    };
    set.merge(new_entries);
    set.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[(&str, &str)]) -> Vec<FixtureEntry> {
        items
            .iter()
            .map(|(name, path)| FixtureEntry::new(*name, *path))
            .collect()
    }

    fn import_count(content: &str, name: &str) -> usize {
        content.matches(&format!("import {{ {name} }}")).count()
    }

    #[test]
    fn test_fresh_file() {
        let content = merge_fixture_file(
            None,
            &entries(&[("UsersService", "../services/UsersService.js")]),
        )
        .unwrap();

        insta::assert_snapshot!(content, @r"
        import { test as base } from '@playwright/test';
        import { UsersService } from '../services/UsersService.js';

        type MyFixtures = {
          usersService: UsersService;
        };

        export const test = base.extend<MyFixtures>({
          usersService: async ({ request }, use) => {
            const service = new UsersService(request);
            await use(service);
          }
        });

        export { expect } from '@playwright/test';
        ");
    }

    #[test]
    fn test_fresh_file_separates_fixtures_with_commas() {
        let content = merge_fixture_file(
            None,
            &entries(&[
                ("UsersService", "../services/UsersService.js"),
                ("ProductsService", "../services/ProductsService.js"),
            ]),
        )
        .unwrap();

        assert!(content.contains("import { UsersService } from '../services/UsersService.js';"));
        assert!(
            content.contains("import { ProductsService } from '../services/ProductsService.js';")
        );
        assert!(content.contains("  usersService: UsersService;\n  productsService: ProductsService;"));
        assert!(content.contains("    await use(service);\n  },\n  productsService:"));
        assert!(content.contains("    await use(service);\n  }\n});"));
    }

    #[test]
    fn test_idempotent() {
        let services = entries(&[
            ("petService", "../services/petService.js"),
            ("storeService", "../services/storeService.js"),
            ("userService", "../services/userService.js"),
        ]);
        let first = merge_fixture_file(None, &services).unwrap();
        let second = merge_fixture_file(Some(&first), &services).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_idempotent_for_any_service_name() {
        let names = [
            "Pet StoreService",
            "user-managementService",
            "CaféService",
            "2faService",
            "v1.usersService",
            "$rootService",
        ];
        for name in names {
            let services = entries(&[(name, "../services/x.js")]);
            let first = merge_fixture_file(None, &services).unwrap();
            let second = merge_fixture_file(Some(&first), &services)
                .unwrap_or_else(|e| panic!("{name:?}: {e}"));
            assert_eq!(first, second, "{name:?}");
            assert_eq!(FixtureSet::parse(&second).unwrap().get(name), Some("../services/x.js"));
        }

        let all: Vec<FixtureEntry> = names
            .iter()
            .map(|name| FixtureEntry::new(*name, format!("./{name}.js")))
            .collect();
        let first = merge_fixture_file(None, &all).unwrap();
        let second = merge_fixture_file(Some(&first), &all).unwrap();
        assert_eq!(first, second);
        assert_eq!(FixtureSet::parse(&second).unwrap().len(), names.len());
    }

    #[test]
    fn test_merging_nothing_keeps_the_file() {
        let first = merge_fixture_file(
            None,
            &entries(&[
                ("pet-storeService", "../services/pet-storeService.js"),
                ("UsersService", "../services/UsersService.js"),
            ]),
        )
        .unwrap();
        let merged = merge_fixture_file(Some(&first), &[]).unwrap();
        assert_eq!(merged, first);
    }

    #[test]
    fn test_merging_nothing_into_nothing() {
        let content = merge_fixture_file(None, &[]).unwrap();
        assert!(FixtureSet::parse(&content).unwrap().is_empty());
        assert_eq!(merge_fixture_file(Some(&content), &[]).unwrap(), content);
    }

    #[test]
    fn test_disjoint_merge_keeps_everything() {
        let s1 = entries(&[
            ("UsersV1Service", "../services/v1/UsersV1Service.js"),
            ("ProductsV1Service", "../services/v1/ProductsV1Service.js"),
        ]);
        let s2 = entries(&[("ProductsV2Service", "../services/v2/ProductsV2Service.js")]);

        let first = merge_fixture_file(None, &s1).unwrap();
        let merged = merge_fixture_file(Some(&first), &s2).unwrap();

        let set = FixtureSet::parse(&merged).unwrap();
        assert_eq!(set.len(), 3);
        let names: Vec<String> = set.entries().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec!["UsersV1Service", "ProductsV1Service", "ProductsV2Service"]
        );
        assert_eq!(
            set.get("UsersV1Service"),
            Some("../services/v1/UsersV1Service.js")
        );
    }

    #[test]
    fn test_same_name_takes_new_path() {
        let first = merge_fixture_file(None, &entries(&[("X", "p1")])).unwrap();
        let merged = merge_fixture_file(Some(&first), &entries(&[("X", "p2")])).unwrap();

        let set = FixtureSet::parse(&merged).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("X"), Some("p2"));
        assert_eq!(import_count(&merged, "X"), 1);
        assert!(!merged.contains("'p1'"));
    }

    #[test]
    fn test_regenerated_services_move_after_kept_ones() {
        let first = merge_fixture_file(
            None,
            &entries(&[("AService", "./AService.js"), ("BService", "./BService.js")]),
        )
        .unwrap();
        let merged =
            merge_fixture_file(Some(&first), &entries(&[("AService", "./v2/AService.js")]))
                .unwrap();

        let names: Vec<String> = FixtureSet::parse(&merged)
            .unwrap()
            .entries()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["BService", "AService"]);
    }

    #[test]
    fn test_merge_with_imports_only_file() {
        let existing = "import { test as base } from '@playwright/test';\n\
                        import { UsersService } from '../services/UsersService.js';";
        let merged = merge_fixture_file(
            Some(existing),
            &entries(&[
                ("UsersService", "../services/UsersService.js"),
                ("ProductsService", "../services/ProductsService.js"),
            ]),
        )
        .unwrap();

        assert_eq!(import_count(&merged, "UsersService"), 1);
        assert_eq!(import_count(&merged, "ProductsService"), 1);
        assert_eq!(merged.matches("from '@playwright/test'").count(), 2);
    }

    #[test]
    fn test_parse_accepts_double_quotes_and_missing_semicolon() {
        let text = "import {Foo} from \"./Foo.js\"\nimport { Bar } from './Bar.js' ;";
        let set = FixtureSet::parse(text).unwrap();
        assert_eq!(set.get("Foo"), Some("./Foo.js"));
        assert_eq!(set.get("Bar"), Some("./Bar.js"));
    }

    #[test]
    fn test_parse_fails_closed_on_unknown_import() {
        let text = "import { test as base } from '@playwright/test';\n\
                    import {\n  UsersService,\n} from '../services/UsersService.js';";
        let err = FixtureSet::parse(text).unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedFixture { line: 2, .. }));
    }

    #[test]
    fn test_parse_fails_closed_on_multiple_bindings() {
        let err = FixtureSet::parse("import { A, B } from './ab.js';").unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedFixture { line: 1, .. }));
        let err = FixtureSet::parse("import {} from './empty.js';").unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedFixture { line: 1, .. }));

        let err = merge_fixture_file(
            Some("import Default from './x.js';"),
            &entries(&[("X", "./X.js")]),
        )
        .unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedFixture { .. }));
    }

    #[test]
    fn test_parse_ignores_non_import_lines() {
        let set = FixtureSet::parse(
            "// important: generated\nexport { expect } from '@playwright/test';\nconst importer = 1;",
        )
        .unwrap();
        assert!(set.is_empty());
    }
}
