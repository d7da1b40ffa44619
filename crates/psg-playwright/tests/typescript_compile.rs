use std::fs;
use std::process::Command;

use psg_core::parse;
use psg_playwright::{GenerateOptions, generate};

const PETSTORE: &str = include_str!("../../psg-core/tests/fixtures/petstore-swagger.json");

#[test]
#[ignore] // Requires Node.js + npm
fn generated_typescript_compiles() {
    let spec = parse::from_json(PETSTORE).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();

    let options = GenerateOptions {
        output_dir: dir.join("services"),
        tests_dir: dir.join("tests"),
        merge: true,
        strict: true,
        skeleton: true,
        import_extension: ".js".to_string(),
    };
    generate(&spec, &options).unwrap();

    let package_json = r#"{
  "name": "psg-compile-check",
  "private": true,
  "type": "module",
  "devDependencies": {
    "@playwright/test": "^1.45.0",
    "typescript": "^5.4.0"
  }
}"#;
    fs::write(dir.join("package.json"), package_json).unwrap();

    let tsconfig = r#"{
  "compilerOptions": {
    "strict": true,
    "target": "ES2020",
    "module": "ESNext",
    "moduleResolution": "Bundler",
    "noEmit": true,
    "skipLibCheck": true
  },
  "include": ["services/*.ts", "tests/*.ts"]
}"#;
    fs::write(dir.join("tsconfig.json"), tsconfig).unwrap();

    let install = Command::new("npm")
        .args(["install", "--no-audit", "--no-fund"])
        .current_dir(dir)
        .output()
        .expect("failed to run npm install");
    if !install.status.success() {
        panic!(
            "npm install failed:\n{}",
            String::from_utf8_lossy(&install.stderr)
        );
    }

    let output = Command::new("npx")
        .args(["tsc", "--noEmit"])
        .current_dir(dir)
        .output()
        .expect("failed to run tsc");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "TypeScript compilation failed:\nstdout: {}\nstderr: {}",
            stdout, stderr
        );
    }
}
