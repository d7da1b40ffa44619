/// File name of the starter spec written next to `base.ts`.
pub const SKELETON_FILE_NAME: &str = "skeleton-test.ts";

/// Emit `skeleton-test.ts`, a smoke test wired to the generated fixtures.
pub fn emit_skeleton_test() -> String {
    include_str!("../../templates/skeleton-test.ts").to_string()
}
