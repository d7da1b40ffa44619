pub mod emitters;
pub mod generator;
pub mod orchestrator;

pub use emitters::fixtures::{FixtureEntry, FixtureSet, merge_fixture_file};
pub use generator::PlaywrightGenerator;
pub use orchestrator::{GenerateOptions, GenerationReport, generate};
