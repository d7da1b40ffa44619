pub mod grouping;
pub mod operations;

pub use grouping::{DEFAULT_TAG, OperationGroups};
pub use operations::Operation;
