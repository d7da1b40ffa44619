pub mod name_normalizer;
pub mod spec_to_ir;

pub use spec_to_ir::group_operations;
