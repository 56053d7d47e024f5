pub mod catalog;
pub mod classifier;
pub mod types;

pub use catalog::ColumnTypeDescriptor;
pub use classifier::*;
pub use types::*;
