//! Column types and per-column profiles.

mod column;
mod types;

pub use column::{ColumnProfile, SAMPLE_SIZE};
pub use types::TypeTag;
