//! Value transformations: correction application and date reformatting.

mod corrections;
mod dates;

pub use corrections::{Corrections, apply_corrections};
pub use dates::{transform_column_dates, transform_date};
