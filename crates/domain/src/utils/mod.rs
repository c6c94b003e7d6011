//! Pure helper functions (no I/O)

pub mod dates;
pub mod labels;
