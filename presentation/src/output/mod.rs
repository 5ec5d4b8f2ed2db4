//! Output formatting for aggregation results

pub mod console;
pub mod formatter;
