//! Progress reporting for one-shot answers

pub mod reporter;
