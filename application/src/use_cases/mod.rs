//! Use cases (application services)

pub mod ask;
pub mod collector;
pub mod fanout;
pub mod scoring;
pub mod selection;
