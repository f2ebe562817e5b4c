pub mod analyze;
pub mod build;
pub mod completions;
pub mod stats;
