//! Application use cases

pub mod render;
pub mod run;

pub use render::format_post;
pub use run::{RunError, run_pipeline};
