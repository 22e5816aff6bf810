mod json;
mod write;

pub use json::{ErrorOutput, JsonOutput};
pub use write::{atomic_write, ensure_dir, read_existing};
