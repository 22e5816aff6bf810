//! knowlens builds an AI-readable knowledge base for a codebase: it detects
//! module boundaries, writes one document per module plus an index, and keeps
//! those documents current from delta-specs without losing hand-written notes.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod delta;
pub mod emit;
pub mod error;
pub mod knowledge;
pub mod merge;
pub mod registry;
pub mod render;
pub mod scan;
pub mod types;

pub use analyze::{detect_modules, ProjectSources, SourceReader};
pub use config::Config;
pub use delta::{identify_affected_modules, parse_delta_spec};
pub use error::{KnowlensError, Result};
pub use merge::{extract_user_sections, merge_content, parse_sections, ContentSection, SectionType};
pub use registry::RegistryStore;
pub use render::{Renderer, TemplateRenderer};
pub use types::{
    DeltaEntry, DeltaSpec, DetectionResult, FileAction, GeneratedFile, Module, ModuleRegistry,
    Relationships,
};
