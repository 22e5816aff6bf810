pub mod architecture;
pub mod module;
mod parser;
pub mod relationships;
pub mod stack;

pub use architecture::{detect_architecture_pattern, detect_entry_points, UNKNOWN_ARCHITECTURE};
pub use module::{count_module_files, detect_modules, infer_description};
pub use parser::extract_imports;
pub use relationships::{module_files, ProjectSources, SourceReader, MAX_FILES_PER_MODULE};
pub use stack::{
    collect_config_files, collect_dependencies, detect_tech_stack, manifest_entry_points, Dependency,
    TechStack,
};
