mod filter;
mod walker;

pub use filter::{path_in_module, FileFilter, DEFAULT_IGNORE, SENSITIVE_PATTERNS};
pub use walker::{scan_directory, ScanOptions, ScanResult};
