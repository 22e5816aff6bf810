use once_cell::sync::Lazy;
use regex::Regex;

/// `import x from './a'`, `import './a'`, `from "./a"` (JS/TS/Python-ish forms).
/// Line-pattern matching only; no syntax tree is built.
static IMPORT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:import|from)\s+['"]([^'"]+)['"]"#).unwrap());

/// Extract every import-style string literal from a source file, in order of appearance
pub fn extract_imports(content: &str) -> Vec<String> {
    IMPORT_PATTERN
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Strip a leading `./` so relative imports can be compared against file paths
pub fn normalize_import(import: &str) -> &str {
    import.strip_prefix("./").unwrap_or(import)
}
