//! Architecture pattern recognition and entry-point detection.
//!
//! Both are cheap, always recomputed from the current file list, even when a
//! persisted registry short-circuits module detection.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Pattern catalogue in precedence order. At equal score the earlier entry wins.
pub const ARCHITECTURE_PATTERNS: &[(&str, &[&str])] = &[
    ("mvc", &["models", "views", "controllers"]),
    ("layered", &["routes", "services", "models"]),
    ("clean", &["domain", "application", "infrastructure"]),
    ("feature", &["features", "modules"]),
    ("pragmatic", &["cli", "services", "lib", "types"]),
];

pub const UNKNOWN_ARCHITECTURE: &str = "unknown";

/// Minimum number of indicator directories the winning pattern must match
const MIN_PATTERN_SCORE: usize = 2;

/// Containers skipped when collecting top-level directory names
const ARCHITECTURE_CONTAINERS: &[&str] = &["src", "app", "lib"];

static ENTRY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^src/index\.[tj]sx?$",
        r"^src/main\.[tj]sx?$",
        r"^src/app\.[tj]sx?$",
        r"^src/cli/index\.[tj]sx?$",
        r"^src/server\.[tj]sx?$",
        r"^index\.[tj]sx?$",
        r"^main\.[tj]sx?$",
        r"^app\.[tj]sx?$",
        r"^manage\.py$",
        r"^main\.go$",
        r"^cmd/.*/main\.go$",
        r"^src/main\.rs$",
        r"^src/lib\.rs$",
        r"^src/bin/[^/]+\.rs$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Lowercased top-level directory names, looking through `src`/`app`/`lib`
/// when a deeper segment exists.
pub fn top_level_dirs(files: &[String]) -> HashSet<String> {
    let mut dirs = HashSet::new();

    for file in files {
        let parts: Vec<&str> = file.split('/').collect();
        if parts.len() < 2 {
            continue;
        }
        let dir = if ARCHITECTURE_CONTAINERS.contains(&parts[0]) && parts.len() >= 3 {
            parts[1]
        } else {
            parts[0]
        };
        dirs.insert(dir.to_lowercase());
    }

    dirs
}

/// Classify the project layout against the pattern catalogue.
///
/// A pattern qualifies only when every one of its indicator directories is
/// present. Among qualifying patterns the highest score wins, ties go to the
/// earlier catalogue entry, and the winner must score at least two.
pub fn detect_architecture_pattern(files: &[String]) -> String {
    let dirs = top_level_dirs(files);

    let mut best = UNKNOWN_ARCHITECTURE;
    let mut best_score = 0;

    for (pattern, indicators) in ARCHITECTURE_PATTERNS {
        let score = indicators.iter().filter(|ind| dirs.contains(**ind)).count();
        if score < indicators.len() {
            continue;
        }
        if score > best_score {
            best_score = score;
            best = *pattern;
        }
    }

    if best_score >= MIN_PATTERN_SCORE {
        best.to_string()
    } else {
        UNKNOWN_ARCHITECTURE.to_string()
    }
}

/// Files matching a conventional entry-point path, in scan order
pub fn detect_entry_points(files: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    files
        .iter()
        .filter(|f| ENTRY_PATTERNS.iter().any(|p| p.is_match(f)))
        .filter(|f| seen.insert(f.to_string()))
        .cloned()
        .collect()
}
