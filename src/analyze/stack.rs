//! Tech stack, dependency and config file discovery from project manifests.
//!
//! Manifests are read in a fixed order (`package.json`, `Cargo.toml`,
//! `pyproject.toml`/`requirements.txt`, `go.mod`); the first one found decides
//! the language. Unreadable or malformed manifests are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Node packages that identify a framework, checked in order
const NODE_FRAMEWORKS: &[(&str, &str)] = &[
    ("next", "next.js"),
    ("nuxt", "nuxt"),
    ("@angular/core", "angular"),
    ("vue", "vue"),
    ("react", "react"),
    ("express", "express"),
    ("fastify", "fastify"),
    ("koa", "koa"),
    ("hono", "hono"),
    ("svelte", "svelte"),
];

const RUST_FRAMEWORKS: &[(&str, &str)] = &[
    ("axum", "axum"),
    ("actix-web", "actix-web"),
    ("rocket", "rocket"),
    ("warp", "warp"),
    ("tauri", "tauri"),
];

static REQUIREMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z0-9_.-]+)(?:[=<>!~]+(.+))?").unwrap());

static CONFIG_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^tsconfig(\.\w+)?\.json$",
        r"^package\.json$",
        r"^eslint\.config",
        r"^prettier\.config",
        r"^vitest\.config",
        r"^vite\.config",
        r"^next\.config",
        r"^nuxt\.config",
        r"^webpack\.config",
        r"^rollup\.config",
        r"^jest\.config",
        r"^babel\.config",
        r"^tailwind\.config",
        r"^postcss\.config",
        r"^docker-compose",
        r"^Dockerfile$",
        r"^Makefile$",
        r"^pyproject\.toml$",
        r"^requirements\.txt$",
        r"^go\.mod$",
        r"^go\.sum$",
        r"^Cargo\.toml$",
        r"^rust-toolchain(\.toml)?$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechStack {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Dependency {
    fn new(name: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            version: version.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageJson {
    #[serde(default)]
    main: Option<String>,
    #[serde(default)]
    bin: Option<Value>,
    #[serde(default)]
    dependencies: Map<String, Value>,
    #[serde(default)]
    dev_dependencies: Map<String, Value>,
}

impl PackageJson {
    fn all_dependencies(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.dependencies.iter().chain(self.dev_dependencies.iter())
    }
}

fn read_package_json(root: &Path) -> Option<PackageJson> {
    let raw = fs::read_to_string(root.join("package.json")).ok()?;
    match serde_json::from_str(&raw) {
        Ok(pkg) => Some(pkg),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed package.json");
            None
        }
    }
}

fn read_cargo_toml(root: &Path) -> Option<toml::Table> {
    let raw = fs::read_to_string(root.join("Cargo.toml")).ok()?;
    match raw.parse::<toml::Table>() {
        Ok(table) => Some(table),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed Cargo.toml");
            None
        }
    }
}

/// Dependency tables of a Cargo manifest: `[dependencies]` then `[dev-dependencies]`
fn cargo_dependencies(manifest: &toml::Table) -> Vec<Dependency> {
    let mut deps = Vec::new();
    for table in ["dependencies", "dev-dependencies"] {
        let Some(entries) = manifest.get(table).and_then(|t| t.as_table()) else {
            continue;
        };
        for (name, spec) in entries {
            let version = match spec {
                toml::Value::String(v) => Some(v.as_str()),
                toml::Value::Table(t) => t.get("version").and_then(|v| v.as_str()),
                _ => None,
            };
            deps.push(Dependency::new(name, version));
        }
    }
    deps
}

fn node_package_manager(root: &Path) -> &'static str {
    if root.join("pnpm-lock.yaml").exists() {
        "pnpm"
    } else if root.join("yarn.lock").exists() {
        "yarn"
    } else if root.join("bun.lockb").exists() || root.join("bun.lock").exists() {
        "bun"
    } else {
        "npm"
    }
}

fn first_framework<'a>(
    table: &[(&str, &'a str)],
    mut has: impl FnMut(&str) -> bool,
) -> Option<&'a str> {
    table
        .iter()
        .find(|(package, _)| has(*package))
        .map(|(_, framework)| *framework)
}

/// Language, framework and package manager from the project's manifests
pub fn detect_tech_stack(root: &Path) -> TechStack {
    if root.join("package.json").exists() {
        let language = if root.join("tsconfig.json").exists() {
            "typescript"
        } else {
            "javascript"
        };
        let framework = read_package_json(root).and_then(|pkg| {
            let found = first_framework(NODE_FRAMEWORKS, |name| {
                pkg.all_dependencies().any(|(dep, _)| dep == name)
            });
            found.map(str::to_string)
        });
        return TechStack {
            language: Some(language.to_string()),
            framework,
            package_manager: Some(node_package_manager(root).to_string()),
        };
    }

    if root.join("Cargo.toml").exists() {
        let framework = read_cargo_toml(root).and_then(|manifest| {
            let deps = cargo_dependencies(&manifest);
            let found = first_framework(RUST_FRAMEWORKS, |name| deps.iter().any(|d| d.name == name));
            found.map(str::to_string)
        });
        return TechStack {
            language: Some("rust".to_string()),
            framework,
            package_manager: Some("cargo".to_string()),
        };
    }

    let pyproject = root.join("pyproject.toml").exists();
    if pyproject || root.join("requirements.txt").exists() {
        let package_manager = if pyproject { "poetry" } else { "pip" };
        return TechStack {
            language: Some("python".to_string()),
            framework: None,
            package_manager: Some(package_manager.to_string()),
        };
    }

    if root.join("go.mod").exists() {
        return TechStack {
            language: Some("go".to_string()),
            framework: None,
            package_manager: Some("go".to_string()),
        };
    }

    TechStack::default()
}

/// Declared dependencies from the first manifest found
pub fn collect_dependencies(root: &Path) -> Vec<Dependency> {
    if root.join("package.json").exists() {
        return read_package_json(root)
            .map(|pkg| {
                pkg.all_dependencies()
                    .map(|(name, version)| Dependency::new(name, version.as_str()))
                    .collect()
            })
            .unwrap_or_default();
    }

    if root.join("Cargo.toml").exists() {
        return read_cargo_toml(root)
            .map(|manifest| cargo_dependencies(&manifest))
            .unwrap_or_default();
    }

    let Ok(raw) = fs::read_to_string(root.join("requirements.txt")) else {
        return Vec::new();
    };
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let caps = REQUIREMENT_LINE.captures(line)?;
            Some(Dependency::new(&caps[1], caps.get(2).map(|m| m.as_str())))
        })
        .collect()
}

/// Entry points declared in `package.json` (`main`, then `bin`)
pub fn manifest_entry_points(root: &Path) -> Vec<String> {
    let Some(pkg) = read_package_json(root) else {
        return Vec::new();
    };

    let mut entries: Vec<String> = pkg.main.into_iter().collect();
    match pkg.bin {
        Some(Value::String(bin)) => entries.push(bin),
        Some(Value::Object(bins)) => {
            entries.extend(bins.values().filter_map(|v| v.as_str()).map(str::to_string))
        }
        _ => {}
    }
    entries
}

/// Scanned files whose basename marks them as build or tool configuration
pub fn collect_config_files(files: &[String]) -> Vec<String> {
    files
        .iter()
        .filter(|f| {
            let basename = f.rsplit('/').next().unwrap_or(f);
            CONFIG_PATTERNS.iter().any(|p| p.is_match(basename))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_node_stack() {
        let dir = project(&[
            ("package.json", r#"{"dependencies": {"express": "^4.0.0"}}"#),
            ("tsconfig.json", "{}"),
            ("pnpm-lock.yaml", ""),
        ]);
        let stack = detect_tech_stack(dir.path());
        assert_eq!(stack.language.as_deref(), Some("typescript"));
        assert_eq!(stack.framework.as_deref(), Some("express"));
        assert_eq!(stack.package_manager.as_deref(), Some("pnpm"));
    }

    #[test]
    fn test_framework_order() {
        let dir = project(&[(
            "package.json",
            r#"{"dependencies": {"react": "18"}, "devDependencies": {"next": "14"}}"#,
        )]);
        let stack = detect_tech_stack(dir.path());
        assert_eq!(stack.language.as_deref(), Some("javascript"));
        assert_eq!(stack.framework.as_deref(), Some("next.js"));
        assert_eq!(stack.package_manager.as_deref(), Some("npm"));
    }

    #[test]
    fn test_malformed_package_json() {
        let dir = project(&[("package.json", "{not json")]);
        let stack = detect_tech_stack(dir.path());
        assert_eq!(stack.language.as_deref(), Some("javascript"));
        assert!(stack.framework.is_none());
        assert!(collect_dependencies(dir.path()).is_empty());
        assert!(manifest_entry_points(dir.path()).is_empty());
    }

    #[test]
    fn test_rust_stack() {
        let dir = project(&[(
            "Cargo.toml",
            "[package]\nname = \"x\"\n\n[dependencies]\naxum = \"0.7\"\nserde = { version = \"1\", features = [\"derive\"] }\nlocal = { path = \"../local\" }\n\n[dev-dependencies]\ntempfile = \"3\"\n",
        )]);
        let stack = detect_tech_stack(dir.path());
        assert_eq!(stack.language.as_deref(), Some("rust"));
        assert_eq!(stack.framework.as_deref(), Some("axum"));
        assert_eq!(stack.package_manager.as_deref(), Some("cargo"));

        let deps = collect_dependencies(dir.path());
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["axum", "local", "serde", "tempfile"]);
        assert_eq!(deps[2].version.as_deref(), Some("1"));
        assert!(deps[1].version.is_none());
    }

    #[test]
    fn test_python_stack_and_requirements() {
        let dir = project(&[(
            "requirements.txt",
            "# pinned\nflask==2.3.0\n\nrequests>=2.0\nclick\n",
        )]);
        let stack = detect_tech_stack(dir.path());
        assert_eq!(stack.language.as_deref(), Some("python"));
        assert_eq!(stack.package_manager.as_deref(), Some("pip"));

        let deps = collect_dependencies(dir.path());
        assert_eq!(
            deps,
            vec![
                Dependency::new("flask", Some("2.3.0")),
                Dependency::new("requests", Some("2.0")),
                Dependency::new("click", None),
            ]
        );
    }

    #[test]
    fn test_unknown_stack() {
        let dir = project(&[("main.c", "int main() {}")]);
        assert_eq!(detect_tech_stack(dir.path()), TechStack::default());
        assert!(collect_dependencies(dir.path()).is_empty());
    }

    #[test]
    fn test_node_dependencies_and_entry_points() {
        let dir = project(&[(
            "package.json",
            r#"{"main": "dist/index.js", "bin": {"tool": "bin/tool.js"},
                "dependencies": {"lodash": "^4.17.0", "express": "^4.0.0"},
                "devDependencies": {"vitest": "^1.0.0"}}"#,
        )]);

        let deps = collect_dependencies(dir.path());
        let names: Vec<&str> = deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["express", "lodash", "vitest"]);
        assert_eq!(deps[0].version.as_deref(), Some("^4.0.0"));

        assert_eq!(
            manifest_entry_points(dir.path()),
            vec!["dist/index.js", "bin/tool.js"]
        );
    }

    #[test]
    fn test_collect_config_files() {
        let files: Vec<String> = [
            "Cargo.toml",
            "README.md",
            "package.json",
            "src/index.ts",
            "tsconfig.build.json",
            "tools/Dockerfile",
            "vite.config.ts",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            collect_config_files(&files),
            vec![
                "Cargo.toml",
                "package.json",
                "tsconfig.build.json",
                "tools/Dockerfile",
                "vite.config.ts",
            ]
        );
    }
}
