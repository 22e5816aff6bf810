//! Built-in document templates. Every merged template renders exactly one
//! auto section and one user section. `RAW_SCAN` is rewritten wholesale on
//! each run and carries no markers.

pub const MODULE_README: &str = r#"# {{module_name}}

<!-- knowlens:auto-start -->
> {{description}}

- **Path**: `{{path}}`
- **Keywords**: {{#if keywords}}{{join keywords ", "}}{{else}}none{{/if}}

## Key Files

| File | Description |
|------|-------------|
{{#each key_files}}
| `{{path}}` | {{description}} |
{{/each}}

## Relationships

- **Depends on**: {{#if relationships.depends_on}}{{join relationships.depends_on ", "}}{{else}}none{{/if}}
- **Used by**: {{#if relationships.used_by}}{{join relationships.used_by ", "}}{{else}}none{{/if}}
<!-- knowlens:auto-end -->

<!-- knowlens:user-start -->
## Notes

<!-- Add notes about this module here. This section is preserved on regeneration. -->
<!-- knowlens:user-end -->
"#;

pub const KNOWLEDGE_INDEX: &str = r#"# AI Knowledge Index

> Entry point for AI assistants working on {{project_name}}.

<!-- knowlens:auto-start -->
## Modules

| Module | Keywords | Status | Description | Depends On |
|--------|----------|--------|-------------|------------|
{{#each modules}}
| [{{name}}](modules/{{name}}/README.md) | {{join keywords ", "}} | {{status}} | {{description}} | {{join depends_on ", "}} |
{{/each}}

## Project Info

- **Project**: {{project_name}}
- **Knowledge Base**: `{{knowledge_base_path}}`
<!-- knowlens:auto-end -->

<!-- knowlens:user-start -->
<!-- Add custom project notes here. This section is preserved on regeneration. -->
<!-- knowlens:user-end -->
"#;

pub const ARCHITECTURE: &str = r#"# {{project_name}} Architecture

<!-- knowlens:auto-start -->
## Overview

- **Pattern**: {{architecture}}
- **Modules**: {{module_count}}
- **Files scanned**: {{file_count}}

## Entry Points

{{#each entry_points}}
- `{{this}}`
{{else}}
- none detected
{{/each}}

## Directory Structure

```text
{{directory_tree}}
```

## Modules

| Module | Path | Files | Description |
|--------|------|-------|-------------|
{{#each modules}}
| {{name}} | `{{path}}` | {{file_count}} | {{description}} |
{{/each}}

## Dependencies

{{#each modules}}
- **{{name}}** depends on {{#if relationships.depends_on}}{{join relationships.depends_on ", "}}{{else}}nothing{{/if}}; used by {{#if relationships.used_by}}{{join relationships.used_by ", "}}{{else}}nothing{{/if}}
{{/each}}
<!-- knowlens:auto-end -->

<!-- knowlens:user-start -->
## Design Notes

<!-- Record architectural decisions here. This section is preserved on regeneration. -->
<!-- knowlens:user-end -->
"#;

pub const RAW_SCAN: &str = r#"# Raw Scan: {{project_name}}

> Generated by `knowlens knowledge init`. This file is overwritten on every run.

## Tech Stack

- **Language**: {{#if tech_stack.language}}{{tech_stack.language}}{{else}}unknown{{/if}}
- **Framework**: {{#if tech_stack.framework}}{{tech_stack.framework}}{{else}}none detected{{/if}}
- **Package manager**: {{#if tech_stack.package_manager}}{{tech_stack.package_manager}}{{else}}unknown{{/if}}

## Entry Points

{{#each entry_points}}
- `{{this}}`
{{else}}
- none detected
{{/each}}

## Directory Structure

```text
{{directory_tree}}
```

## Dependencies

| Name | Version |
|------|---------|
{{#each dependencies}}
| {{name}} | {{#if version}}{{version}}{{else}}-{{/if}} |
{{/each}}

## Config Files

{{#each config_files}}
- `{{this}}`
{{else}}
- none found
{{/each}}

## File Stats

- **Total files**: {{file_stats.total_files}}
- **Scan depth**: {{file_stats.scan_depth}}
"#;

pub const CONVENTIONS: &str = r#"# Coding Conventions

> Coding conventions and practices for {{project_name}}.

<!-- knowlens:auto-start -->
_Not generated yet. Summarize the conventions seen in `raw-scan.md` and the module docs here._
<!-- knowlens:auto-end -->

<!-- knowlens:user-start -->
<!-- Add team-specific conventions and exceptions here. This section is preserved on regeneration. -->
<!-- knowlens:user-end -->
"#;
