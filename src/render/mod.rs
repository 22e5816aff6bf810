//! Document rendering.
//!
//! Operations receive a `&dyn Renderer` instead of reaching for a shared
//! template registry, so tests can substitute their own implementation.

mod templates;

use handlebars::Handlebars;
use serde_json::Value;

use crate::error::{KnowlensError, Result};

pub const MODULE_README: &str = "module-readme";
pub const KNOWLEDGE_INDEX: &str = "knowledge-index";
pub const ARCHITECTURE: &str = "architecture";
pub const RAW_SCAN: &str = "raw-scan";
pub const CONVENTIONS: &str = "conventions";

pub trait Renderer {
    /// Render `template_id` with `context`. Unknown ids and render failures
    /// are `Template` errors, never empty output.
    fn render(&self, template_id: &str, context: &Value) -> Result<String>;
}

/// Handlebars-backed renderer with the built-in templates registered
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("join", Box::new(join_helper));

        for (id, source) in [
            (MODULE_README, templates::MODULE_README),
            (KNOWLEDGE_INDEX, templates::KNOWLEDGE_INDEX),
            (ARCHITECTURE, templates::ARCHITECTURE),
            (RAW_SCAN, templates::RAW_SCAN),
            (CONVENTIONS, templates::CONVENTIONS),
        ] {
            handlebars
                .register_template_string(id, source)
                .map_err(|e| KnowlensError::template(id, e))?;
        }

        Ok(Self { handlebars })
    }
}

impl Renderer for TemplateRenderer {
    fn render(&self, template_id: &str, context: &Value) -> Result<String> {
        if !self.handlebars.has_template(template_id) {
            return Err(KnowlensError::template(template_id, "template not found"));
        }
        self.handlebars
            .render(template_id, context)
            .map_err(|e| KnowlensError::template(template_id, e))
    }
}

// Handlebars helpers

/// `{{join list ", "}}`: strings joined as-is, other values as JSON
fn join_helper(
    h: &handlebars::Helper,
    _: &Handlebars,
    _: &handlebars::Context,
    _: &mut handlebars::RenderContext,
    out: &mut dyn handlebars::Output,
) -> handlebars::HelperResult {
    let separator = h.param(1).and_then(|v| v.value().as_str()).unwrap_or(", ");
    let joined = h
        .param(0)
        .and_then(|v| v.value().as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(separator)
        })
        .unwrap_or_default();
    out.write(&joined)?;
    Ok(())
}
