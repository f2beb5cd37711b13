//! Built-in template formats

use std::fmt;
use std::str::FromStr;

use super::engine::PromptTemplate;
use super::handlebars::HandlebarsTemplate;
use super::jinja::JinjaTemplate;
use super::plain::PlainTemplate;
use super::semantic_kernel::SemanticKernelTemplate;
use super::var::VarTemplate;
use crate::domain::error::FunctionError;

/// Format used when a prompt document does not name one
pub const DEFAULT_TEMPLATE_FORMAT: &str = "handlebars";

/// Template syntaxes compiled without any registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateFormat {
    #[default]
    Handlebars,
    SemanticKernel,
    Jinja2,
    Var,
    Plain,
}

impl TemplateFormat {
    /// Get all built-in formats
    pub fn all() -> &'static [TemplateFormat] {
        &[
            TemplateFormat::Handlebars,
            TemplateFormat::SemanticKernel,
            TemplateFormat::Jinja2,
            TemplateFormat::Var,
            TemplateFormat::Plain,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateFormat::Handlebars => "handlebars",
            TemplateFormat::SemanticKernel => "semantic-kernel",
            TemplateFormat::Jinja2 => "jinja2",
            TemplateFormat::Var => "var",
            TemplateFormat::Plain => "plain",
        }
    }

    /// Compile `source` with this format's engine
    pub fn compile(&self, source: &str) -> Result<Box<dyn PromptTemplate>, FunctionError> {
        let template: Box<dyn PromptTemplate> = match self {
            TemplateFormat::Handlebars => Box::new(HandlebarsTemplate::compile(source)?),
            TemplateFormat::SemanticKernel => Box::new(SemanticKernelTemplate::compile(source)?),
            TemplateFormat::Jinja2 => Box::new(JinjaTemplate::compile(source)?),
            TemplateFormat::Var => Box::new(VarTemplate::compile(source)?),
            TemplateFormat::Plain => Box::new(PlainTemplate::new(source)),
        };

        Ok(template)
    }
}

impl FromStr for TemplateFormat {
    type Err = FunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();

        TemplateFormat::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == normalized)
            .ok_or_else(|| FunctionError::unsupported_format(s))
    }
}

impl fmt::Display for TemplateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
