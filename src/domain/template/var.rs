//! `${var:...}` placeholder templates
//!
//! Supports variable syntax: `${var:variable-name:default-value}`
//! - `${var:name}` - Required variable, error if not provided
//! - `${var:name:default}` - Optional variable with default value

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::engine::{value_to_text, PromptTemplate};
use super::format::TemplateFormat;
use crate::domain::error::{FunctionError, TemplatePosition};
use crate::domain::function::FunctionArguments;

/// Regex to match variable patterns: ${var:name} or ${var:name:default}
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{var:([a-zA-Z0-9][-_a-zA-Z0-9]*)(?::([^}]*))?\}").unwrap()
});

const PLACEHOLDER_OPEN: &str = "${var:";

/// A placeholder found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderVariable {
    /// Variable name
    pub name: String,
    /// Inline default, if the placeholder has one
    pub default: Option<String>,
}

/// A parsed `${var:...}` template
#[derive(Debug, Clone)]
pub struct VarTemplate {
    /// Original template content
    content: String,
    /// First occurrence of each placeholder
    placeholders: Vec<PlaceholderVariable>,
    names: Vec<String>,
}

impl VarTemplate {
    /// Parse a template string and extract variables
    pub fn compile(content: impl Into<String>) -> Result<Self, FunctionError> {
        let content = content.into();
        let mut placeholders: Vec<PlaceholderVariable> = Vec::new();

        // Every "${var:" must start a well-formed placeholder
        for (offset, _) in content.match_indices(PLACEHOLDER_OPEN) {
            let well_formed = VARIABLE_PATTERN
                .find_at(&content, offset)
                .is_some_and(|m| m.start() == offset);

            if !well_formed {
                return Err(FunctionError::template_compile(
                    TemplateFormat::Var.as_str(),
                    "malformed placeholder, expected ${var:name} or ${var:name:default}",
                    Some(TemplatePosition::from_offset(&content, offset)),
                ));
            }
        }

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap[1].to_string();

            // Skip duplicates
            if placeholders.iter().any(|p| p.name == name) {
                continue;
            }

            placeholders.push(PlaceholderVariable {
                name,
                default: cap.get(2).map(|m| m.as_str().to_string()),
            });
        }

        let names = placeholders.iter().map(|p| p.name.clone()).collect();

        Ok(Self {
            content,
            placeholders,
            names,
        })
    }

    /// Get all parsed placeholders
    pub fn placeholders(&self) -> &[PlaceholderVariable] {
        &self.placeholders
    }
}

impl PromptTemplate for VarTemplate {
    fn format(&self) -> &str {
        TemplateFormat::Var.as_str()
    }

    fn source(&self) -> &str {
        &self.content
    }

    fn referenced_variables(&self) -> &[String] {
        &self.names
    }

    fn render(&self, arguments: &FunctionArguments) -> Result<String, FunctionError> {
        // Check that every placeholder can be filled before substituting
        if let Some(missing) = VARIABLE_PATTERN
            .captures_iter(&self.content)
            .find(|cap| cap.get(2).is_none() && !arguments.contains(&cap[1]))
        {
            return Err(FunctionError::missing_argument(String::new(), &missing[1]));
        }

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &Captures| {
            match arguments.get(&cap[1]) {
                Some(value) => value_to_text(value),
                None => cap.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            }
        });

        Ok(rendered.into_owned())
    }
}
