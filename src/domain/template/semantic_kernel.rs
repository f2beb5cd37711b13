//! Semantic Kernel style templates: `{{$variable}}` and quoted literals

use once_cell::sync::Lazy;
use regex::Regex;

use super::engine::{remember_variable, value_to_text, PromptTemplate};
use super::format::TemplateFormat;
use super::segments::{scan_tags, RawSegment};
use crate::domain::error::{FunctionError, TemplatePosition};
use crate::domain::function::FunctionArguments;

static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\$([A-Za-z0-9_]+)$").unwrap());

#[derive(Debug, Clone, PartialEq)]
enum Block {
    Text(String),
    Variable(String),
}

#[derive(Debug, Clone)]
pub struct SemanticKernelTemplate {
    source: String,
    blocks: Vec<Block>,
    variables: Vec<String>,
}

impl SemanticKernelTemplate {
    pub fn compile(source: impl Into<String>) -> Result<Self, FunctionError> {
        let source = source.into();
        let format = TemplateFormat::SemanticKernel.as_str();
        let mut blocks = Vec::new();
        let mut variables = Vec::new();

        for raw in scan_tags(&source, format)? {
            match raw {
                RawSegment::Text(text) => blocks.push(Block::Text(text.to_string())),
                RawSegment::Tag { inner, offset } => {
                    let expression = inner.trim();
                    let position = || Some(TemplatePosition::from_offset(&source, offset));

                    if let Some(captures) = VARIABLE_PATTERN.captures(expression) {
                        let name = &captures[1];
                        remember_variable(&mut variables, name);
                        blocks.push(Block::Variable(name.to_string()));
                    } else if let Some(literal) = quoted_literal(expression) {
                        blocks.push(Block::Text(literal.to_string()));
                    } else if expression.is_empty() {
                        return Err(FunctionError::template_compile(format, "empty block", position()));
                    } else if expression.starts_with('$') {
                        return Err(FunctionError::template_compile(
                            format,
                            format!("invalid variable name '{}'", expression),
                            position(),
                        ));
                    } else {
                        return Err(FunctionError::template_compile(
                            format,
                            format!("function calls are not supported: '{}'", expression),
                            position(),
                        ));
                    }
                }
            }
        }

        Ok(Self {
            source,
            blocks,
            variables,
        })
    }
}

/// `'text'` or `"text"` with matching quotes
fn quoted_literal(expression: &str) -> Option<&str> {
    let quote = expression.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    if expression.len() >= 2 && expression.ends_with(quote) {
        Some(&expression[1..expression.len() - 1])
    } else {
        None
    }
}

impl PromptTemplate for SemanticKernelTemplate {
    fn format(&self) -> &str {
        TemplateFormat::SemanticKernel.as_str()
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn referenced_variables(&self) -> &[String] {
        &self.variables
    }

    fn render(&self, arguments: &FunctionArguments) -> Result<String, FunctionError> {
        let mut output = String::with_capacity(self.source.len());

        for block in &self.blocks {
            match block {
                Block::Text(text) => output.push_str(text),
                Block::Variable(name) => {
                    if let Some(value) = arguments.get(name) {
                        output.push_str(&value_to_text(value));
                    }
                }
            }
        }

        Ok(output)
    }
}
