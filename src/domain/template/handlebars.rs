//! Handlebars templates rendered by the `handlebars` crate
//!
//! Full Handlebars syntax: expressions, dotted paths, `{{#if}}`,
//! `{{#each}}`, `{{#with}}`, comments. Output is not HTML-escaped and
//! unbound variables render as empty text.

use ::handlebars::template::{HelperTemplate, Parameter, Template, TemplateElement};
use ::handlebars::{no_escape, Handlebars, TemplateError};

use super::engine::{remember_variable, PromptTemplate};
use super::format::TemplateFormat;
use crate::domain::error::{FunctionError, TemplatePosition};
use crate::domain::function::FunctionArguments;

const TEMPLATE_NAME: &str = "prompt";

/// Block helpers whose body is evaluated against a nested scope
const SCOPED_HELPERS: &[&str] = &["each", "with"];

/// Compiled handlebars template
pub struct HandlebarsTemplate {
    source: String,
    registry: Handlebars<'static>,
    variables: Vec<String>,
}

impl HandlebarsTemplate {
    pub fn compile(source: impl Into<String>) -> Result<Self, FunctionError> {
        let source = source.into();

        let mut registry = Handlebars::new();
        // Prompt text, not HTML
        registry.register_escape_fn(no_escape);
        registry
            .register_template_string(TEMPLATE_NAME, &source)
            .map_err(|e| compile_error(&e))?;

        let mut variables = Vec::new();
        if let Some(template) = registry.get_template(TEMPLATE_NAME) {
            collect_variables(template, &mut variables);
        }

        Ok(Self {
            source,
            registry,
            variables,
        })
    }
}

fn compile_error(error: &TemplateError) -> FunctionError {
    FunctionError::template_compile(
        TemplateFormat::Handlebars.as_str(),
        error.reason().to_string(),
        error
            .pos()
            .map(|(line, column)| TemplatePosition::new(line, Some(column))),
    )
}

/// Record the root names of variables read from the top-level scope
fn collect_variables(template: &Template, variables: &mut Vec<String>) {
    for element in &template.elements {
        match element {
            TemplateElement::Expression(helper) | TemplateElement::HtmlExpression(helper) => {
                if helper.params.is_empty() && helper.hash.is_empty() {
                    remember_path(variables, helper.name.as_name());
                } else {
                    collect_parameters(helper, variables);
                }
            }
            TemplateElement::HelperBlock(helper) => {
                collect_parameters(helper, variables);

                let scoped = helper
                    .name
                    .as_name()
                    .is_some_and(|name| SCOPED_HELPERS.contains(&name));

                if let Some(body) = helper.template.as_ref().filter(|_| !scoped) {
                    collect_variables(body, variables);
                }
                if let Some(inverse) = &helper.inverse {
                    collect_variables(inverse, variables);
                }
            }
            _ => {}
        }
    }
}

fn collect_parameters(helper: &HelperTemplate, variables: &mut Vec<String>) {
    for parameter in helper.params.iter().chain(helper.hash.values()) {
        if matches!(parameter, Parameter::Name(_) | Parameter::Path(_)) {
            remember_path(variables, parameter.as_name());
        }
    }
}

fn remember_path(variables: &mut Vec<String>, path: Option<&str>) {
    let Some(path) = path else {
        return;
    };

    let path = path.trim_start_matches("./");
    if path.is_empty() || path.starts_with('@') || path.starts_with("..") || path.starts_with("this") {
        return;
    }

    let root = path.split(['.', '/']).next().unwrap_or(path);
    remember_variable(variables, root);
}

impl std::fmt::Debug for HandlebarsTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsTemplate")
            .field("source", &self.source)
            .field("variables", &self.variables)
            .finish()
    }
}

impl PromptTemplate for HandlebarsTemplate {
    fn format(&self) -> &str {
        TemplateFormat::Handlebars.as_str()
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn referenced_variables(&self) -> &[String] {
        &self.variables
    }

    fn render(&self, arguments: &FunctionArguments) -> Result<String, FunctionError> {
        self.registry
            .render(TEMPLATE_NAME, arguments)
            .map_err(|e| FunctionError::template_render(self.format(), e.to_string()))
    }
}
