//! Jinja2 templates rendered by minijinja

use std::collections::HashSet;

use minijinja::{AutoEscape, Environment};

use super::engine::PromptTemplate;
use super::format::TemplateFormat;
use crate::domain::error::{FunctionError, TemplatePosition};
use crate::domain::function::FunctionArguments;

const TEMPLATE_NAME: &str = "prompt";

pub struct JinjaTemplate {
    source: String,
    env: Environment<'static>,
    variables: Vec<String>,
}

impl JinjaTemplate {
    pub fn compile(source: impl Into<String>) -> Result<Self, FunctionError> {
        let source = source.into();
        let format = TemplateFormat::Jinja2.as_str();

        let mut env = Environment::new();
        // Prompt text, not HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_template_owned(TEMPLATE_NAME, source.clone())
            .map_err(|e| compile_error(format, &e))?;

        let template = env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| compile_error(format, &e))?;

        // Built-in functions such as `range` are globals, not arguments
        let globals: HashSet<String> = env.globals().map(|(name, _)| name.to_string()).collect();
        let mut variables: Vec<String> = template
            .undeclared_variables(false)
            .into_iter()
            .filter(|name| !globals.contains(name))
            .collect();
        variables.sort();

        Ok(Self {
            source,
            env,
            variables,
        })
    }
}

fn compile_error(format: &str, error: &minijinja::Error) -> FunctionError {
    let message = error
        .detail()
        .map(str::to_string)
        .unwrap_or_else(|| error.kind().to_string());

    FunctionError::template_compile(
        format,
        message,
        error.line().map(|line| TemplatePosition::new(line, None)),
    )
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("source", &self.source)
            .field("variables", &self.variables)
            .finish()
    }
}

impl PromptTemplate for JinjaTemplate {
    fn format(&self) -> &str {
        TemplateFormat::Jinja2.as_str()
    }

    fn source(&self) -> &str {
        &self.source
    }

    /// Sorted; minijinja does not report first-use order
    fn referenced_variables(&self) -> &[String] {
        &self.variables
    }

    fn render(&self, arguments: &FunctionArguments) -> Result<String, FunctionError> {
        let format = self.format();

        self.env
            .get_template(TEMPLATE_NAME)
            .and_then(|template| template.render(arguments))
            .map_err(|e| FunctionError::template_render(format, e.to_string()))
    }
}
