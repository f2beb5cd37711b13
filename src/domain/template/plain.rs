use super::engine::PromptTemplate;
use super::format::TemplateFormat;
use crate::domain::error::FunctionError;
use crate::domain::function::FunctionArguments;

/// Template text used verbatim, no substitution
#[derive(Debug, Clone)]
pub struct PlainTemplate {
    source: String,
}

impl PlainTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl PromptTemplate for PlainTemplate {
    fn format(&self) -> &str {
        TemplateFormat::Plain.as_str()
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn referenced_variables(&self) -> &[String] {
        &[]
    }

    fn render(&self, _arguments: &FunctionArguments) -> Result<String, FunctionError> {
        Ok(self.source.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ignores_arguments() {
        let template = PlainTemplate::new("Hello, {{name}}!");
        let arguments = FunctionArguments::new().with("name", "Ada");
        assert_eq!(template.render(&arguments).unwrap(), "Hello, {{name}}!");
        assert!(template.referenced_variables().is_empty());
    }
}
