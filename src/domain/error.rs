use std::fmt;

use thiserror::Error;

/// Location inside a template body (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplatePosition {
    pub line: usize,
    pub column: Option<usize>,
}

impl TemplatePosition {
    pub fn new(line: usize, column: Option<usize>) -> Self {
        Self { line, column }
    }

    /// Compute the line/column of a byte offset in `text`
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;

        Self {
            line,
            column: Some(column),
        }
    }
}

impl fmt::Display for TemplatePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "line {}, column {}", self.line, column),
            None => write!(f, "line {}", self.line),
        }
    }
}

/// Errors raised while turning a prompt document into a function, or while rendering it
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FunctionError {
    #[error("Config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("Unsupported template format: {format}")]
    UnsupportedTemplateFormat { format: String },

    #[error("Template compile error ({format}){}: {message}", format_position(.position))]
    TemplateCompile {
        format: String,
        message: String,
        position: Option<TemplatePosition>,
    },

    #[error("Incomplete function: missing {missing}")]
    IncompleteFunction { missing: String },

    #[error("Missing required argument '{argument}' for function '{function}'")]
    MissingRequiredArgument { function: String, argument: String },

    #[error("Unknown argument '{argument}' for function '{function}'")]
    UnknownArgument { function: String, argument: String },

    #[error("Invalid arguments for function '{function}': {message}")]
    InvalidArguments { function: String, message: String },

    #[error("Template render error ({format}): {message}")]
    TemplateRender { format: String, message: String },

    #[error("Failed to load '{locator}': {message}")]
    SourceLoad { locator: String, message: String },

    #[error("Duplicate function: {name}")]
    DuplicateFunction { name: String },

    #[error("Duplicate template format: {format}")]
    DuplicateTemplateFormat { format: String },
}

fn format_position(position: &Option<TemplatePosition>) -> String {
    match position {
        Some(position) => format!(" at {}", position),
        None => String::new(),
    }
}

impl FunctionError {
    pub fn config_parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedTemplateFormat {
            format: format.into(),
        }
    }

    pub fn template_compile(
        format: impl Into<String>,
        message: impl Into<String>,
        position: Option<TemplatePosition>,
    ) -> Self {
        Self::TemplateCompile {
            format: format.into(),
            message: message.into(),
            position,
        }
    }

    pub fn incomplete(missing: impl Into<String>) -> Self {
        Self::IncompleteFunction {
            missing: missing.into(),
        }
    }

    pub fn missing_argument(function: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::MissingRequiredArgument {
            function: function.into(),
            argument: argument.into(),
        }
    }

    pub fn unknown_argument(function: impl Into<String>, argument: impl Into<String>) -> Self {
        Self::UnknownArgument {
            function: function.into(),
            argument: argument.into(),
        }
    }

    pub fn invalid_arguments(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            function: function.into(),
            message: message.into(),
        }
    }

    pub fn template_render(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateRender {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn source_load(locator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceLoad {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_function(name: impl Into<String>) -> Self {
        Self::DuplicateFunction { name: name.into() }
    }

    pub fn duplicate_format(format: impl Into<String>) -> Self {
        Self::DuplicateTemplateFormat {
            format: format.into(),
        }
    }

    /// Fill in the function name on argument errors raised below the function layer
    pub fn for_function(self, name: &str) -> Self {
        match self {
            Self::MissingRequiredArgument { function, argument } if function.is_empty() => {
                Self::MissingRequiredArgument {
                    function: name.to_string(),
                    argument,
                }
            }
            other => other,
        }
    }

    /// Errors produced by parse / resolve / build. Deterministic for a given input.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. }
                | Self::UnsupportedTemplateFormat { .. }
                | Self::TemplateCompile { .. }
                | Self::IncompleteFunction { .. }
                | Self::SourceLoad { .. }
        )
    }

    /// Per-call errors; the function stays usable afterwards
    pub fn is_render_error(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredArgument { .. }
                | Self::UnknownArgument { .. }
                | Self::InvalidArguments { .. }
                | Self::TemplateRender { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_error() {
        let error = FunctionError::config_parse("input_variables[0].name", "expected a string");
        assert_eq!(
            error.to_string(),
            "Config parse error at input_variables[0].name: expected a string"
        );
        assert!(error.is_construction_error());
        assert!(!error.is_render_error());
    }

    #[test]
    fn test_template_compile_error_with_position() {
        let error = FunctionError::template_compile(
            "handlebars",
            "unclosed '{{'",
            Some(TemplatePosition::new(2, Some(5))),
        );
        assert_eq!(
            error.to_string(),
            "Template compile error (handlebars) at line 2, column 5: unclosed '{{'"
        );
    }

    #[test]
    fn test_template_compile_error_without_position() {
        let error = FunctionError::template_compile("jinja2", "bad syntax", None);
        assert_eq!(
            error.to_string(),
            "Template compile error (jinja2): bad syntax"
        );
    }

    #[test]
    fn test_missing_argument_is_render_error() {
        let error = FunctionError::missing_argument("greet", "name");
        assert_eq!(
            error.to_string(),
            "Missing required argument 'name' for function 'greet'"
        );
        assert!(error.is_render_error());
        assert!(!error.is_construction_error());
    }

    #[test]
    fn test_for_function_fills_empty_name() {
        let error = FunctionError::missing_argument("", "name").for_function("greet");
        assert_eq!(error, FunctionError::missing_argument("greet", "name"));

        let error = FunctionError::missing_argument("other", "name").for_function("greet");
        assert_eq!(error, FunctionError::missing_argument("other", "name"));

        let error = FunctionError::unsupported_format("x").for_function("greet");
        assert_eq!(error, FunctionError::unsupported_format("x"));
    }

    #[test]
    fn test_position_from_offset() {
        let text = "first\nsecond {{ line";
        let offset = text.find("{{").unwrap();
        let position = TemplatePosition::from_offset(text, offset);
        assert_eq!(position, TemplatePosition::new(2, Some(8)));
    }

    #[test]
    fn test_position_from_offset_first_line() {
        let position = TemplatePosition::from_offset("{{", 0);
        assert_eq!(position, TemplatePosition::new(1, Some(1)));
    }
}
