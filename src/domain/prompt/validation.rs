//! Function name validation utilities

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length for function names
pub const MAX_FUNCTION_NAME_LENGTH: usize = 100;

/// Letters, digits, underscores and hyphens; cannot start with a hyphen
static FUNCTION_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_-]*$").unwrap());

/// Function name validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum NameValidationError {
    Empty,
    TooLong { length: usize, max: usize },
    InvalidFormat { name: String },
}

impl fmt::Display for NameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "function name cannot be empty"),
            Self::TooLong { length, max } => {
                write!(f, "function name too long: {} characters (max {})", length, max)
            }
            Self::InvalidFormat { name } => write!(
                f,
                "invalid function name '{}': use letters, digits, '_' or '-', not starting with '-'",
                name
            ),
        }
    }
}

impl std::error::Error for NameValidationError {}

/// Validate a function name
pub fn validate_function_name(name: &str) -> Result<(), NameValidationError> {
    if name.is_empty() {
        return Err(NameValidationError::Empty);
    }

    if name.len() > MAX_FUNCTION_NAME_LENGTH {
        return Err(NameValidationError::TooLong {
            length: name.len(),
            max: MAX_FUNCTION_NAME_LENGTH,
        });
    }

    if !FUNCTION_NAME_PATTERN.is_match(name) {
        return Err(NameValidationError::InvalidFormat {
            name: name.to_string(),
        });
    }

    Ok(())
}
