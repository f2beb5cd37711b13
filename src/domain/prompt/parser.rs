//! Prompt document parsing
//!
//! A document is first deserialized into a generic `serde_json::Value` tree
//! (whatever its source syntax), then walked once against the prompt schema.
//! All defaulting and type checks live here; failures carry the path of the
//! offending field (`input_variables[1].name`, `execution_settings.gpt.top_p`).

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};
use tracing::debug;

use super::config::{InputVariable, OutputVariable, PromptTemplateConfig};
use super::execution_settings::{ExecutionSettings, ExecutionSettingsMap};
use super::validation::validate_function_name;
use crate::domain::error::FunctionError;
use crate::domain::template::DEFAULT_TEMPLATE_FORMAT;

/// Path used for errors about the document as a whole
pub const ROOT_PATH: &str = "$";

const TOP_LEVEL_KEYS: &[&str] = &[
    "name",
    "description",
    "template",
    "template_format",
    "input_variables",
    "output_variable",
    "execution_settings",
];

const INPUT_VARIABLE_KEYS: &[&str] = &[
    "name",
    "description",
    "default",
    "is_required",
    "type",
    "json_schema",
];

const OUTPUT_VARIABLE_KEYS: &[&str] = &["description", "type", "json_schema"];

/// Serialization syntax of a prompt document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Guess the format from a locator's file extension, defaulting to YAML
    pub fn from_locator(locator: &str) -> Self {
        let extension = std::path::Path::new(locator)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// Deserialize raw text into a generic tree
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Value, FunctionError> {
    let parsed = match format {
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string()),
        DocumentFormat::Json => serde_json::from_str::<Value>(text).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str::<Value>(text).map_err(|e| e.to_string()),
    };

    parsed.map_err(|message| {
        FunctionError::config_parse(
            ROOT_PATH,
            format!("invalid {} document: {}", format.name(), message.trim()),
        )
    })
}

/// Parse and validate a prompt document
pub fn parse_config(text: &str, format: DocumentFormat) -> Result<PromptTemplateConfig, FunctionError> {
    let tree = parse_document(text, format)?;
    PromptTemplateConfig::from_value(&tree)
}

impl PromptTemplateConfig {
    /// Validate a generic tree against the prompt schema
    pub fn from_value(tree: &Value) -> Result<Self, FunctionError> {
        let root = expect_object(tree, ROOT_PATH)?;

        for key in root.keys() {
            if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
                debug!(key = %key, "Ignoring unknown prompt document key");
            }
        }

        let name = required_string(root, "name", ROOT_PATH)?;
        validate_function_name(&name)
            .map_err(|e| FunctionError::config_parse("name", e.to_string()))?;

        let template = required_string(root, "template", ROOT_PATH)?;
        let template_format = parse_template_format(root)?;

        let mut config = PromptTemplateConfig::new(name, template)
            .with_template_format(template_format)
            .with_input_variables(parse_input_variables(root)?)
            .with_execution_settings(parse_execution_settings(root)?);

        if let Some(description) = optional_string(root, "description", ROOT_PATH)? {
            config = config.with_description(description);
        }

        if let Some(output) = parse_output_variable(root)? {
            config = config.with_output_variable(output);
        }

        Ok(config)
    }
}

fn parse_template_format(root: &Map<String, Value>) -> Result<String, FunctionError> {
    match optional_string(root, "template_format", ROOT_PATH)? {
        None => Ok(DEFAULT_TEMPLATE_FORMAT.to_string()),
        Some(format) => {
            let normalized = format.trim().to_ascii_lowercase();
            if normalized.is_empty() {
                return Err(FunctionError::config_parse(
                    "template_format",
                    "template format cannot be empty",
                ));
            }
            Ok(normalized)
        }
    }
}

fn parse_input_variables(root: &Map<String, Value>) -> Result<Vec<InputVariable>, FunctionError> {
    let Some(value) = present(root, "input_variables") else {
        return Ok(Vec::new());
    };

    let items = value.as_array().ok_or_else(|| {
        FunctionError::config_parse(
            "input_variables",
            format!("expected a sequence, found {}", type_name(value)),
        )
    })?;

    let mut seen = HashSet::new();
    let mut variables = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let path = index_path("input_variables", i);
        let map = expect_object(item, &path)?;
        reject_unknown_keys(map, INPUT_VARIABLE_KEYS, &path)?;

        let name = required_string(map, "name", &path)?;
        if name.trim().is_empty() {
            return Err(FunctionError::config_parse(
                child_path(&path, "name"),
                "input variable name cannot be empty",
            ));
        }
        if !seen.insert(name.clone()) {
            return Err(FunctionError::config_parse(
                child_path(&path, "name"),
                format!("duplicate input variable '{}'", name),
            ));
        }

        let mut variable = InputVariable::new(name)
            .with_required(optional_bool(map, "is_required", &path)?.unwrap_or(true));

        if let Some(description) = optional_string(map, "description", &path)? {
            variable = variable.with_description(description);
        }
        if let Some(default) = present(map, "default") {
            variable = variable.with_default(default.clone());
        }
        if let Some(type_hint) = optional_string(map, "type", &path)? {
            variable = variable.with_type_hint(type_hint);
        }
        if let Some(schema) = optional_string(map, "json_schema", &path)? {
            variable = variable.with_json_schema(schema);
        }

        variables.push(variable);
    }

    Ok(variables)
}

fn parse_output_variable(root: &Map<String, Value>) -> Result<Option<OutputVariable>, FunctionError> {
    let Some(value) = present(root, "output_variable") else {
        return Ok(None);
    };

    let path = "output_variable";
    let map = expect_object(value, path)?;
    reject_unknown_keys(map, OUTPUT_VARIABLE_KEYS, path)?;

    let mut output = OutputVariable::new();
    if let Some(description) = optional_string(map, "description", path)? {
        output = output.with_description(description);
    }
    if let Some(type_hint) = optional_string(map, "type", path)? {
        output = output.with_type_hint(type_hint);
    }
    if let Some(schema) = optional_string(map, "json_schema", path)? {
        output = output.with_json_schema(schema);
    }

    Ok(Some(output))
}

fn parse_execution_settings(root: &Map<String, Value>) -> Result<ExecutionSettingsMap, FunctionError> {
    let Some(value) = present(root, "execution_settings") else {
        return Ok(ExecutionSettingsMap::new());
    };

    let targets = expect_object(value, "execution_settings")?;
    let mut settings = Vec::with_capacity(targets.len());

    for (target_id, entry) in targets {
        let path = child_path("execution_settings", target_id);
        let bag = expect_object(entry, &path)?;
        settings.push((target_id.clone(), parse_settings_bag(bag, &path)?));
    }

    Ok(settings.into_iter().collect())
}

fn parse_settings_bag(bag: &Map<String, Value>, path: &str) -> Result<ExecutionSettings, FunctionError> {
    let mut settings = ExecutionSettings::new();

    for (key, value) in bag {
        if value.is_null() {
            continue;
        }

        match key.as_str() {
            "service_id" => settings.service_id = optional_string(bag, key, path)?,
            "model_id" => settings.model_id = optional_string(bag, key, path)?,
            "response_format" => settings.response_format = optional_string(bag, key, path)?,
            "user" => settings.user = optional_string(bag, key, path)?,
            "temperature" => settings.temperature = optional_f64(bag, key, path)?,
            "top_p" => settings.top_p = optional_f64(bag, key, path)?,
            "presence_penalty" => settings.presence_penalty = optional_f64(bag, key, path)?,
            "frequency_penalty" => settings.frequency_penalty = optional_f64(bag, key, path)?,
            "max_tokens" => settings.max_tokens = optional_u64(bag, key, path)?,
            "best_of" => settings.best_of = optional_u64(bag, key, path)?,
            "results_per_prompt" => settings.results_per_prompt = optional_u64(bag, key, path)?,
            "stop_sequences" => settings.stop_sequences = string_sequence(value, &child_path(path, key))?,
            "token_selection_biases" => {
                settings.token_selection_biases = integer_map(value, &child_path(path, key))?
            }
            _ => {
                settings.extension_data.insert(key.clone(), value.clone());
            }
        }
    }

    Ok(settings)
}

// Tree helpers

fn child_path(parent: &str, key: &str) -> String {
    if parent == ROOT_PATH {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

fn mismatch(path: String, expected: &str, found: &Value) -> FunctionError {
    FunctionError::config_parse(path, format!("expected {}, found {}", expected, type_name(found)))
}

/// A key that is present and not null
fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, FunctionError> {
    value
        .as_object()
        .ok_or_else(|| mismatch(path.to_string(), "a mapping", value))
}

fn reject_unknown_keys(map: &Map<String, Value>, allowed: &[&str], path: &str) -> Result<(), FunctionError> {
    match map.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(key) => Err(FunctionError::config_parse(
            child_path(path, key),
            format!("unknown field '{}', expected one of: {}", key, allowed.join(", ")),
        )),
        None => Ok(()),
    }
}

fn required_string(map: &Map<String, Value>, key: &str, path: &str) -> Result<String, FunctionError> {
    optional_string(map, key, path)?
        .ok_or_else(|| FunctionError::config_parse(child_path(path, key), "missing required field"))
}

fn optional_string(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<String>, FunctionError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mismatch(child_path(path, key), "a string", other)),
    }
}

fn optional_bool(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<bool>, FunctionError> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mismatch(child_path(path, key), "a boolean", other)),
    }
}

fn optional_f64(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<f64>, FunctionError> {
    match present(map, key) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| mismatch(child_path(path, key), "a number", value)),
    }
}

fn optional_u64(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<u64>, FunctionError> {
    match present(map, key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| mismatch(child_path(path, key), "a non-negative integer", value)),
    }
}

fn string_sequence(value: &Value, path: &str) -> Result<Vec<String>, FunctionError> {
    let items = value
        .as_array()
        .ok_or_else(|| mismatch(path.to_string(), "a sequence of strings", value))?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| mismatch(index_path(path, i), "a string", item))
        })
        .collect()
}

fn integer_map(value: &Value, path: &str) -> Result<BTreeMap<String, i64>, FunctionError> {
    let map = expect_object(value, path)?;

    map.iter()
        .map(|(key, item)| {
            item.as_i64()
                .map(|n| (key.clone(), n))
                .ok_or_else(|| mismatch(child_path(path, key), "an integer", item))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse_yaml(text: &str) -> Result<PromptTemplateConfig, FunctionError> {
        parse_config(text, DocumentFormat::Yaml)
    }

    fn error_path(result: Result<PromptTemplateConfig, FunctionError>) -> String {
        match result {
            Err(FunctionError::ConfigParse { path, .. }) => path,
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_minimal_document() {
        let config = parse_yaml("name: greet\ntemplate: Hello\n").unwrap();
        assert_eq!(config.name(), "greet");
        assert_eq!(config.template(), "Hello");
        assert_eq!(config.template_format(), DEFAULT_TEMPLATE_FORMAT);
        assert!(config.description().is_none());
        assert!(config.input_variables().is_empty());
        assert!(config.execution_settings().is_empty());
    }

    #[test]
    fn test_parse_flow_style_document() {
        let config = parse_yaml(
            r#"{name: "greet", template: "Hello, {{name}}!", input_variables: [{name: "name", is_required: true}]}"#,
        )
        .unwrap();

        assert_eq!(config.template(), "Hello, {{name}}!");
        assert_eq!(config.input_variables().len(), 1);
        assert!(config.input_variables()[0].is_required());
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
name: summarize
description: Summarize a text
template: "Summarize {{$input}} in {{$style}} style"
template_format: Semantic-Kernel
input_variables:
  - name: input
    description: Text to summarize
    type: string
  - name: style
    default: concise
    is_required: false
output_variable:
  description: The summary
  type: string
execution_settings:
  default:
    max_tokens: 256
    temperature: 0.5
  gpt:
    model_id: gpt-4o
    stop_sequences: ["\n\n"]
    seed: 7
"#;
        let config = parse_yaml(yaml).unwrap();

        assert_eq!(config.description(), Some("Summarize a text"));
        assert_eq!(config.template_format(), "semantic-kernel");

        let style = &config.input_variables()[1];
        assert_eq!(style.name(), "style");
        assert_eq!(style.default_value(), Some(&json!("concise")));
        assert!(!style.is_required());
        assert_eq!(config.input_variables()[0].type_hint(), Some("string"));

        let output = config.output_variable().unwrap();
        assert_eq!(output.description(), Some("The summary"));

        let default = config.default_execution_settings().unwrap();
        assert_eq!(default.max_tokens, Some(256));
        assert_eq!(default.temperature, Some(0.5));

        let gpt = config.execution_settings().get("gpt").unwrap();
        assert_eq!(gpt.model_id.as_deref(), Some("gpt-4o"));
        assert_eq!(gpt.stop_sequences, vec!["\n\n".to_string()]);
        assert_eq!(gpt.extension("seed"), Some(&json!(7)));
    }

    #[test]
    fn test_input_variable_order_preserved() {
        let yaml = r#"
name: f
template: x
input_variables:
  - name: zeta
  - name: alpha
  - name: mid
"#;
        let config = parse_yaml(yaml).unwrap();
        let names: Vec<&str> = config.input_variables().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_missing_template() {
        assert_eq!(error_path(parse_yaml("name: greet\n")), "template");
    }

    #[test]
    fn test_missing_name() {
        assert_eq!(error_path(parse_yaml("template: Hello\n")), "name");
    }

    #[test]
    fn test_null_template_is_missing() {
        assert_eq!(error_path(parse_yaml("name: f\ntemplate: ~\n")), "template");
    }

    #[test]
    fn test_invalid_function_name() {
        assert_eq!(error_path(parse_yaml("name: 'bad name'\ntemplate: x\n")), "name");
    }

    #[test]
    fn test_wrong_template_type() {
        let result = parse_yaml("name: f\ntemplate: [1, 2]\n");
        match result {
            Err(FunctionError::ConfigParse { path, message }) => {
                assert_eq!(path, "template");
                assert_eq!(message, "expected a string, found a sequence");
            }
            other => panic!("Expected ConfigParse error, got {:?}", other),
        }
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert_eq!(error_path(parse_yaml("- just\n- a list\n")), ROOT_PATH);
        assert_eq!(error_path(parse_yaml("")), ROOT_PATH);
    }

    #[test]
    fn test_syntax_error_reports_root() {
        let result = parse_yaml("name: [unclosed\n");
        assert_eq!(error_path(result), ROOT_PATH);
    }

    #[test]
    fn test_unknown_top_level_key_ignored() {
        let config = parse_yaml("name: f\ntemplate: x\nauthor: someone\nversion: 3\n").unwrap();
        assert_eq!(config.name(), "f");
    }

    #[test]
    fn test_unknown_input_variable_key_rejected() {
        let yaml = "name: f\ntemplate: x\ninput_variables:\n  - name: a\n    colour: red\n";
        assert_eq!(error_path(parse_yaml(yaml)), "input_variables[0].colour");
    }

    #[test]
    fn test_unknown_output_variable_key_rejected() {
        let yaml = "name: f\ntemplate: x\noutput_variable:\n  shape: round\n";
        assert_eq!(error_path(parse_yaml(yaml)), "output_variable.shape");
    }

    #[test]
    fn test_duplicate_input_variable() {
        let yaml = "name: f\ntemplate: x\ninput_variables:\n  - name: a\n  - name: a\n";
        assert_eq!(error_path(parse_yaml(yaml)), "input_variables[1].name");
    }

    #[test]
    fn test_input_variables_must_be_sequence() {
        let yaml = "name: f\ntemplate: x\ninput_variables:\n  a: 1\n";
        assert_eq!(error_path(parse_yaml(yaml)), "input_variables");
    }

    #[test]
    fn test_is_required_must_be_bool() {
        let yaml = "name: f\ntemplate: x\ninput_variables:\n  - name: a\n    is_required: maybe\n";
        assert_eq!(error_path(parse_yaml(yaml)), "input_variables[0].is_required");
    }

    #[test]
    fn test_execution_settings_entry_must_be_mapping() {
        let yaml = "name: f\ntemplate: x\nexecution_settings:\n  gpt: 0.7\n";
        assert_eq!(error_path(parse_yaml(yaml)), "execution_settings.gpt");
    }

    #[test]
    fn test_execution_settings_typed_key_mismatch() {
        let yaml = "name: f\ntemplate: x\nexecution_settings:\n  gpt:\n    temperature: hot\n";
        assert_eq!(error_path(parse_yaml(yaml)), "execution_settings.gpt.temperature");
    }

    #[test]
    fn test_execution_settings_negative_max_tokens() {
        let yaml = "name: f\ntemplate: x\nexecution_settings:\n  default:\n    max_tokens: -1\n";
        assert_eq!(error_path(parse_yaml(yaml)), "execution_settings.default.max_tokens");
    }

    #[test]
    fn test_execution_settings_bad_stop_sequence() {
        let yaml = "name: f\ntemplate: x\nexecution_settings:\n  default:\n    stop_sequences: [\"a\", 3]\n";
        assert_eq!(
            error_path(parse_yaml(yaml)),
            "execution_settings.default.stop_sequences[1]"
        );
    }

    #[test]
    fn test_execution_settings_no_range_checks() {
        let yaml = "name: f\ntemplate: x\nexecution_settings:\n  default:\n    temperature: 42.0\n";
        let config = parse_yaml(yaml).unwrap();
        assert_eq!(config.default_execution_settings().unwrap().temperature, Some(42.0));
    }

    #[test]
    fn test_empty_template_format_rejected() {
        assert_eq!(
            error_path(parse_yaml("name: f\ntemplate: x\ntemplate_format: '  '\n")),
            "template_format"
        );
    }

    #[test]
    fn test_parse_json_document() {
        let json = r#"{"name": "greet", "template": "Hi {{name}}", "input_variables": [{"name": "name", "default": {"nested": true}}]}"#;
        let config = parse_config(json, DocumentFormat::Json).unwrap();
        assert_eq!(config.name(), "greet");
        assert_eq!(
            config.input_variables()[0].default_value(),
            Some(&json!({"nested": true}))
        );
    }

    #[test]
    fn test_parse_toml_document() {
        let toml = r#"
name = "greet"
template = "Hello, {{name}}!"

[[input_variables]]
name = "name"
is_required = true

[execution_settings.default]
temperature = 0.3
"#;
        let config = parse_config(toml, DocumentFormat::Toml).unwrap();
        assert_eq!(config.input_variables()[0].name(), "name");
        assert_eq!(config.default_execution_settings().unwrap().temperature, Some(0.3));
    }

    #[test]
    fn test_document_format_from_locator() {
        assert_eq!(DocumentFormat::from_locator("a/b/greet.json"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_locator("greet.TOML"), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_locator("greet.yml"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_locator("greet"), DocumentFormat::Yaml);
    }

    #[test]
    fn test_reparse_yields_equal_configs() {
        let yaml = "name: f\ntemplate: x {{a}}\ninput_variables:\n  - name: a\n";
        assert_eq!(parse_yaml(yaml).unwrap(), parse_yaml(yaml).unwrap());
    }
}
