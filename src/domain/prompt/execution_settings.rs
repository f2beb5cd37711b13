//! Per-target execution settings

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Key of the settings bag used when no target-specific entry exists
pub const DEFAULT_SERVICE_ID: &str = "default";

/// Invocation parameters for one execution target.
///
/// Well-known keys are typed; everything else is carried verbatim in
/// `extension_data` and passed through to the execution engine untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_of: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_per_prompt: Option<u64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub token_selection_biases: BTreeMap<String, i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Keys this layer does not interpret
    #[serde(flatten)]
    pub extension_data: BTreeMap<String, Value>,
}

impl ExecutionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stop_sequences(mut self, stop: Vec<String>) -> Self {
        self.stop_sequences = stop;
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extension_data.insert(key.into(), value);
        self
    }

    /// Look up an uninterpreted key
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extension_data.get(key)
    }
}

/// Settings bags keyed by target id, in a stable order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExecutionSettingsMap(BTreeMap<String, ExecutionSettings>);

impl ExecutionSettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target_id: impl Into<String>, settings: ExecutionSettings) -> Self {
        self.0.insert(target_id.into(), settings);
        self
    }

    /// Settings for `target_id`, falling back to the `default` bag
    pub fn settings_for(&self, target_id: &str) -> Option<&ExecutionSettings> {
        self.0
            .get(target_id)
            .or_else(|| self.0.get(DEFAULT_SERVICE_ID))
    }

    /// Settings registered under exactly `target_id`
    pub fn get(&self, target_id: &str) -> Option<&ExecutionSettings> {
        self.0.get(target_id)
    }

    pub fn default_settings(&self) -> Option<&ExecutionSettings> {
        self.0.get(DEFAULT_SERVICE_ID)
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExecutionSettings)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ExecutionSettings)> for ExecutionSettingsMap {
    fn from_iter<I: IntoIterator<Item = (String, ExecutionSettings)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_targets() -> ExecutionSettingsMap {
        ExecutionSettingsMap::new()
            .with("gpt", ExecutionSettings::new().with_temperature(0.2))
            .with(
                DEFAULT_SERVICE_ID,
                ExecutionSettings::new().with_max_tokens(256),
            )
    }

    #[test]
    fn test_settings_for_exact_target() {
        let map = two_targets();
        let settings = map.settings_for("gpt").unwrap();
        assert_eq!(settings.temperature, Some(0.2));
    }

    #[test]
    fn test_settings_for_falls_back_to_default() {
        let map = two_targets();
        let settings = map.settings_for("other").unwrap();
        assert_eq!(settings.max_tokens, Some(256));
        assert!(map.get("other").is_none());
    }

    #[test]
    fn test_settings_for_without_default() {
        let map = ExecutionSettingsMap::new().with("gpt", ExecutionSettings::new());
        assert!(map.settings_for("other").is_none());
        assert!(map.default_settings().is_none());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let settings = ExecutionSettings::new()
            .with_temperature(0.7)
            .with_extension("seed", json!(42));

        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value, json!({"temperature": 0.7, "seed": 42}));
    }

    #[test]
    fn test_targets_are_sorted() {
        let map = two_targets();
        let targets: Vec<&str> = map.targets().collect();
        assert_eq!(targets, vec!["default", "gpt"]);
    }
}
