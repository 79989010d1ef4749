use serde_json::{Map, Value};

/// Generation parameters forwarded to the model inside the request payload.
///
/// Wraps a JSON object so model-specific knobs (`temperature`,
/// `max_new_tokens`, ...) pass through without this crate knowing their
/// names. A client carries instance defaults; per-call overrides are
/// layered on top with [`GenerationParams::merged`] exactly once before
/// the request is encoded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParams(Map<String, Value>);

impl GenerationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing any previous value for the key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overrides layered over `self`. Keys present in `overrides` win.
    pub fn merged(&self, overrides: &GenerationParams) -> GenerationParams {
        let mut resolved = self.0.clone();
        for (key, value) in &overrides.0 {
            resolved.insert(key.clone(), value.clone());
        }
        GenerationParams(resolved)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The parameters as a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for GenerationParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
