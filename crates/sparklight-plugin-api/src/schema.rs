use serde::{
    Deserialize,
    Serialize,
};

/// Configuration field type for schema-based UI generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigFieldType {
    /// Single-line text input
    Text,
    /// Password input (hidden)
    Password,
}

/// Where a field's value lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigScope {
    /// Shared by every job, persisted by the descriptor
    Global,
    /// Set on each job's build step
    PerJob,
}

/// A single configuration field definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigField {
    /// Field key (used in config HashMap)
    pub key: String,
    /// Human-readable label
    pub label: String,
    /// Field description/help text
    pub description: Option<String>,
    /// Field type
    pub field_type: ConfigFieldType,
    /// Global or per-job
    pub scope: ConfigScope,
    /// Whether the field is required
    pub required: bool,
    /// Default value (as JSON)
    pub default_value: Option<serde_json::Value>,
}

/// Complete configuration schema for a notifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSchema {
    /// Schema fields
    pub fields: Vec<ConfigField>,
}

impl ConfigSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn add_field(mut self, field: ConfigField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

impl Default for ConfigSchema {
    fn default() -> Self {
        Self::new()
    }
}
