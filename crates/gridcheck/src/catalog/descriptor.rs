//! Rule metadata as stored by a rule catalog.

use serde::{Deserialize, Serialize};

/// Catalog metadata describing how to evaluate a named rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDescriptor {
    /// Rule name, unique within a catalog.
    pub rule_name: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// User-authored rule (composite or formula).
    #[serde(default)]
    pub is_custom: bool,
    /// JSON metadata for built-ins, `{logic, base_rules}` JSON for composite
    /// rules, or raw formula text.
    #[serde(default)]
    pub parameters: String,
    /// Display-format token of incoming values, e.g. `DD-MM-YYYY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    /// Display-format token values are transformed into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_format: Option<String>,
    /// Declared data type of the checked values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Inactive rules are ignored by whole-frame validation.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl RuleDescriptor {
    /// Create a built-in (non-custom) descriptor.
    pub fn builtin(name: impl Into<String>, parameters: impl Into<String>) -> Self {
        Self {
            rule_name: name.into(),
            description: None,
            is_custom: false,
            parameters: parameters.into(),
            source_format: None,
            target_format: None,
            data_type: None,
            is_active: true,
        }
    }

    /// Create a custom descriptor whose parameters are a formula or a composite definition.
    pub fn custom(name: impl Into<String>, parameters: impl Into<String>) -> Self {
        Self {
            is_custom: true,
            ..Self::builtin(name, parameters)
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the source display format.
    pub fn with_source_format(mut self, format: impl Into<String>) -> Self {
        self.source_format = Some(format.into());
        self
    }

    /// Set the target display format.
    pub fn with_target_format(mut self, format: impl Into<String>) -> Self {
        self.target_format = Some(format.into());
        self
    }

    /// Set the declared data type.
    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Mark the rule inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let json = r#"{"rule_name": "Positive", "is_custom": true, "parameters": "'x' > 0"}"#;
        let descriptor: RuleDescriptor = serde_json::from_str(json).unwrap();

        assert!(descriptor.is_custom);
        assert!(descriptor.is_active);
        assert_eq!(descriptor.source_format, None);
    }

    #[test]
    fn test_builders() {
        let descriptor = RuleDescriptor::custom("Total", "'total' = 'a' + 'b'")
            .with_data_type("Float")
            .inactive();

        assert!(descriptor.is_custom);
        assert!(!descriptor.is_active);
        assert_eq!(descriptor.data_type.as_deref(), Some("Float"));
    }
}
