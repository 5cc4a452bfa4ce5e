//! In-memory rule catalog with the built-in rules.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use tracing::info;

use super::RuleCatalog;
use super::descriptor::RuleDescriptor;
use crate::error::{GridcheckError, Result};

/// A rule catalog held in memory, keyed by rule name in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    rules: IndexMap<String, RuleDescriptor>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog seeded with the built-in rules.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.extend(default_rules());
        catalog
    }

    /// Add or replace a rule, returning the previous descriptor.
    pub fn insert(&mut self, descriptor: RuleDescriptor) -> Option<RuleDescriptor> {
        self.rules.insert(descriptor.rule_name.clone(), descriptor)
    }

    /// Remove a rule by name.
    pub fn remove(&mut self, name: &str) -> Option<RuleDescriptor> {
        self.rules.shift_remove(name)
    }

    /// Get a rule by name.
    pub fn get(&self, name: &str) -> Option<&RuleDescriptor> {
        self.rules.get(name)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.rules.values()
    }

    /// Save the catalog as a JSON array of descriptors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| GridcheckError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| GridcheckError::io(path, e))?;
        let writer = BufWriter::new(file);
        let rules: Vec<&RuleDescriptor> = self.rules.values().collect();
        serde_json::to_writer_pretty(writer, &rules)?;

        Ok(())
    }

    /// Load a catalog from a JSON array of descriptors.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| GridcheckError::io(path, e))?;
        let reader = BufReader::new(file);
        let rules: Vec<RuleDescriptor> = serde_json::from_reader(reader).map_err(|e| {
            GridcheckError::Config(format!(
                "Failed to parse rule catalog '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut catalog = Self::new();
        catalog.extend(rules);
        info!(path = %path.display(), rules = catalog.len(), "Rule catalog loaded");

        Ok(catalog)
    }
}

impl Extend<RuleDescriptor> for InMemoryCatalog {
    fn extend<I: IntoIterator<Item = RuleDescriptor>>(&mut self, iter: I) {
        for descriptor in iter {
            self.insert(descriptor);
        }
    }
}

impl FromIterator<RuleDescriptor> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = RuleDescriptor>>(iter: I) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}

impl RuleCatalog for InMemoryCatalog {
    fn lookup_rule(&self, name: &str) -> Option<RuleDescriptor> {
        self.rules.get(name).cloned()
    }
}

/// The built-in rules every deployment starts with.
pub fn default_rules() -> Vec<RuleDescriptor> {
    vec![
        RuleDescriptor::builtin("Required", r#"{"allow_null": false}"#)
            .with_description("Ensures the field is not null"),
        RuleDescriptor::builtin("Int", r#"{"format": "integer"}"#)
            .with_description("Validates integer format")
            .with_data_type("Int"),
        RuleDescriptor::builtin("Float", r#"{"format": "float"}"#)
            .with_description("Validates number format (integer or decimal)")
            .with_data_type("Float"),
        RuleDescriptor::builtin("Text", r#"{"allow_special": false}"#)
            .with_description("Allows text with quotes and parentheses")
            .with_data_type("Text"),
        RuleDescriptor::builtin("Email", r#"{"regex": "^[\\w.+-]+@[\\w-]+\\.[\\w.-]+$"}"#)
            .with_description("Validates email format")
            .with_data_type("Email"),
        RuleDescriptor::builtin("Date", r#"{"format": "%d-%m-%Y"}"#)
            .with_description("Validates date")
            .with_source_format("DD-MM-YYYY")
            .with_data_type("Date"),
        RuleDescriptor::builtin("Boolean", r#"{"format": "boolean"}"#)
            .with_description("Validates boolean format (true/false or 0/1)")
            .with_data_type("Boolean"),
        RuleDescriptor::builtin("Alphanumeric", r#"{"format": "alphanumeric"}"#)
            .with_description("Validates alphanumeric format")
            .with_data_type("Alphanumeric"),
    ]
}
