//! Registry of named models
//!
//! Owned by whoever assembles runs (the CLI, a test) and passed explicitly.

use crate::params::model::{ConfigError, ConfigWarning, ModelConfig, SettingsPage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Settings file layout: model name to its pages, default page first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    pub models: BTreeMap<String, Vec<SettingsPage>>,
}

/// Named models, iterated in name order
///
/// # Example
/// ```
/// use econ_sim_core::params::{ModelConfig, ModelRegistry};
///
/// let mut registry = ModelRegistry::with_default();
/// registry.register(ModelConfig::new("tight")).unwrap();
/// assert!(registry.register(ModelConfig::new("tight")).is_err());
/// assert_eq!(registry.names(), vec!["default", "tight"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelConfig>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in default model
    pub fn with_default() -> Self {
        let mut registry = Self::new();
        let model = ModelConfig::default();
        registry.models.insert(model.name.clone(), model);
        registry
    }

    /// Bind every model of a settings file
    pub fn from_settings(
        settings: &SettingsFile,
    ) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let mut registry = Self::new();
        let mut warnings = Vec::new();
        for (name, pages) in &settings.models {
            let (model, found) = ModelConfig::bind(name, pages)?;
            warnings.extend(found);
            registry.register(model)?;
        }
        Ok((registry, warnings))
    }

    pub fn register(&mut self, model: ModelConfig) -> Result<(), ConfigError> {
        if self.models.contains_key(&model.name) {
            return Err(ConfigError::DuplicateModel(model.name));
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ModelConfig, ConfigError> {
        self.models
            .get(name)
            .ok_or_else(|| ConfigError::UnknownModel(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Option<ModelConfig> {
        self.models.remove(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.models.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
