//! Models: a default page plus ordered conditional pages
//!
//! A model's parameter value for a period is found by starting from the
//! default page and letting every later page whose condition holds override
//! the keys it explicitly sets. The last applicable page wins.
//!
//! Models arrive from the settings collaborator as string-keyed pages and
//! are bound to typed [`ModelConfig`]s here. Every name is resolved at
//! binding time, so a run never meets an unknown key.

use crate::params::condition::{Condition, Operator};
use crate::params::types::{ParamKey, Parameters};
use crate::stats::{Property, PropertySnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// Errors detected while binding or validating configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid threshold '{value}' for condition on {property}")]
    InvalidThreshold { property: String, value: String },

    #[error("Parameter {key} has non-finite value on page {page}")]
    NonFiniteValue { key: String, page: usize },

    #[error("The default page of model '{0}' cannot carry a condition")]
    ConditionalDefaultPage(String),

    #[error("Property {property} is captured before its dependency {dependency}")]
    PropertyOrder { property: String, dependency: String },

    #[error("Property {0} is tracked more than once")]
    DuplicateProperty(String),

    #[error("Page {page} of model '{model}' tests {property}, which is not tracked")]
    UntrackedProperty {
        model: String,
        page: usize,
        property: String,
    },

    #[error("Model '{0}' is already registered")]
    DuplicateModel(String),

    #[error("Model '{0}' is not registered")]
    UnknownModel(String),
}

/// Non-fatal configuration finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// The default page omitted a key; the documented default is used
    MissingDefault { model: String, key: ParamKey },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::MissingDefault { model, key } => write!(
                f,
                "model '{}' does not set {}; using default {}",
                model,
                key,
                Parameters::default().get(*key)
            ),
        }
    }
}

/// Page 1..N of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalPage {
    #[serde(default)]
    pub label: Option<String>,

    pub condition: Condition,

    /// Only the keys this page explicitly sets
    #[serde(default)]
    pub overrides: BTreeMap<ParamKey, f64>,
}

impl ConditionalPage {
    pub fn new(condition: Condition) -> Self {
        Self {
            label: None,
            condition,
            overrides: BTreeMap::new(),
        }
    }

    /// Builder-style override
    pub fn with(mut self, key: ParamKey, value: f64) -> Self {
        self.overrides.insert(key, value);
        self
    }
}

/// A named model
///
/// # Example
/// ```
/// use econ_sim_core::params::{Condition, ConditionalPage, ModelConfig, Operator, ParamKey};
/// use econ_sim_core::stats::{Property, PropertySnapshot};
///
/// let model = ModelConfig::new("stimulus").with_page(
///     ConditionalPage::new(Condition::compare(Property::PctUnemployed, Operator::Greater, 20.0))
///         .with(ParamKey::GovtProcurement, 5.0),
/// );
///
/// let calm: PropertySnapshot = [(Property::PctUnemployed, 5.0)].into_iter().collect();
/// let slump: PropertySnapshot = [(Property::PctUnemployed, 30.0)].into_iter().collect();
/// assert_eq!(model.parameter_value(ParamKey::GovtProcurement, &calm), 0.0);
/// assert_eq!(model.parameter_value(ParamKey::GovtProcurement, &slump), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,

    /// Page 0: applies unconditionally
    #[serde(default)]
    pub defaults: Parameters,

    #[serde(default)]
    pub pages: Vec<ConditionalPage>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::new("default")
    }
}

impl ModelConfig {
    /// Model with documented defaults and no conditional pages
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            defaults: Parameters::default(),
            pages: Vec::new(),
        }
    }

    pub fn with_defaults(mut self, defaults: Parameters) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_page(mut self, page: ConditionalPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Value of `key` given the latest captured properties
    pub fn parameter_value(&self, key: ParamKey, snapshot: &PropertySnapshot) -> f64 {
        self.pages
            .iter()
            .filter(|page| page.condition.evaluate(snapshot))
            .filter_map(|page| page.overrides.get(&key).copied())
            .last()
            .unwrap_or_else(|| self.defaults.get(key))
    }

    /// Resolve every parameter against the same snapshot
    pub fn resolve(&self, snapshot: &PropertySnapshot) -> Parameters {
        let mut params = self.defaults.clone();
        for page in &self.pages {
            if page.condition.evaluate(snapshot) {
                for (key, value) in &page.overrides {
                    params.set(*key, *value);
                }
            }
        }
        params
    }

    /// Reject values that would poison integer arithmetic
    pub fn validate(&self) -> Result<(), ConfigError> {
        for key in ParamKey::ALL {
            if !self.defaults.get(key).is_finite() {
                return Err(ConfigError::NonFiniteValue {
                    key: key.as_str().to_string(),
                    page: 0,
                });
            }
        }
        for (i, page) in self.pages.iter().enumerate() {
            if let Condition::Compare { threshold, property, .. } = &page.condition {
                if !threshold.is_finite() {
                    return Err(ConfigError::InvalidThreshold {
                        property: property.name().to_string(),
                        value: threshold.to_string(),
                    });
                }
            }
            for (key, value) in &page.overrides {
                if !value.is_finite() {
                    return Err(ConfigError::NonFiniteValue {
                        key: key.as_str().to_string(),
                        page: i + 1,
                    });
                }
            }
        }
        Ok(())
    }

    /// Check that every page condition reads a property captured each period
    ///
    /// A condition on an uncaptured property could never hold.
    pub fn check_tracked(&self, tracked: &[Property]) -> Result<(), ConfigError> {
        for (i, page) in self.pages.iter().enumerate() {
            if let Condition::Compare { property, .. } = &page.condition {
                if !tracked.contains(property) {
                    return Err(ConfigError::UntrackedProperty {
                        model: self.name.clone(),
                        page: i + 1,
                        property: property.name().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Bind string-keyed settings pages to a typed model
    ///
    /// `pages[0]` is the default page; missing keys there fall back to the
    /// documented defaults with a warning. A later page without a condition,
    /// or whose condition names the [`ALWAYS`] sentinel, always applies.
    ///
    /// # Example
    /// ```
    /// use econ_sim_core::params::{ModelConfig, ParamKey, SettingsCondition, SettingsPage};
    ///
    /// let pages = vec![
    ///     SettingsPage::new().set("income-tax-rate", 25.0),
    ///     SettingsPage::new()
    ///         .when(SettingsCondition::new("gov-bal", "≤", "-10000"))
    ///         .set("income-tax-rate", 30.0),
    /// ];
    /// let (model, warnings) = ModelConfig::bind("austerity", &pages).unwrap();
    /// assert_eq!(model.defaults.get(ParamKey::IncomeTaxRate), 25.0);
    /// assert_eq!(model.pages.len(), 1);
    /// assert_eq!(warnings.len(), ParamKey::ALL.len() - 1);
    /// ```
    pub fn bind(
        name: &str,
        pages: &[SettingsPage],
    ) -> Result<(ModelConfig, Vec<ConfigWarning>), ConfigError> {
        let mut warnings = Vec::new();
        let mut model = ModelConfig::new(name);

        let empty = SettingsPage::default();
        let default_page = pages.first().unwrap_or(&empty);
        if default_page.condition.is_some() {
            return Err(ConfigError::ConditionalDefaultPage(name.to_string()));
        }

        let defaults = parse_values(&default_page.values, 0)?;
        for key in ParamKey::ALL {
            match defaults.get(&key) {
                Some(value) => model.defaults.set(key, *value),
                None => {
                    warn!(model = name, key = key.as_str(), "parameter missing from default page");
                    warnings.push(ConfigWarning::MissingDefault {
                        model: name.to_string(),
                        key,
                    });
                }
            }
        }

        for (i, page) in pages.iter().enumerate().skip(1) {
            let condition = match &page.condition {
                None => Condition::Always,
                Some(cond) => cond.bind()?,
            };
            model.pages.push(ConditionalPage {
                label: page.label.clone(),
                condition,
                overrides: parse_values(&page.values, i)?,
            });
        }

        model.validate()?;
        Ok((model, warnings))
    }
}

fn parse_values(
    values: &BTreeMap<String, f64>,
    page: usize,
) -> Result<BTreeMap<ParamKey, f64>, ConfigError> {
    values
        .iter()
        .map(|(name, value)| {
            let key: ParamKey = name
                .parse()
                .map_err(ConfigError::UnknownParameter)?;
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteValue {
                    key: name.clone(),
                    page,
                });
            }
            Ok((key, *value))
        })
        .collect()
}

/// Property name that makes a settings condition hold unconditionally
pub const ALWAYS: &str = "always";

/// Condition as entered in settings: three strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsCondition {
    pub property: String,
    pub op: String,
    pub threshold: String,
}

impl SettingsCondition {
    pub fn new(property: &str, op: &str, threshold: &str) -> Self {
        Self {
            property: property.to_string(),
            op: op.to_string(),
            threshold: threshold.to_string(),
        }
    }

    fn bind(&self) -> Result<Condition, ConfigError> {
        if self.property.trim().eq_ignore_ascii_case(ALWAYS) {
            return Ok(Condition::Always);
        }
        let property: Property = self.property.trim().parse()?;
        let op: Operator = self.op.parse()?;
        let threshold: f64 = self
            .threshold
            .trim()
            .parse()
            .ok()
            .filter(|t: &f64| t.is_finite())
            .ok_or_else(|| ConfigError::InvalidThreshold {
                property: self.property.clone(),
                value: self.threshold.clone(),
            })?;
        Ok(Condition::compare(property, op, threshold))
    }
}

/// One page of a model as supplied by the settings collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPage {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub condition: Option<SettingsCondition>,

    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl SettingsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn when(mut self, condition: SettingsCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn set(mut self, key: &str, value: f64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(Property, f64)]) -> PropertySnapshot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_last_applicable_page_wins() {
        let model = ModelConfig::new("m")
            .with_page(
                ConditionalPage::new(Condition::compare(Property::Period, Operator::GreaterOrEqual, 5.0))
                    .with(ParamKey::IncomeTaxRate, 30.0),
            )
            .with_page(
                ConditionalPage::new(Condition::compare(Property::Period, Operator::GreaterOrEqual, 10.0))
                    .with(ParamKey::IncomeTaxRate, 40.0),
            )
            .with_page(ConditionalPage::new(Condition::Always).with(ParamKey::SalesTaxRate, 0.0));

        let early = snapshot(&[(Property::Period, 1.0)]);
        let middle = snapshot(&[(Property::Period, 7.0)]);
        let late = snapshot(&[(Property::Period, 12.0)]);

        assert_eq!(model.parameter_value(ParamKey::IncomeTaxRate, &early), 20.0);
        assert_eq!(model.parameter_value(ParamKey::IncomeTaxRate, &middle), 30.0);
        assert_eq!(model.parameter_value(ParamKey::IncomeTaxRate, &late), 40.0);
        // page 3 applies always but never sets income tax
        assert_eq!(model.parameter_value(ParamKey::SalesTaxRate, &early), 0.0);
    }

    #[test]
    fn test_resolve_agrees_with_parameter_value() {
        let model = ModelConfig::new("m").with_page(
            ConditionalPage::new(Condition::compare(Property::GovBal, Operator::Less, 0.0))
                .with(ParamKey::UnemplBenefitRate, 40.0)
                .with(ParamKey::LoanProb, 10.0),
        );
        let snap = snapshot(&[(Property::GovBal, -1.0)]);
        let resolved = model.resolve(&snap);
        for key in ParamKey::ALL {
            assert_eq!(resolved.get(key), model.parameter_value(key, &snap), "{}", key);
        }
    }

    #[test]
    fn test_bind_rejects_unknown_names() {
        let pages = vec![SettingsPage::new().set("income-tax", 20.0)];
        assert_eq!(
            ModelConfig::bind("m", &pages).unwrap_err(),
            ConfigError::UnknownParameter("income-tax".to_string())
        );

        let pages = vec![
            SettingsPage::new(),
            SettingsPage::new().when(SettingsCondition::new("unemployment", ">", "5")),
        ];
        assert_eq!(
            ModelConfig::bind("m", &pages).unwrap_err(),
            ConfigError::UnknownProperty("unemployment".to_string())
        );

        let pages = vec![
            SettingsPage::new(),
            SettingsPage::new().when(SettingsCondition::new("gini", "~", "0.3")),
        ];
        assert_eq!(
            ModelConfig::bind("m", &pages).unwrap_err(),
            ConfigError::UnknownOperator("~".to_string())
        );

        let pages = vec![
            SettingsPage::new(),
            SettingsPage::new().when(SettingsCondition::new("gini", ">", "high")),
        ];
        assert!(matches!(
            ModelConfig::bind("m", &pages),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_bind_without_pages_warns_for_every_key() {
        let (model, warnings) = ModelConfig::bind("bare", &[]).unwrap();
        assert_eq!(model.defaults, Parameters::default());
        assert_eq!(warnings.len(), ParamKey::ALL.len());
    }

    #[test]
    fn test_default_page_condition_rejected() {
        let pages = vec![SettingsPage::new().when(SettingsCondition::new("gini", ">", "0"))];
        assert_eq!(
            ModelConfig::bind("m", &pages).unwrap_err(),
            ConfigError::ConditionalDefaultPage("m".to_string())
        );
    }

    #[test]
    fn test_unconditioned_later_page_always_applies() {
        let pages = vec![
            SettingsPage::new(),
            SettingsPage::new().set("loan-prob", 0.0),
        ];
        let (model, _) = ModelConfig::bind("m", &pages).unwrap();
        assert_eq!(model.pages[0].condition, Condition::Always);
        assert_eq!(model.resolve(&PropertySnapshot::new()).loan_prob, 0.0);
    }

    #[test]
    fn test_always_sentinel_binds_to_unconditional_page() {
        let pages = vec![
            SettingsPage::new(),
            SettingsPage::new()
                .when(SettingsCondition::new(" Always ", "=", ""))
                .set("loan-prob", 5.0),
        ];
        let (model, _) = ModelConfig::bind("m", &pages).unwrap();
        assert_eq!(model.pages[0].condition, Condition::Always);
        assert_eq!(model.resolve(&PropertySnapshot::new()).loan_prob, 5.0);
    }

    #[test]
    fn test_check_tracked_names_the_page() {
        let model = ModelConfig::new("m")
            .with_page(ConditionalPage::new(Condition::Always))
            .with_page(ConditionalPage::new(Condition::compare(
                Property::Gini,
                Operator::Greater,
                0.4,
            )));
        assert_eq!(
            model.check_tracked(&[Property::Period]).unwrap_err(),
            ConfigError::UntrackedProperty {
                model: "m".to_string(),
                page: 2,
                property: "gini".to_string(),
            }
        );
        assert!(model.check_tracked(&[Property::Gini]).is_ok());
    }
}
